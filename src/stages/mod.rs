//! Preprocessing stages and the registry that decodes them.
//!
//! ```text
//!  string name ──► registry::StageKind ──► <Kind>::read_from(reader)
//!                                                │
//!                                                ▼
//!                                             Stage
//! ```
//!
//! Every stage implements [`Algorithm`]. Stages that can be undone also
//! implement [`InvertibleAlgorithm`]; the [`Stage`] sum type exposes that
//! capability through [`Stage::as_invertible`].

pub mod logarithm;
pub mod registry;
pub mod savitzky_golay;
pub mod simpls;
pub mod standardize;

use crate::error::{PymaError, Result};
use crate::pipeline::Pipeline;

pub use logarithm::Log;
pub use registry::{decode_stage, StageKind};
pub use savitzky_golay::SavitzkyGolay;
pub use simpls::Simpls;
pub use standardize::Standardize;

// ---------------------------------------------------------------------------
// Algorithm traits
// ---------------------------------------------------------------------------

/// A transform over a single feature vector.
pub trait Algorithm {
    /// Transform `data`, returning a new vector.
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>>;
}

/// A transform that can also be undone.
pub trait InvertibleAlgorithm: Algorithm {
    /// Reverse [`Algorithm::apply`].
    fn apply_inverse(&self, data: &[f64]) -> Result<Vec<f64>>;
}

// ---------------------------------------------------------------------------
// Stage – the closed set of decodable stages
// ---------------------------------------------------------------------------

/// One decoded stage. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Log(Log),
    Standardize(Standardize),
    SavitzkyGolay(SavitzkyGolay),
    Simpls(Simpls),
    /// A nested pipeline (`PreprocessingStages` on the wire).
    Pipeline(Pipeline),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Log(_) => StageKind::Log,
            Stage::Standardize(_) => StageKind::Standardize,
            Stage::SavitzkyGolay(_) => StageKind::SavitzkyGolay,
            Stage::Simpls(_) => StageKind::Simpls,
            Stage::Pipeline(_) => StageKind::PreprocessingStages,
        }
    }

    /// Wire name of this stage.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Inverse view of the stage, if it has one.
    ///
    /// A nested pipeline is invertible only when all of its members are.
    pub fn as_invertible(&self) -> Option<&dyn InvertibleAlgorithm> {
        match self {
            Stage::Standardize(s) => Some(s),
            Stage::Pipeline(p) if p.is_invertible() => Some(p),
            Stage::Log(_) | Stage::SavitzkyGolay(_) | Stage::Simpls(_) | Stage::Pipeline(_) => {
                None
            }
        }
    }

    pub fn is_invertible(&self) -> bool {
        self.as_invertible().is_some()
    }

    /// Name of the first forward-only stage reachable from here, if any.
    pub(crate) fn first_forward_only(&self) -> Option<&'static str> {
        match self {
            Stage::Pipeline(p) => p.first_forward_only(),
            Stage::Standardize(_) => None,
            other => Some(other.name()),
        }
    }

    /// Undo this stage, or fail with [`PymaError::UnsupportedInverse`].
    pub fn apply_inverse(&self, data: &[f64]) -> Result<Vec<f64>> {
        match self {
            Stage::Standardize(s) => s.apply_inverse(data),
            Stage::Pipeline(p) => p.apply_inverse(data),
            other => Err(PymaError::UnsupportedInverse(other.name())),
        }
    }
}

impl Algorithm for Stage {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        match self {
            Stage::Log(s) => s.apply(data),
            Stage::Standardize(s) => s.apply(data),
            Stage::SavitzkyGolay(s) => s.apply(data),
            Stage::Simpls(s) => s.apply(data),
            Stage::Pipeline(p) => p.apply(data),
        }
    }
}

impl From<Log> for Stage {
    fn from(stage: Log) -> Self {
        Stage::Log(stage)
    }
}

impl From<Standardize> for Stage {
    fn from(stage: Standardize) -> Self {
        Stage::Standardize(stage)
    }
}

impl From<SavitzkyGolay> for Stage {
    fn from(stage: SavitzkyGolay) -> Self {
        Stage::SavitzkyGolay(stage)
    }
}

impl From<Simpls> for Stage {
    fn from(stage: Simpls) -> Self {
        Stage::Simpls(stage)
    }
}

impl From<Pipeline> for Stage {
    fn from(pipeline: Pipeline) -> Self {
        Stage::Pipeline(pipeline)
    }
}
