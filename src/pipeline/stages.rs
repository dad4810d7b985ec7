use std::io::Read;

use crate::config::DecodeOptions;
use crate::error::{PymaError, Result};
use crate::stages::registry::decode_stage_at;
use crate::stages::{Algorithm, InvertibleAlgorithm, Stage};
use crate::wire::ByteReader;

// ---------------------------------------------------------------------------
// Pipeline – an ordered list of stages
// ---------------------------------------------------------------------------

/// Stages applied one after another to a single feature vector.
///
/// On the wire a pipeline is an `i32` stage count followed by that many named
/// stages. A pipeline can itself appear as a stage (`PreprocessingStages`),
/// so pipelines nest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Decode a pipeline at nesting level `depth`. The outermost pipeline is
    /// level 0; each enclosing `PreprocessingStages` adds one.
    pub(crate) fn read_nested<R: Read>(
        reader: &mut ByteReader<R>,
        opts: &DecodeOptions,
        depth: usize,
    ) -> Result<Self> {
        if depth > opts.max_depth {
            return Err(PymaError::NestingTooDeep(opts.max_depth));
        }
        let count = reader.read_count("stage count")?;
        log::debug!("decoding pipeline of {count} stages (depth {depth})");
        // Each stage takes at least five bytes, so don't trust `count` for
        // preallocation.
        let mut stages = Vec::new();
        for _ in 0..count {
            stages.push(decode_stage_at(reader, opts, depth)?);
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether every stage, including those in nested pipelines, can be
    /// inverted.
    pub fn is_invertible(&self) -> bool {
        self.first_forward_only().is_none()
    }

    pub(crate) fn first_forward_only(&self) -> Option<&'static str> {
        self.stages.iter().find_map(Stage::first_forward_only)
    }
}

impl Algorithm for Pipeline {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        let mut current = data.to_vec();
        for stage in &self.stages {
            current = stage.apply(&current)?;
        }
        Ok(current)
    }
}

impl InvertibleAlgorithm for Pipeline {
    /// Runs the stages' inverses in reverse order. Fails before touching the
    /// data if any stage is forward-only.
    fn apply_inverse(&self, data: &[f64]) -> Result<Vec<f64>> {
        if let Some(name) = self.first_forward_only() {
            return Err(PymaError::UnsupportedInverse(name));
        }
        let mut current = data.to_vec();
        for stage in self.stages.iter().rev() {
            current = stage.apply_inverse(&current)?;
        }
        Ok(current)
    }
}

impl FromIterator<Stage> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
