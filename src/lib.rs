//! Reader for serialized PyMA preprocessing pipelines.
//!
//! Decodes the compact little-endian state dump written by the Python
//! matrix-algorithms library and runs the resulting pipelines over feature
//! vectors, forward or inverse, with the same floating-point results.
//!
//! ```text
//!  impl Read ──► wire::ByteReader ──► stages::registry ──► Stage
//!                                                            │
//!                         pipeline::Pipeline ◄───────────────┘
//!                                 │
//!                         pipeline::PreprocessingMap
//! ```
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use pyma_reader::decode_named_map;
//!
//! let file = std::fs::File::open("model.pyma")?;
//! let map = decode_named_map(std::io::BufReader::new(file))?;
//! let mut inputs = BTreeMap::new();
//! inputs.insert("spectrum".to_string(), vec![0.1, 0.2, 0.3]);
//! let rows = map.apply_ordered(&inputs)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod stages;
pub mod wire;

pub use config::DecodeOptions;
pub use error::{PymaError, Result};
pub use pipeline::{
    decode_named_map, decode_named_map_with_options, decode_pipeline,
    decode_pipeline_with_options, Direction, FeatureMap, Pipeline, PreprocessingMap,
};
pub use stages::{decode_stage, Algorithm, InvertibleAlgorithm, Stage, StageKind};
pub use wire::{ByteReader, Matrix};
