//! Pipelines of stages, and maps of pipelines keyed by input name.
//!
//! ```text
//!  named-map ─┬─ "spectrum" ─► Pipeline [Standardize, SavitzkyGolay, SIMPLS]
//!             └─ "moisture" ─► Pipeline [Log]
//! ```

pub mod map;
pub mod stages;

use std::io::Read;

use crate::config::DecodeOptions;
use crate::error::Result;
use crate::wire::ByteReader;

pub use map::{Direction, FeatureMap, PreprocessingMap};
pub use stages::Pipeline;

/// Decode a single pipeline from `source`.
pub fn decode_pipeline<R: Read>(source: R) -> Result<Pipeline> {
    decode_pipeline_with_options(source, &DecodeOptions::default())
}

pub fn decode_pipeline_with_options<R: Read>(
    source: R,
    opts: &DecodeOptions,
) -> Result<Pipeline> {
    let mut reader = ByteReader::new(source);
    let pipeline = Pipeline::read_nested(&mut reader, opts, 0)?;
    log::debug!(
        "decoded pipeline of {} stages from {} bytes",
        pipeline.len(),
        reader.offset()
    );
    Ok(pipeline)
}

/// Decode a named preprocessing map from `source`.
pub fn decode_named_map<R: Read>(source: R) -> Result<PreprocessingMap> {
    decode_named_map_with_options(source, &DecodeOptions::default())
}

pub fn decode_named_map_with_options<R: Read>(
    source: R,
    opts: &DecodeOptions,
) -> Result<PreprocessingMap> {
    let mut reader = ByteReader::new(source);
    let map = PreprocessingMap::read_from(&mut reader, opts)?;
    log::debug!(
        "decoded preprocessing map {:?} from {} bytes",
        map.ordering(),
        reader.offset()
    );
    Ok(map)
}
