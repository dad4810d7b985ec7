use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::config::DecodeOptions;
use crate::error::{PymaError, Result};
use crate::pipeline::Pipeline;
use crate::wire::ByteReader;

use super::{Log, SavitzkyGolay, Simpls, Stage, Standardize};

// ---------------------------------------------------------------------------
// StageKind – the closed registry of stage names
// ---------------------------------------------------------------------------

/// Every stage type the decoder accepts, keyed by its wire name.
///
/// Resolution is a fixed match over this list; no name from the stream can
/// reach any other code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Log,
    Standardize,
    SavitzkyGolay,
    Simpls,
    PreprocessingStages,
}

impl StageKind {
    pub const ALL: [StageKind; 5] = [
        StageKind::Log,
        StageKind::Standardize,
        StageKind::SavitzkyGolay,
        StageKind::Simpls,
        StageKind::PreprocessingStages,
    ];

    /// Name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Log => "Log",
            StageKind::Standardize => "Standardize",
            StageKind::SavitzkyGolay => "SavitzkyGolay",
            StageKind::Simpls => "SIMPLS",
            StageKind::PreprocessingStages => "PreprocessingStages",
        }
    }

    /// Decode this kind's state. `depth` is the nesting level of the
    /// enclosing pipeline, 0 for the outermost.
    fn decode<R: Read>(
        self,
        reader: &mut ByteReader<R>,
        opts: &DecodeOptions,
        depth: usize,
    ) -> Result<Stage> {
        let stage = match self {
            StageKind::Log => Log::read_from(reader)?.into(),
            StageKind::Standardize => Standardize::read_from(reader)?.into(),
            StageKind::SavitzkyGolay => SavitzkyGolay::read_from(reader)?.into(),
            StageKind::Simpls => Simpls::read_from(reader)?.into(),
            StageKind::PreprocessingStages => {
                Pipeline::read_nested(reader, opts, depth + 1)?.into()
            }
        };
        Ok(stage)
    }
}

impl FromStr for StageKind {
    type Err = PymaError;

    fn from_str(name: &str) -> Result<Self> {
        StageKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| PymaError::UnknownStageType(name.to_string()))
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Stage decoding
// ---------------------------------------------------------------------------

/// Decode one stage: its name, then its own fields.
pub fn decode_stage<R: Read>(reader: &mut ByteReader<R>, opts: &DecodeOptions) -> Result<Stage> {
    decode_stage_at(reader, opts, 0)
}

pub(crate) fn decode_stage_at<R: Read>(
    reader: &mut ByteReader<R>,
    opts: &DecodeOptions,
    depth: usize,
) -> Result<Stage> {
    let at = reader.offset();
    let kind: StageKind = reader.read_string()?.parse()?;
    log::debug!("stage {kind} at byte {at} (depth {depth})");
    kind.decode(reader, opts, depth)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::stages::Algorithm;

    fn string_bytes(s: &str) -> Vec<u8> {
        let mut out = (s.len() as i32).to_le_bytes().to_vec();
        out.extend_from_slice(s.as_bytes());
        out
    }

    fn doubles_bytes(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn names_round_trip() {
        for kind in StageKind::ALL {
            assert_eq!(kind.name().parse::<StageKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        for name in ["", "log", "Simpls", "java.lang.Runtime", "PreprocessingMap"] {
            match name.parse::<StageKind>() {
                Err(PymaError::UnknownStageType(n)) => assert_eq!(n, name),
                other => panic!("expected UnknownStageType for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn decodes_named_log_stage() {
        let mut bytes = string_bytes("Log");
        bytes.extend(doubles_bytes(&[10.0, 1.0 / libm::log(10.0), 0.0]));
        let mut reader = ByteReader::new(Cursor::new(bytes));
        let stage = decode_stage(&mut reader, &DecodeOptions::default()).unwrap();
        assert_eq!(stage.kind(), StageKind::Log);
        assert_eq!(stage.apply(&[1.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn unknown_stage_stops_decoding() {
        let mut bytes = string_bytes("Normalize");
        bytes.extend(doubles_bytes(&[1.0]));
        let mut reader = ByteReader::new(Cursor::new(bytes));
        assert!(matches!(
            decode_stage(&mut reader, &DecodeOptions::default()),
            Err(PymaError::UnknownStageType(name)) if name == "Normalize"
        ));
    }

    #[test]
    fn truncated_stage_state_fails() {
        let mut bytes = string_bytes("Log");
        bytes.extend(doubles_bytes(&[10.0, 1.0]));
        let mut reader = ByteReader::new(Cursor::new(bytes));
        assert!(matches!(
            decode_stage(&mut reader, &DecodeOptions::default()),
            Err(PymaError::TruncatedInput { .. })
        ));
    }
}
