use serde::{Deserialize, Serialize};

/// Default limit on how deeply `PreprocessingStages` may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs for the stage decoder.
///
/// Deserializable so front ends can load it from a JSON file; missing fields
/// fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Maximum nesting of `PreprocessingStages` inside a pipeline. Zero
    /// allows flat pipelines only.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let opts: DecodeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, DecodeOptions::default());
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn json_overrides_depth() {
        let opts: DecodeOptions = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(opts.max_depth, 3);
    }
}
