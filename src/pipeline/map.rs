use std::collections::BTreeMap;
use std::io::Read;

use crate::config::DecodeOptions;
use crate::error::{PymaError, Result};
use crate::stages::{Algorithm, InvertibleAlgorithm};
use crate::wire::ByteReader;

use super::stages::Pipeline;

/// Feature vectors keyed by input name.
pub type FeatureMap = BTreeMap<String, Vec<f64>>;

/// Which way to run a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Inverse,
}

// ---------------------------------------------------------------------------
// PreprocessingMap – one pipeline per named input
// ---------------------------------------------------------------------------

/// Independent pipelines keyed by input name, plus the order the inputs
/// appeared in on the wire.
///
/// Wire layout: `i32` input count, then for each input a name string
/// followed by a pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreprocessingMap {
    stages: BTreeMap<String, Pipeline>,
    ordering: Vec<String>,
}

impl PreprocessingMap {
    /// Build from `(name, pipeline)` pairs; their order becomes the output
    /// ordering.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Pipeline)>,
    {
        let mut map = Self::default();
        for (name, pipeline) in entries {
            map.insert(name, pipeline)?;
        }
        Ok(map)
    }

    fn insert(&mut self, name: String, pipeline: Pipeline) -> Result<()> {
        if self.stages.contains_key(&name) {
            return Err(PymaError::DuplicateInput(name));
        }
        self.ordering.push(name.clone());
        self.stages.insert(name, pipeline);
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(
        reader: &mut ByteReader<R>,
        opts: &DecodeOptions,
    ) -> Result<Self> {
        let count = reader.read_count("input count")?;
        log::debug!("decoding preprocessing map with {count} inputs");
        let mut map = Self::default();
        for _ in 0..count {
            let name = reader.read_string()?;
            log::debug!("input '{name}'");
            let pipeline = Pipeline::read_nested(reader, opts, 0)?;
            map.insert(name, pipeline)?;
        }
        Ok(map)
    }

    /// Input names in wire order.
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    pub fn get(&self, name: &str) -> Option<&Pipeline> {
        self.stages.get(name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Iterate `(name, pipeline)` in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pipeline)> + '_ {
        self.ordering
            .iter()
            .filter_map(|name| self.stages.get(name).map(|p| (name.as_str(), p)))
    }

    /// Run every input's pipeline over its vector.
    ///
    /// Every name the map knows must be present in `inputs`; extra inputs
    /// are ignored.
    pub fn apply_with(&self, inputs: &FeatureMap, direction: Direction) -> Result<FeatureMap> {
        self.stages
            .iter()
            .map(|(name, pipeline)| {
                let data = inputs
                    .get(name)
                    .ok_or_else(|| PymaError::MissingInput(name.clone()))?;
                let out = match direction {
                    Direction::Forward => pipeline.apply(data)?,
                    Direction::Inverse => pipeline.apply_inverse(data)?,
                };
                Ok((name.clone(), out))
            })
            .collect()
    }

    pub fn apply(&self, inputs: &FeatureMap) -> Result<FeatureMap> {
        self.apply_with(inputs, Direction::Forward)
    }

    pub fn apply_inverse(&self, inputs: &FeatureMap) -> Result<FeatureMap> {
        self.apply_with(inputs, Direction::Inverse)
    }

    /// Like [`apply_with`](Self::apply_with), but returns the results as a
    /// list following [`ordering`](Self::ordering).
    pub fn apply_ordered_with(
        &self,
        inputs: &FeatureMap,
        direction: Direction,
    ) -> Result<Vec<Vec<f64>>> {
        let mut unordered = self.apply_with(inputs, direction)?;
        self.ordering
            .iter()
            .map(|name| {
                unordered
                    .remove(name)
                    .ok_or_else(|| PymaError::MissingInput(name.clone()))
            })
            .collect()
    }

    pub fn apply_ordered(&self, inputs: &FeatureMap) -> Result<Vec<Vec<f64>>> {
        self.apply_ordered_with(inputs, Direction::Forward)
    }

    pub fn apply_ordered_inverse(&self, inputs: &FeatureMap) -> Result<Vec<Vec<f64>>> {
        self.apply_ordered_with(inputs, Direction::Inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{Log, Simpls, Stage, Standardize};
    use crate::wire::Matrix;

    fn standardize(means: &[f64], std_devs: &[f64]) -> Pipeline {
        let stage: Stage = Standardize::new(means.to_vec(), std_devs.to_vec())
            .unwrap()
            .into();
        Pipeline::new(vec![stage])
    }

    fn features(entries: &[(&str, &[f64])]) -> FeatureMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect()
    }

    fn sample_map() -> PreprocessingMap {
        let projection = Simpls::new(Matrix::new(2, 1, vec![1.0, 1.0]).unwrap());
        PreprocessingMap::new(vec![
            ("spectrum".to_string(), standardize(&[0.0, 0.0], &[1.0, 2.0])),
            (
                "moisture".to_string(),
                Pipeline::new(vec![projection.into()]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn applies_each_named_pipeline() {
        let map = sample_map();
        let out = map
            .apply(&features(&[("spectrum", &[2.0, 4.0]), ("moisture", &[0.5, 0.25])]))
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out["spectrum"], vec![2.0, 2.0]);
        assert_eq!(out["moisture"], vec![0.75]);
    }

    #[test]
    fn extra_inputs_are_ignored() {
        let map = sample_map();
        let out = map
            .apply(&features(&[
                ("spectrum", &[2.0, 4.0]),
                ("moisture", &[1.0, 1.0]),
                ("operator_id", &[7.0]),
            ]))
            .unwrap();
        assert!(!out.contains_key("operator_id"));
    }

    #[test]
    fn missing_input_is_reported() {
        let map = sample_map();
        match map.apply(&features(&[("spectrum", &[2.0, 4.0])])) {
            Err(PymaError::MissingInput(name)) => assert_eq!(name, "moisture"),
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn ordered_output_follows_wire_order() {
        let map = sample_map();
        assert_eq!(map.ordering(), &["spectrum".to_string(), "moisture".to_string()]);
        let out = map
            .apply_ordered(&features(&[("moisture", &[1.0, 2.0]), ("spectrum", &[2.0, 4.0])]))
            .unwrap();
        assert_eq!(out, vec![vec![2.0, 2.0], vec![3.0]]);
        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["spectrum", "moisture"]);
    }

    #[test]
    fn inverse_round_trips_invertible_inputs() {
        let map = PreprocessingMap::new(vec![
            ("a".to_string(), standardize(&[1.0], &[2.0])),
            ("b".to_string(), standardize(&[-1.0, 3.0], &[0.5, 4.0])),
        ])
        .unwrap();
        let inputs = features(&[("a", &[5.0]), ("b", &[0.0, 11.0])]);
        let forward = map.apply(&inputs).unwrap();
        assert_eq!(map.apply_inverse(&forward).unwrap(), inputs);
        let ordered = map.apply_ordered_inverse(&forward).unwrap();
        assert_eq!(ordered, vec![vec![5.0], vec![0.0, 11.0]]);
    }

    #[test]
    fn inverse_with_forward_only_pipeline_fails() {
        let map = PreprocessingMap::new(vec![(
            "x".to_string(),
            Pipeline::new(vec![Log::new(10.0, 0.0).into()]),
        )])
        .unwrap();
        assert!(matches!(
            map.apply_inverse(&features(&[("x", &[1.0])])),
            Err(PymaError::UnsupportedInverse("Log"))
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = PreprocessingMap::new(vec![
            ("x".to_string(), Pipeline::default()),
            ("x".to_string(), Pipeline::default()),
        ]);
        assert!(matches!(result, Err(PymaError::DuplicateInput(name)) if name == "x"));
    }
}
