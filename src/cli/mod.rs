//! Command-line front end: load state and feature rows from disk, run the
//! pipelines, print one JSON document per row.
//!
//! ```text
//!  --state model.pyma        --input rows.{json,csv,parquet}
//!        │                           │
//!        ▼                           ▼
//!  decode_named_map /          input::load_file
//!  decode_pipeline                   │
//!        │                           │
//!        └────────► apply ◄──────────┘
//!                     │
//!                     ▼
//!               JSON lines on stdout
//! ```

pub mod input;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use pyma_reader::{
    decode_named_map_with_options, decode_pipeline_with_options, Algorithm, DecodeOptions,
    Direction, FeatureMap, InvertibleAlgorithm, Pipeline, PreprocessingMap,
};

/// Apply serialized PyMA preprocessing to feature rows.
#[derive(Debug, Parser)]
#[command(name = "pyma-apply", version, about)]
pub struct Args {
    /// Serialized preprocessing state.
    #[arg(long)]
    pub state: PathBuf,

    /// Feature rows (.json, .csv, .parquet).
    #[arg(long)]
    pub input: PathBuf,

    /// Treat the state as a single pipeline instead of a named map.
    #[arg(long)]
    pub pipeline: bool,

    /// Feature fed to a single pipeline; needed when rows have several.
    #[arg(long, requires = "pipeline")]
    pub feature: Option<String>,

    /// Run inverse transforms.
    #[arg(long)]
    pub inverse: bool,

    /// Emit each row as an array in the map's input order.
    #[arg(long, conflicts_with = "pipeline")]
    pub ordered: bool,

    /// JSON file with decoder options.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Maximum pipeline nesting depth (overrides the options file).
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl Args {
    fn direction(&self) -> Direction {
        if self.inverse {
            Direction::Inverse
        } else {
            Direction::Forward
        }
    }

    fn decode_options(&self) -> Result<DecodeOptions> {
        let mut opts = match &self.options {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading options file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing options file {}", path.display()))?
            }
            None => DecodeOptions::default(),
        };
        if let Some(depth) = self.max_depth {
            opts = opts.with_max_depth(depth);
        }
        Ok(opts)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the command, returning the number of rows written.
pub fn run(args: &Args) -> Result<usize> {
    let opts = args.decode_options()?;
    let rows = input::load_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    log::info!("Loaded {} rows from {}", rows.len(), args.input.display());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.pipeline {
        let pipeline = open_state(&args.state, |r| decode_pipeline_with_options(r, &opts))?;
        for (i, row) in rows.iter().enumerate() {
            let values = run_pipeline(&pipeline, row, args.feature.as_deref(), args.direction())
                .with_context(|| format!("row {i}"))?;
            write_line(&mut out, &values)?;
        }
    } else {
        let map = open_state(&args.state, |r| decode_named_map_with_options(r, &opts))?;
        for (i, row) in rows.iter().enumerate() {
            if args.ordered {
                let values = map
                    .apply_ordered_with(row, args.direction())
                    .with_context(|| format!("row {i}"))?;
                write_line(&mut out, &values)?;
            } else {
                let values = run_map(&map, row, args.direction())
                    .with_context(|| format!("row {i}"))?;
                write_line(&mut out, &values)?;
            }
        }
    }

    out.flush().context("flushing output")?;
    Ok(rows.len())
}

fn open_state<T, F>(path: &Path, decode: F) -> Result<T>
where
    F: FnOnce(BufReader<File>) -> pyma_reader::Result<T>,
{
    let file = File::open(path).with_context(|| format!("opening state {}", path.display()))?;
    decode(BufReader::new(file)).with_context(|| format!("decoding state {}", path.display()))
}

/// Pick the single feature a pipeline consumes from a row.
fn select_feature<'a>(row: &'a FeatureMap, feature: Option<&str>) -> Result<&'a [f64]> {
    match feature {
        Some(name) => row
            .get(name)
            .map(Vec::as_slice)
            .with_context(|| format!("missing feature '{name}'")),
        None => {
            let mut values = row.values();
            match (values.next(), values.next()) {
                (Some(only), None) => Ok(only.as_slice()),
                (None, _) => bail!("row has no features"),
                (Some(_), Some(_)) => bail!(
                    "row has {} features; choose one with --feature",
                    row.len()
                ),
            }
        }
    }
}

fn run_pipeline(
    pipeline: &Pipeline,
    row: &FeatureMap,
    feature: Option<&str>,
    direction: Direction,
) -> Result<Vec<f64>> {
    let data = select_feature(row, feature)?;
    let values = match direction {
        Direction::Forward => pipeline.apply(data)?,
        Direction::Inverse => pipeline.apply_inverse(data)?,
    };
    Ok(values)
}

fn run_map(map: &PreprocessingMap, row: &FeatureMap, direction: Direction) -> Result<FeatureMap> {
    Ok(map.apply_with(row, direction)?)
}

fn write_line<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("writing JSON output")?;
    out.write_all(b"\n").context("writing JSON output")?;
    Ok(())
}
