use crate::{config::Config, error::SampleError};
use cgisf_lib::cgisf;
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

static SAMPLES_DIR: Dir = include_dir!("src/samples");

/// Shown as the target when no sample could be loaded
pub const UNAVAILABLE_SAMPLE: &str = "Sample text unavailable. Press Tab to try again.";

/// Where target texts come from
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SampleKind {
    #[default]
    Builtin,
    Generated,
    File,
}

/// Supplies target texts for new sessions
pub trait SampleSource {
    fn next_sample(&mut self) -> Result<String, SampleError>;
}

#[derive(Deserialize, Clone, Debug)]
pub struct SampleSet {
    pub name: String,
    pub sentences: Vec<String>,
}

impl SampleSet {
    pub fn builtin(name: &str) -> Result<Self, SampleError> {
        let file = SAMPLES_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| SampleError::UnknownSet(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| SampleError::UnknownSet(name.to_string()))?;
        Ok(serde_json::from_str(contents)?)
    }
}

fn pick(sentences: &[String], origin: &str) -> Result<String, SampleError> {
    sentences
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| SampleError::Empty(origin.to_string()))
}

/// Uniform pick from the sentence list compiled into the binary
#[derive(Debug, Clone)]
pub struct BuiltinSamples {
    set: SampleSet,
}

impl BuiltinSamples {
    pub fn new() -> Result<Self, SampleError> {
        Ok(Self {
            set: SampleSet::builtin("builtin")?,
        })
    }

    pub fn sentences(&self) -> &[String] {
        &self.set.sentences
    }
}

impl SampleSource for BuiltinSamples {
    fn next_sample(&mut self) -> Result<String, SampleError> {
        pick(&self.set.sentences, &self.set.name)
    }
}

/// Random nonsense sentences
#[derive(Debug, Clone, Copy)]
pub struct GeneratedSamples {
    sentences: usize,
}

impl GeneratedSamples {
    pub fn new(sentences: usize) -> Self {
        Self {
            sentences: sentences.max(1),
        }
    }
}

impl SampleSource for GeneratedSamples {
    fn next_sample(&mut self) -> Result<String, SampleError> {
        let rng = &mut rand::thread_rng();
        let text = (0..self.sentences)
            .map(|_| {
                cgisf(
                    rng.gen_range(1..3),
                    rng.gen_range(1..3),
                    rng.gen_range(1..5),
                    rng.gen_bool(0.5),
                    rng.gen_range(1..3),
                    rng.gen_bool(0.5),
                )
            })
            .collect::<String>();
        let text = text.trim();

        if text.is_empty() {
            return Err(SampleError::Empty("generator".to_string()));
        }
        Ok(text.to_string())
    }
}

/// One sample per non-blank line of a text file, re-read on every pick
#[derive(Debug, Clone)]
pub struct FileSamples {
    path: PathBuf,
}

impl FileSamples {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SampleSource for FileSamples {
    fn next_sample(&mut self) -> Result<String, SampleError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SampleError::Io {
            path: self.path.clone(),
            source,
        })?;
        let lines = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        pick(&lines, &self.path.display().to_string())
    }
}

/// The same custom prompt every time
#[derive(Debug, Clone)]
pub struct FixedSample(pub String);

impl SampleSource for FixedSample {
    fn next_sample(&mut self) -> Result<String, SampleError> {
        Ok(self.0.clone())
    }
}

/// Next target text, or the placeholder when the source fails
pub fn sample_or_placeholder(source: &mut dyn SampleSource) -> String {
    match source.next_sample() {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "sample source failed, using placeholder");
            UNAVAILABLE_SAMPLE.to_string()
        }
    }
}

/// Pick the sample source for the given settings. A custom prompt wins.
pub fn source_for(config: &Config, prompt: Option<String>) -> Box<dyn SampleSource> {
    if let Some(prompt) = prompt {
        return Box::new(FixedSample(prompt));
    }

    match config.source {
        SampleKind::Generated => Box::new(GeneratedSamples::new(config.generated_sentences)),
        SampleKind::File => match &config.samples_file {
            Some(path) => Box::new(FileSamples::new(path)),
            None => {
                warn!("file source selected without a samples file, using builtin");
                builtin_or_fallback()
            }
        },
        SampleKind::Builtin => builtin_or_fallback(),
    }
}

fn builtin_or_fallback() -> Box<dyn SampleSource> {
    match BuiltinSamples::new() {
        Ok(s) => Box::new(s),
        Err(err) => {
            warn!(error = %err, "builtin samples unavailable");
            Box::new(FixedSample(UNAVAILABLE_SAMPLE.to_string()))
        }
    }
}
