use crate::{app_dirs::AppDirs, sample::SampleKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_TICK_RATE_MS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_rate_ms: u64,
    pub source: SampleKind,
    pub samples_file: Option<PathBuf>,
    pub generated_sentences: usize,
    pub show_wrong_percent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            source: SampleKind::Builtin,
            samples_file: None,
            generated_sentences: 1,
            show_wrong_percent: true,
        }
    }
}

/// Command line settings layered on top of the stored config
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub tick_rate_ms: Option<u64>,
    pub source: Option<SampleKind>,
    pub samples_file: Option<PathBuf>,
    pub generated_sentences: Option<usize>,
    pub hide_wrong_percent: bool,
}

impl Config {
    pub fn with_overrides(mut self, o: &Overrides) -> Self {
        if let Some(ms) = o.tick_rate_ms {
            self.tick_rate_ms = ms;
        }
        if let Some(path) = &o.samples_file {
            self.samples_file = Some(path.clone());
            self.source = SampleKind::File;
        }
        // an explicit source beats the one implied by --file
        if let Some(source) = o.source {
            self.source = source;
        }
        if let Some(n) = o.generated_sentences {
            self.generated_sentences = n;
        }
        if o.hide_wrong_percent {
            self.show_wrong_percent = false;
        }
        self
    }

    /// Tick interval, never below 10ms
    pub fn tick_rate_ms(&self) -> u64 {
        self.tick_rate_ms.max(10)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
