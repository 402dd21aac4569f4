use serde::Deserialize;
use std::time::Duration;

use crate::error::{Result, ScanError};
use crate::utils::seconds_to_duration;

pub const DEFAULT_TIMEOUT_SECS: f64 = 0.8;
pub const DEFAULT_WORKERS: usize = 100;

/// Environment variables with this prefix override the config file.
pub const ENV_PREFIX: &str = "PORTPROBE";

/// Settings that may come from a file or the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub timeout: f64,
    pub workers: usize,
    pub verbose: bool,
    pub progress: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            timeout: DEFAULT_TIMEOUT_SECS,
            workers: DEFAULT_WORKERS,
            verbose: false,
            progress: true,
        }
    }
}

impl FileSettings {
    /// Layer an optional file and `PORTPROBE_*` variables over the defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        builder =
            builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let settings = builder.build()?.try_deserialize::<FileSettings>()?;
        Ok(settings)
    }
}

/// Everything one scan needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub target: String,
    pub start_port: Option<u32>,
    pub end_port: Option<u32>,
    /// Per-probe connect timeout in seconds.
    pub timeout: f64,
    pub workers: usize,
    pub verbose: bool,
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: String::new(),
            start_port: None,
            end_port: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            workers: DEFAULT_WORKERS,
            verbose: false,
            progress: true,
        }
    }
}

impl Config {
    pub fn new(target: impl Into<String>) -> Self {
        Config {
            target: target.into(),
            ..Config::default()
        }
    }

    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.start_port = Some(start);
        self.end_port = Some(end);
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn apply(&mut self, settings: FileSettings) {
        self.timeout = settings.timeout;
        self.workers = settings.workers;
        self.verbose = settings.verbose;
        self.progress = settings.progress;
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(ScanError::config("no target specified"));
        }
        if seconds_to_duration(self.timeout).is_none() {
            return Err(ScanError::config(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout
            )));
        }
        if self.workers == 0 {
            return Err(ScanError::config("workers must be at least 1"));
        }
        Ok(())
    }

    pub fn timeout_duration(&self) -> Duration {
        seconds_to_duration(self.timeout).unwrap_or(Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }
}
