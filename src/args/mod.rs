use clap::Parser;

mod cli;
mod config;

pub use self::cli::Args;
pub use self::config::{Config, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, ENV_PREFIX, FileSettings};

use crate::error::Result;

/// Parse the command line and merge it over file and environment settings.
pub fn get_config() -> Result<Config> {
    resolve_config(Args::parse())
}

pub fn resolve_config(args: Args) -> Result<Config> {
    let mut config = Config::new(args.target);
    config.apply(FileSettings::load(args.config.as_deref())?);

    config.start_port = args.start_port;
    config.end_port = args.end_port;

    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    if args.verbose {
        config.verbose = true;
    }

    if args.no_progress {
        config.progress = false;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_defaults() {
        let args = Args::try_parse_from([
            "portprobe",
            "localhost",
            "20",
            "25",
            "--timeout",
            "0.5",
            "--workers",
            "10",
            "-v",
        ])
        .unwrap();
        let config = resolve_config(args).unwrap();
        assert_eq!(config.target, "localhost");
        assert_eq!((config.start_port, config.end_port), (Some(20), Some(25)));
        assert_eq!(config.timeout, 0.5);
        assert_eq!(config.workers, 10);
        assert!(config.verbose);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let args = Args::try_parse_from(["portprobe", "localhost", "-w", "0"]).unwrap();
        assert!(resolve_config(args).is_err());
    }
}
