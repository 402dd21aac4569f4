use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(about = "Minimal concurrent TCP connect port scanner")]
#[command(version)]
pub struct Args {
    /// IPv4 address or hostname to scan
    pub target: String,

    /// First port of the range (inclusive). Without both bounds the well-known ports are scanned
    pub start_port: Option<u32>,

    /// Last port of the range (inclusive)
    pub end_port: Option<u32>,

    /// Connect timeout per probe in seconds [default: 0.8]
    #[arg(short = 't', long = "timeout")]
    pub timeout: Option<f64>,

    /// Number of concurrent probes [default: 100]
    #[arg(short = 'w', long = "workers")]
    pub workers: Option<usize>,

    /// Configuration file path. Note that CLI arguments override configuration file settings.
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Do not draw a progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_range_and_options_parse() {
        let args = Args::try_parse_from([
            "portprobe",
            "example.com",
            "1",
            "1024",
            "-t",
            "0.5",
            "-w",
            "10",
        ])
        .unwrap();
        assert_eq!(args.target, "example.com");
        assert_eq!(args.start_port, Some(1));
        assert_eq!(args.end_port, Some(1024));
        assert_eq!(args.timeout, Some(0.5));
        assert_eq!(args.workers, Some(10));
    }

    #[test]
    fn range_is_optional() {
        let args = Args::try_parse_from(["portprobe", "10.0.0.1"]).unwrap();
        assert_eq!(args.start_port, None);
        assert_eq!(args.end_port, None);
        assert_eq!(args.timeout, None);
        assert!(!args.verbose);
    }

    #[test]
    fn out_of_range_ports_still_parse() {
        let args = Args::try_parse_from(["portprobe", "10.0.0.1", "0", "70000"]).unwrap();
        assert_eq!(args.start_port, Some(0));
        assert_eq!(args.end_port, Some(70000));
    }

    #[test]
    fn target_is_required() {
        assert!(Args::try_parse_from(["portprobe"]).is_err());
    }
}
