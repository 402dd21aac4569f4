use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::core::{PortSet, ProbeResult, ScanObserver, ScanReport};
use crate::dns::Target;

pub struct OutputHandler {
    progress: bool,
}

impl OutputHandler {
    pub fn new(progress: bool) -> OutputHandler {
        OutputHandler { progress }
    }

    pub fn header(&self, target: &Target, ports: &PortSet, timeout_secs: f64) {
        println!("Scanning {} ({})", target.raw_input, target.resolved_address);
        println!("Ports: {}  Timeout: {}s", ports, timeout_secs);
    }

    /// Progress bar on stderr, advanced once per probe result.
    ///
    /// indicatif hides the bar on its own when stderr is not a terminal.
    pub fn begin(&self, total: usize) -> ConsoleProgress {
        let bar = if self.progress {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{percent:>3}%|{bar:25.cyan/blue}| {pos}/{len} \
                         [{elapsed_precise}<{eta_precise}]",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏ "),
            );
            bar
        } else {
            ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden())
        };
        ConsoleProgress { bar }
    }

    pub fn summary(&self, report: &ScanReport) {
        if report.cancelled {
            println!("{}", "Scan interrupted; results are partial.".yellow());
        }

        println!();
        println!("Scan completed in {:.2}s", report.elapsed_seconds());

        if report.open_ports.is_empty() {
            println!("No open ports found (within scanned range).");
        } else {
            let joined = report
                .open_ports
                .iter()
                .map(|port| port.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("Open ports: {}", joined.green().bold());
        }
    }
}

pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ScanObserver for ConsoleProgress {
    fn on_result(&mut self, _result: &ProbeResult) {
        self.bar.inc(1);
    }

    fn on_open(&mut self, port: u16) {
        let line = format!("{} Port {:5} {}", "[+]".green().bold(), port, "OPEN".green());
        // Suspend the bar so the line lands on stdout without tearing it.
        self.bar.suspend(|| println!("{}", line));
    }
}
