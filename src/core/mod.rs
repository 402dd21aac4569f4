use std::time::Instant;
use tracing::debug;

use crate::args::Config;
use crate::dns::{DNSResolver, Target};
use crate::error::Result;
use crate::output::OutputHandler;

mod ports;
mod probe;
mod report;
pub mod scheduler;

pub use ports::{MAX_PORT, MIN_PORT, PortSet, WELL_KNOWN_PORTS};
pub use probe::{ProbeResult, probe};
pub use report::{Aggregator, ScanObserver, ScanReport};
pub use scheduler::{CancelHandle, ProbeStream};

pub struct Scanner {
    pub config: Config,
    pub dns: DNSResolver,
}

impl Scanner {
    pub fn new(config: Config) -> Scanner {
        Scanner {
            config,
            dns: DNSResolver::new(),
        }
    }

    /// Validate the port range and resolve the target.
    ///
    /// Both checks happen before any probe is sent; either failure aborts the scan.
    pub async fn prepare(&self) -> Result<(Target, PortSet)> {
        let ports = PortSet::build(self.config.start_port, self.config.end_port)?;
        let target = self.dns.resolve(&self.config.target).await?;
        Ok((target, ports))
    }

    /// Start probing `ports` on `target` with the configured timeout and workers.
    pub fn start(&self, target: &Target, ports: PortSet) -> ProbeStream {
        scheduler::run(
            target.address(),
            ports,
            self.config.timeout_duration(),
            self.config.workers,
        )
    }

    /// Run a complete scan without console output.
    pub async fn scan<O>(&self, observer: &mut O) -> Result<ScanReport>
    where
        O: ScanObserver + ?Sized,
    {
        let (target, ports) = self.prepare().await?;
        let started = Instant::now();
        let mut stream = self.start(&target, ports);
        Ok(Aggregator::aggregate(started, &mut stream, observer).await)
    }

    /// Run a scan, printing progress and the summary, and stop early on Ctrl-C.
    pub async fn exec(&self) -> Result<ScanReport> {
        let (target, ports) = self.prepare().await?;
        let output = OutputHandler::new(self.config.progress);
        output.header(&target, &ports, self.config.timeout);

        let mut progress = output.begin(ports.len());
        let started = Instant::now();
        let mut stream = self.start(&target, ports);

        let cancel = stream.cancel_handle();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        let report = Aggregator::aggregate(started, &mut stream, &mut progress).await;
        interrupt.abort();
        progress.finish();

        debug!(
            probed = report.probed,
            open = report.open_ports.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scan finished"
        );
        output.summary(&report);
        Ok(report)
    }
}
