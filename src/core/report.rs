use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::core::probe::ProbeResult;
use crate::core::scheduler::ProbeStream;

/// Final summary of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Open ports, ascending.
    pub open_ports: Vec<u16>,
    pub elapsed: Duration,
    /// Number of probe results consumed.
    pub probed: usize,
    /// True when the scan was torn down before every port was probed.
    pub cancelled: bool,
}

impl ScanReport {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Receives results as the scan progresses.
pub trait ScanObserver {
    /// Called for every result, open or not.
    fn on_result(&mut self, _result: &ProbeResult) {}

    /// Called once per port the first time it is seen open.
    fn on_open(&mut self, _port: u16) {}
}

impl<F: FnMut(u16)> ScanObserver for F {
    fn on_open(&mut self, port: u16) {
        self(port)
    }
}

/// Folds probe results into a [`ScanReport`].
#[derive(Debug)]
pub struct Aggregator {
    started: Instant,
    open: BTreeSet<u16>,
    probed: usize,
}

impl Aggregator {
    pub fn new(started: Instant) -> Aggregator {
        Aggregator {
            started,
            open: BTreeSet::new(),
            probed: 0,
        }
    }

    /// Record one result. Returns true the first time a port is seen open.
    pub fn record(&mut self, result: &ProbeResult) -> bool {
        self.probed += 1;
        result.is_open && self.open.insert(result.port)
    }

    pub fn finish(self, cancelled: bool) -> ScanReport {
        ScanReport {
            open_ports: self.open.into_iter().collect(),
            elapsed: self.started.elapsed(),
            probed: self.probed,
            cancelled,
        }
    }

    /// Drain `stream`, notifying `observer` as results arrive.
    ///
    /// `started` should be taken just before the scheduler was started so the
    /// elapsed time covers the whole scan.
    pub async fn aggregate<O>(
        started: Instant,
        stream: &mut ProbeStream,
        observer: &mut O,
    ) -> ScanReport
    where
        O: ScanObserver + ?Sized,
    {
        let mut aggregator = Aggregator::new(started);
        while let Some(result) = stream.next().await {
            observer.on_result(&result);
            if aggregator.record(&result) {
                observer.on_open(result.port);
            }
        }
        aggregator.finish(stream.is_cancelled())
    }
}
