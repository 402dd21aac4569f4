use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::core::ports::PortSet;
use crate::core::probe::{ProbeResult, probe};

/// Stops a running scan from submitting further probes.
///
/// Probes already in flight are left to finish; each is bounded by its own
/// timeout, after which the result stream ends.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    slots: Arc<Semaphore>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if !self.slots.is_closed() {
            info!("cancelling scan, no further ports will be probed");
            self.slots.close();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.slots.is_closed()
    }
}

/// Results of a running scan, in the order probes complete.
///
/// Finite and single use: once [`ProbeStream::next`] returns `None` every
/// submitted probe has reported.
pub struct ProbeStream {
    rx: mpsc::Receiver<ProbeResult>,
    cancel: CancelHandle,
    dispatcher: JoinHandle<()>,
}

impl ProbeStream {
    pub async fn next(&mut self) -> Option<ProbeResult> {
        self.rx.recv().await
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ProbeStream {
    fn drop(&mut self) {
        // Nobody is listening anymore; stop dispatching.
        self.cancel.slots.close();
        self.dispatcher.abort();
    }
}

/// Start probing every port in `ports` against `address`, with at most
/// `concurrency` connection attempts in flight.
///
/// Must be called from within a tokio runtime.
pub fn run(
    address: IpAddr,
    ports: PortSet,
    timeout: Duration,
    concurrency: usize,
) -> ProbeStream {
    run_with(address, ports, timeout, concurrency, probe)
}

/// Like [`run`], with the connection attempt supplied by the caller.
pub(crate) fn run_with<P, Fut>(
    address: IpAddr,
    ports: PortSet,
    timeout: Duration,
    concurrency: usize,
    probe_fn: P,
) -> ProbeStream
where
    P: Fn(IpAddr, u16, Duration) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ProbeResult> + Send + 'static,
{
    let concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let slots = Arc::new(Semaphore::new(concurrency));
    let (tx, rx) = mpsc::channel(concurrency);

    debug!(
        %address,
        ports = ports.len(),
        concurrency,
        timeout_ms = timeout.as_millis() as u64,
        "dispatching probes"
    );

    let dispatcher = tokio::spawn(dispatch(address, ports, timeout, slots.clone(), tx, probe_fn));

    ProbeStream {
        rx,
        cancel: CancelHandle { slots },
        dispatcher,
    }
}

async fn dispatch<P, Fut>(
    address: IpAddr,
    ports: PortSet,
    timeout: Duration,
    slots: Arc<Semaphore>,
    tx: mpsc::Sender<ProbeResult>,
    probe_fn: P,
) where
    P: Fn(IpAddr, u16, Duration) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ProbeResult> + Send + 'static,
{
    let mut workers = JoinSet::new();

    for port in ports {
        // A closed semaphore means the scan was cancelled.
        let permit = match slots.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                debug!(next_port = port, "scan cancelled, stopping dispatch");
                break;
            }
        };

        let tx = tx.clone();
        let probe_fn = probe_fn.clone();
        workers.spawn(async move {
            let result = probe_fn(address, port, timeout).await;
            // Hold the slot until the result is handed over so a slow consumer
            // throttles dispatch instead of piling up finished tasks.
            let _ = tx.send(result).await;
            drop(permit);
            port
        });

        while let Some(joined) = workers.try_join_next() {
            log_worker_failure(joined);
        }
    }

    // The stream ends once the last worker drops its sender.
    drop(tx);

    while let Some(joined) = workers.join_next().await {
        log_worker_failure(joined);
    }
}

fn log_worker_failure(joined: Result<u16, tokio::task::JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "probe worker failed, port omitted from results");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    async fn drain(stream: &mut ProbeStream) -> Vec<ProbeResult> {
        let mut results = Vec::new();
        while let Some(result) = stream.next().await {
            results.push(result);
        }
        results
    }

    #[tokio::test]
    async fn every_port_reports_exactly_once() {
        let ports = PortSet::range(40000, 40199).unwrap();
        let mut stream = run(LOCALHOST, ports.clone(), Duration::from_millis(200), 16);

        let results = drain(&mut stream).await;
        assert_eq!(results.len(), ports.len());

        let seen: HashSet<u16> = results.iter().map(|r| r.port).collect();
        let expected: HashSet<u16> = ports.iter().collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn open_listener_is_reported_open() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let ports = PortSet::range(port as u32, port as u32).unwrap();

        let mut stream = run(LOCALHOST, ports, Duration::from_millis(500), 4);
        let results = drain(&mut stream).await;
        assert_eq!(results, vec![ProbeResult::new(port, true)]);
    }

    #[tokio::test]
    async fn zero_concurrency_still_makes_progress() {
        let ports = PortSet::range(41000, 41004).unwrap();
        let mut stream = run(LOCALHOST, ports, Duration::from_millis(200), 0);
        assert_eq!(drain(&mut stream).await.len(), 5);
    }

    #[tokio::test]
    async fn panicking_worker_is_left_out_of_results() {
        let ports = PortSet::range(50, 59).unwrap();
        let failing = |_address: IpAddr, port: u16, _timeout: Duration| async move {
            if port == 55 {
                panic!("connect machinery failed");
            }
            ProbeResult::new(port, port == 52)
        };

        let mut stream = run_with(LOCALHOST, ports, Duration::from_millis(200), 3, failing);
        let results = drain(&mut stream).await;

        let seen: Vec<u16> = {
            let mut ports: Vec<u16> = results.iter().map(|r| r.port).collect();
            ports.sort_unstable();
            ports
        };
        assert_eq!(seen, vec![50, 51, 52, 53, 54, 56, 57, 58, 59]);
        assert_eq!(results.iter().filter(|r| r.is_open).count(), 1);
    }

    #[tokio::test]
    async fn cancelling_before_consumption_stops_dispatch() {
        let ports = PortSet::range(1, 65535).unwrap();
        let mut stream = run(LOCALHOST, ports, Duration::from_millis(200), 2);
        stream.cancel_handle().cancel();

        let results = drain(&mut stream).await;
        assert!(stream.is_cancelled());
        assert!(results.len() < 65535);
    }
}
