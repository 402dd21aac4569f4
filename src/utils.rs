use std::net::Ipv4Addr;
use std::time::Duration;

/// Parse `input` as a dotted-quad IPv4 literal.
pub fn valid_ipv4(input: &str) -> Option<Ipv4Addr> {
    input.trim().parse::<Ipv4Addr>().ok()
}

/// Seconds as typed on the command line, rejecting values a timer cannot hold.
pub fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}
