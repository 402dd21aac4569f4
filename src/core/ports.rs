use std::fmt;
use tracing::warn;

use crate::error::{RangeViolation, Result, ScanError};

/// Ports commonly bound by standard services, scanned when no range is given.
pub const WELL_KNOWN_PORTS: [u16; 25] = [
    21, 22, 23, 25, 53, 80, 110, 111, 123, 139, 143, 161, 162, 389, 443, 445, 587, 636, 993, 995,
    1723, 3306, 3389, 5900, 8080,
];

pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65535;

/// Strictly increasing, duplicate free list of ports to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSet {
    ports: Vec<u16>,
}

impl PortSet {
    /// Build the candidate ports from optional range bounds.
    ///
    /// Both bounds absent selects [`WELL_KNOWN_PORTS`]. Both present selects the
    /// inclusive range after checking `1 <= start <= end <= 65535`. A single
    /// bound also falls back to the well-known list, with a warning so a
    /// mistyped argument does not go unnoticed.
    pub fn build(start: Option<u32>, end: Option<u32>) -> Result<PortSet> {
        match (start, end) {
            (Some(start), Some(end)) => Self::range(start, end),
            (None, None) => Ok(Self::well_known()),
            (Some(bound), None) | (None, Some(bound)) => {
                warn!(
                    port = bound,
                    "only one range bound given, scanning the well-known ports instead"
                );
                Ok(Self::well_known())
            }
        }
    }

    pub fn well_known() -> PortSet {
        PortSet {
            ports: WELL_KNOWN_PORTS.to_vec(),
        }
    }

    pub fn range(start: u32, end: u32) -> Result<PortSet> {
        if start < MIN_PORT {
            return Err(ScanError::InvalidRange(RangeViolation::StartBelowMinimum { start }));
        }
        if end > MAX_PORT {
            return Err(ScanError::InvalidRange(RangeViolation::EndAboveMaximum { end }));
        }
        if start > end {
            return Err(ScanError::InvalidRange(RangeViolation::StartAfterEnd { start, end }));
        }

        // Bounds are checked above, so both fit in a u16.
        let ports = (start as u16..=end as u16).collect();
        Ok(PortSet { ports })
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn first(&self) -> Option<u16> {
        self.ports.first().copied()
    }

    pub fn last(&self) -> Option<u16> {
        self.ports.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.ports
    }
}

impl IntoIterator for PortSet {
    type Item = u16;
    type IntoIter = std::vec::IntoIter<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.into_iter()
    }
}

/// `first-last`, or just `first` for a single port.
impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) if first != last => write!(f, "{}-{}", first, last),
            (Some(first), _) => write!(f, "{}", first),
            _ => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bounds_selects_well_known_list() {
        let ports = PortSet::build(None, None).unwrap();
        assert_eq!(ports.len(), 25);
        assert_eq!(ports.as_slice(), &WELL_KNOWN_PORTS);
        assert_eq!(ports.to_string(), "21-8080");
    }

    #[test]
    fn well_known_list_is_strictly_increasing() {
        assert!(WELL_KNOWN_PORTS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn single_bound_falls_back_to_well_known_list() {
        assert_eq!(PortSet::build(Some(80), None).unwrap(), PortSet::well_known());
        assert_eq!(PortSet::build(None, Some(443)).unwrap(), PortSet::well_known());
    }

    #[test]
    fn valid_ranges_cover_every_port_once() {
        for (start, end) in [(1, 1), (20, 25), (1, 1024), (65000, 65535), (1, 65535)] {
            let ports = PortSet::build(Some(start), Some(end)).unwrap();
            assert_eq!(ports.len() as u32, end - start + 1);
            assert_eq!(ports.first(), Some(start as u16));
            assert_eq!(ports.last(), Some(end as u16));
            assert!(ports.as_slice().windows(2).all(|w| w[0] + 1 == w[1]));
        }
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = PortSet::build(Some(100), Some(50)).unwrap_err();
        assert!(matches!(
            err,
            ScanError::InvalidRange(RangeViolation::StartAfterEnd {
                start: 100,
                end: 50
            })
        ));
    }

    #[test]
    fn out_of_bounds_values_are_rejected() {
        assert!(matches!(
            PortSet::build(Some(0), Some(10)),
            Err(ScanError::InvalidRange(RangeViolation::StartBelowMinimum { start: 0 }))
        ));
        assert!(matches!(
            PortSet::build(Some(1), Some(65536)),
            Err(ScanError::InvalidRange(RangeViolation::EndAboveMaximum { end: 65536 }))
        ));
        assert!(matches!(
            PortSet::build(Some(70000), Some(80000)),
            Err(ScanError::InvalidRange(_))
        ));
    }

    #[test]
    fn single_port_range_displays_one_number() {
        let ports = PortSet::build(Some(22), Some(22)).unwrap();
        assert_eq!(ports.to_string(), "22");
    }
}
