use crate::prelude::{Duration, Epoch, TimeScale, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Epoch as used throughout SBAS monitoring: second of day within day of year.
/// Ordering is chronological within a given year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochTag {
    /// Day of year (1..=366)
    pub doy: u16,
    /// Second of day (0..86400)
    pub sod: u32,
}

impl std::fmt::Display for EpochTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:03}:{:05}", self.doy, self.sod)
    }
}

impl EpochTag {
    /// Builds a new [EpochTag]
    pub const fn new(doy: u16, sod: u32) -> Self {
        Self { doy, sod }
    }

    /// Seconds elapsed since `rhs` (negative if `rhs` is later).
    /// Only meaningful within a single year.
    pub fn seconds_since(&self, rhs: &Self) -> f64 {
        let days = self.doy as f64 - rhs.doy as f64;
        days * 86_400.0 + self.sod as f64 - rhs.sod as f64
    }

    /// Converts to absolute [Epoch] in [TimeScale::GPST], for given year.
    pub fn to_epoch(&self, year: i32) -> Epoch {
        let jan1 = Epoch::from_gregorian(year, 1, 1, 0, 0, 0, 0, TimeScale::GPST);
        jan1 + Duration::from_days((self.doy as f64) - 1.0)
            + Duration::from_seconds(self.sod as f64)
    }
}

/// Raw observation of one satellite at one epoch, as reported
/// by the receiver (single frequency L1 C/A, optional L2 phase).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawObservation {
    /// [EpochTag] of observation
    pub tag: EpochTag,
    /// [SV] identity
    pub sv: SV,
    /// Elevation [°]
    pub elevation_deg: f64,
    /// Azimuth [°]
    pub azimuth_deg: f64,
    /// L1 C/A pseudo range [m]
    pub c1_m: f64,
    /// L1 carrier phase [cycles]
    pub l1_cycles: f64,
    /// L1 C/A carrier to noise ratio [dB.Hz]
    pub s1_dbhz: f64,
    /// L2 carrier phase [cycles], when tracked
    pub l2_cycles: Option<f64>,
}

impl RawObservation {
    /// Builds a single frequency [RawObservation]
    pub fn new(
        tag: EpochTag,
        sv: SV,
        elevation_deg: f64,
        azimuth_deg: f64,
        c1_m: f64,
        l1_cycles: f64,
        s1_dbhz: f64,
    ) -> Self {
        Self {
            tag,
            sv,
            elevation_deg,
            azimuth_deg,
            c1_m,
            l1_cycles,
            s1_dbhz,
            l2_cycles: None,
        }
    }

    /// Copies and returns [RawObservation] with L2 phase [cycles]
    pub fn with_l2_phase(&self, l2_cycles: f64) -> Self {
        let mut s = *self;
        s.l2_cycles = Some(l2_cycles);
        s
    }

    /// L2 phase, only if it is physically meaningful
    pub(crate) fn l2_phase(&self) -> Option<f64> {
        self.l2_cycles.filter(|l2| *l2 != 0.0)
    }
}
