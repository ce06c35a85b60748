use nalgebra::Vector3;

use crate::{
    preprocessing::PreprocessedMeasurement,
    prelude::{EpochTag, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SBAS service level a satellite may contribute to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Usability {
    /// Do not use
    #[default]
    NotUsed = 0,
    /// Usable for precision approach
    PrecisionApproach = 1,
    /// Usable for non precision approach only
    NonPrecisionApproach = 2,
}

impl std::fmt::Display for Usability {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotUsed => write!(f, "not used"),
            Self::PrecisionApproach => write!(f, "PA"),
            Self::NonPrecisionApproach => write!(f, "NPA"),
        }
    }
}

impl Usability {
    /// Classification from the UDRE indicator
    pub fn from_udrei(udrei: u8) -> Self {
        match udrei {
            0..=11 => Self::PrecisionApproach,
            12 | 13 => Self::NonPrecisionApproach,
            _ => Self::NotUsed,
        }
    }

    /// Flag, as reported in output files
    pub fn flag(&self) -> u8 {
        *self as u8
    }
}

/// SBAS corrected measurement, one per converged satellite and epoch.
/// Everything remains null unless the satellite is usable for PA.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrectedMeasurement {
    /// [EpochTag]
    pub tag: EpochTag,
    /// [SV]
    pub sv: SV,
    /// Elevation [°]
    pub elevation_deg: f64,
    /// Azimuth [°]
    pub azimuth_deg: f64,
    /// Pierce point latitude [°]
    pub ipp_lat_deg: f64,
    /// Pierce point longitude [°]
    pub ipp_lon_deg: f64,
    /// [Usability]
    pub usability: Usability,
    /// Corrected satellite position (ECEF) [m]
    pub sat_position_ecef_m: Vector3<f64>,
    /// Corrected satellite clock [m]
    pub sat_clock_m: f64,
    /// User ionospheric slant delay [m]
    pub uisd_m: f64,
    /// Slant tropospheric delay [m]
    pub std_m: f64,
    /// Corrected pseudo range [m]
    pub corrected_psr_m: f64,
    /// Distance between corrected satellite position and receiver [m]
    pub geometric_range_m: f64,
    /// Pseudo range residual [m]
    pub residual_m: f64,
    /// Pseudo range residual, receiver clock removed [m]
    pub clock_free_residual_m: f64,
    /// Fast and long term correction residual error [m]
    pub sigma_flt_m: f64,
    /// User ionospheric range error [m]
    pub sigma_uire_m: f64,
    /// Tropospheric residual error [m]
    pub sigma_tropo_m: f64,
    /// Airborne multipath [m]
    pub sigma_multipath_m: f64,
    /// Airborne noise and divergence [m]
    pub sigma_noise_div_m: f64,
    /// Total airborne error [m]
    pub sigma_airborne_m: f64,
    /// User equivalent range error [m]
    pub sigma_uere_m: f64,
}

impl CorrectedMeasurement {
    /// Null record, for a satellite that cannot be corrected
    pub(crate) fn unused(meas: &PreprocessedMeasurement) -> Self {
        Self {
            tag: meas.tag,
            sv: meas.sv,
            elevation_deg: meas.elevation_deg,
            azimuth_deg: meas.azimuth_deg,
            ipp_lat_deg: 0.0,
            ipp_lon_deg: 0.0,
            usability: Usability::NotUsed,
            sat_position_ecef_m: Vector3::zeros(),
            sat_clock_m: 0.0,
            uisd_m: 0.0,
            std_m: 0.0,
            corrected_psr_m: 0.0,
            geometric_range_m: 0.0,
            residual_m: 0.0,
            clock_free_residual_m: 0.0,
            sigma_flt_m: 0.0,
            sigma_uire_m: 0.0,
            sigma_tropo_m: 0.0,
            sigma_multipath_m: 0.0,
            sigma_noise_div_m: 0.0,
            sigma_airborne_m: 0.0,
            sigma_uere_m: 0.0,
        }
    }

    /// True if this satellite contributes to the epoch estimates
    pub fn is_precision_approach(&self) -> bool {
        self.usability == Usability::PrecisionApproach
    }
}

/// Epoch wide estimates, from all PA satellites.
/// Undefined when no satellite could be used.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochClockEstimate {
    /// Receiver clock offset [m]
    pub receiver_clock_m: Option<f64>,
    /// ENT to GPS time offset [m]
    pub ent_gps_m: Option<f64>,
    /// Number of satellites that contributed
    pub nb_sv: usize,
}
