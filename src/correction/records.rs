use nalgebra::Vector3;

use crate::{
    bias::IgpGrid,
    constants::SPEED_OF_LIGHT_M_S,
    prelude::SV,
};

use super::measurement::Usability;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SBAS satellite corrections (SAT record) applicable to one
/// satellite at one epoch. Clock terms are expressed in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatCorrection {
    /// [SV]
    pub sv: SV,
    /// Broadcast position (ECEF) [m]
    pub position_ecef_m: Vector3<f64>,
    /// Broadcast velocity (ECEF) [m.s⁻¹]
    pub velocity_ecef_m_s: Vector3<f64>,
    /// Broadcast clock offset [m]
    pub clock_m: f64,
    /// Total group delay [m]
    pub tgd_m: f64,
    /// Fast correction [m]
    pub fast_correction_m: f64,
    /// Long term position correction (ECEF) [m]
    pub ltc_position_m: Vector3<f64>,
    /// Long term clock correction [m]
    pub ltc_clock_m: f64,
    /// UDRE indicator
    pub udrei: u8,
    /// UDRE sigma [m]
    pub sigma_udre_m: f64,
    /// Message type 27/28 UDRE degradation factor
    pub delta_udre: f64,
    /// Fast correction degradation [m]
    pub eps_fc_m: f64,
    /// Range rate correction degradation [m]
    pub eps_rrc_m: f64,
    /// Long term correction degradation [m]
    pub eps_ltc_m: f64,
    /// En route through NPA degradation [m]
    pub eps_er_m: f64,
    /// Degradation terms are root sum squared (message type 10)
    pub rss_udre: bool,
}

impl SatCorrection {
    /// Service level this satellite may be used for
    pub fn usability(&self) -> Usability {
        Usability::from_udrei(self.udrei)
    }

    /// Position corrected with the long term correction [m]
    pub fn corrected_position(&self) -> Vector3<f64> {
        self.position_ecef_m + self.ltc_position_m
    }

    /// Relativistic clock correction [m]
    pub fn relativistic_clock_m(&self) -> f64 {
        -2.0 * self.position_ecef_m.norm() * self.velocity_ecef_m_s.norm() / SPEED_OF_LIGHT_M_S
    }

    /// Fully corrected clock offset [m]
    pub fn corrected_clock_m(&self) -> f64 {
        self.clock_m + self.relativistic_clock_m() - self.tgd_m
            + self.fast_correction_m
            + self.ltc_clock_m
    }
}

/// SBAS line of sight corrections (LOS record) applicable to one
/// satellite at one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LosCorrection {
    /// [SV]
    pub sv: SV,
    /// Pierce point latitude [°]
    pub ipp_lat_deg: f64,
    /// Pierce point longitude [°]
    pub ipp_lon_deg: f64,
    /// Surrounding [IgpGrid]
    pub grid: IgpGrid,
}
