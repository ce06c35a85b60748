use crate::{
    constants::UNDEFINED,
    prelude::{EpochTag, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reason why a measurement was rejected by the preprocessor.
/// Causes are listed in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RejectionCause {
    /// Too many satellites in view for the receiver channels
    Channels = 1,
    /// Elevation below masking angle
    MaskAngle = 2,
    /// Carrier to noise ratio too low
    MinCnr = 3,
    /// Pseudo range out of range
    MaxPsrOutOfRange = 4,
    /// Cycle slip declared
    CycleSlip = 5,
    /// Data gap exceeding the Hatch filter gap threshold
    DataGap = 6,
    /// Phase rate too high
    MaxPhaseRate = 7,
    /// Phase rate step too high
    MaxPhaseRateStep = 8,
    /// Code rate too high
    MaxCodeRate = 9,
    /// Code rate step too high
    MaxCodeRateStep = 10,
}

impl std::fmt::Display for RejectionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Channels => write!(f, "number of channels exceeded"),
            Self::MaskAngle => write!(f, "below masking angle"),
            Self::MinCnr => write!(f, "C/N0 too low"),
            Self::MaxPsrOutOfRange => write!(f, "pseudo range out of range"),
            Self::CycleSlip => write!(f, "cycle slip"),
            Self::DataGap => write!(f, "data gap"),
            Self::MaxPhaseRate => write!(f, "phase rate too high"),
            Self::MaxPhaseRateStep => write!(f, "phase rate step too high"),
            Self::MaxCodeRate => write!(f, "code rate too high"),
            Self::MaxCodeRateStep => write!(f, "code rate step too high"),
        }
    }
}

impl RejectionCause {
    /// Numerical code, as reported in output files
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// True if this rejection leads to a Hatch filter reset
    pub fn resets_filter(&self) -> bool {
        !matches!(
            self,
            Self::Channels | Self::MaskAngle | Self::MinCnr | Self::MaxPsrOutOfRange
        )
    }
}

/// Cleaned and smoothed measurement, produced once per satellite and epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PreprocessedMeasurement {
    /// [EpochTag]
    pub tag: EpochTag,
    /// [SV]
    pub sv: SV,
    /// Elevation [°]
    pub elevation_deg: f64,
    /// Azimuth [°]
    pub azimuth_deg: f64,
    /// Raw L1 C/A pseudo range [m]
    pub c1_m: f64,
    /// Raw L1 phase [cycles]
    pub l1_cycles: f64,
    /// Carrier to noise ratio [dB.Hz]
    pub s1_dbhz: f64,
    /// False if the measurement may not be used this epoch
    pub valid: bool,
    /// [RejectionCause], when rejected
    pub rejection: Option<RejectionCause>,
    /// Hatch filter time index [s]
    pub ksmooth_s: f64,
    /// Hatch smoothed pseudo range [m].
    /// Undefined when the satellite was rejected before smoothing.
    pub smoothed_c1_m: Option<f64>,
    /// Phase rate [m.s⁻¹]
    pub phase_rate: Option<f64>,
    /// Phase rate step [m.s⁻²]
    pub phase_rate_step: Option<f64>,
    /// Smoothed code rate [m.s⁻¹]
    pub code_rate: Option<f64>,
    /// Smoothed code rate step [m.s⁻²]
    pub code_rate_step: Option<f64>,
    /// True once the Hatch filter has converged
    pub converged: bool,
    /// Geometry free combination [m]
    pub geometry_free_m: Option<f64>,
    /// Vertical TEC rate [mm.s⁻¹]
    pub vtec_rate_mm_s: Option<f64>,
    /// Instantaneous AATR [mm.s⁻¹]
    pub iaatr_mm_s: Option<f64>,
}

impl PreprocessedMeasurement {
    pub(crate) fn new(
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
            valid: true,
            rejection: None,
            ksmooth_s: 0.0,
            smoothed_c1_m: None,
            phase_rate: None,
            phase_rate_step: None,
            code_rate: None,
            code_rate_step: None,
            converged: false,
            geometry_free_m: None,
            vtec_rate_mm_s: None,
            iaatr_mm_s: None,
        }
    }

    pub(crate) fn reject(&mut self, cause: RejectionCause) {
        self.valid = false;
        self.rejection = Some(cause);
    }

    /// Rejection code, 0 when not rejected
    pub fn rejection_code(&self) -> u8 {
        self.rejection.map(|cause| cause.code()).unwrap_or(0)
    }

    /// Convergence status: 1 once converged, 0 otherwise
    pub fn status(&self) -> u8 {
        if self.converged {
            1
        } else {
            0
        }
    }

    /// Smoothed pseudo range [m], or [UNDEFINED] when not defined at this epoch
    pub fn smoothed_c1_or_sentinel(&self) -> f64 {
        self.smoothed_c1_m.unwrap_or(UNDEFINED)
    }

    /// Phase rate [m.s⁻¹], or [UNDEFINED] when not defined at this epoch
    pub fn phase_rate_or_sentinel(&self) -> f64 {
        self.phase_rate.unwrap_or(UNDEFINED)
    }

    /// Phase rate step [m.s⁻²], or [UNDEFINED] when not defined at this epoch
    pub fn phase_rate_step_or_sentinel(&self) -> f64 {
        self.phase_rate_step.unwrap_or(UNDEFINED)
    }

    /// Code rate [m.s⁻¹], or [UNDEFINED] when not defined at this epoch
    pub fn code_rate_or_sentinel(&self) -> f64 {
        self.code_rate.unwrap_or(UNDEFINED)
    }

    /// Code rate step [m.s⁻²], or [UNDEFINED] when not defined at this epoch
    pub fn code_rate_step_or_sentinel(&self) -> f64 {
        self.code_rate_step.unwrap_or(UNDEFINED)
    }

    /// VTEC rate [mm.s⁻¹], or [UNDEFINED] when not defined at this epoch
    pub fn vtec_rate_or_sentinel(&self) -> f64 {
        self.vtec_rate_mm_s.unwrap_or(UNDEFINED)
    }

    /// Instantaneous AATR [mm.s⁻¹], or [UNDEFINED] when not defined at this epoch
    pub fn iaatr_or_sentinel(&self) -> f64 {
        self.iaatr_mm_s.unwrap_or(UNDEFINED)
    }
}
