use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_GPS_PRN, SECONDS_PER_DAY};

mod receiver;
pub use receiver::Receiver;

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{name}={value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("cycle slip detection window must contain at least one epoch")]
    NullCycleSlipWindow,
    #[error("hatch filter time constant must be strictly positive")]
    NullHatchTime,
    #[error("sampling rate must be strictly positive")]
    NullSamplingRate,
}

/// On/off criterion with its threshold
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Threshold {
    /// True when this criterion is applied
    #[cfg_attr(feature = "serde", serde(default))]
    pub enabled: bool,
    /// Threshold value, unit depends on the criterion
    pub value: f64,
}

impl Threshold {
    /// Builds an active [Threshold]
    pub const fn enabled(value: f64) -> Self {
        Self {
            enabled: true,
            value,
        }
    }

    /// Builds an inactive [Threshold]
    pub const fn disabled(value: f64) -> Self {
        Self {
            enabled: false,
            value,
        }
    }

    /// True if this criterion is active and `x` is above the threshold
    pub(crate) fn exceeded_by(&self, x: f64) -> bool {
        self.enabled && x > self.value
    }

    /// True if this criterion is active and `x` is below the threshold
    pub(crate) fn undershot_by(&self, x: f64) -> bool {
        self.enabled && x < self.value
    }
}

/// Cycle slip detector settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleSlipOpts {
    /// Turns the detector on/off
    #[cfg_attr(feature = "serde", serde(default = "default_cs_enabled"))]
    pub enabled: bool,
    /// Maximal phase residual to the 3 point extrapolation [cycles]
    #[cfg_attr(feature = "serde", serde(default = "default_cs_threshold"))]
    pub threshold_cycles: f64,
    /// Number of consecutive detections required to declare a slip.
    /// This is also the length of the detection buffer.
    #[cfg_attr(feature = "serde", serde(default = "default_cs_window"))]
    pub window: usize,
}

impl Default for CycleSlipOpts {
    fn default() -> Self {
        Self {
            enabled: default_cs_enabled(),
            threshold_cycles: default_cs_threshold(),
            window: default_cs_window(),
        }
    }
}

/// Hatch filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HatchOpts {
    /// Smoothing time constant [s]
    #[cfg_attr(feature = "serde", serde(default = "default_hatch_time"))]
    pub time_s: f64,
    /// The filter is declared converged once it has been running for
    /// more than `state_factor * time_s`
    #[cfg_attr(feature = "serde", serde(default = "default_hatch_state_factor"))]
    pub state_factor: f64,
    /// Data gap [s] above which the filter is reset
    #[cfg_attr(feature = "serde", serde(default = "default_gap_threshold"))]
    pub gap_threshold_s: f64,
}

impl Default for HatchOpts {
    fn default() -> Self {
        Self {
            time_s: default_hatch_time(),
            state_factor: default_hatch_state_factor(),
            gap_threshold_s: default_gap_threshold(),
        }
    }
}

/// Delays removed from the corrected pseudo range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modeling {
    /// Compensate for ionospheric delay (SBAS grid, +/- 10m)
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub iono_delay: bool,
    /// Compensate for tropospheric delay (MOPS model, +/- 10m)
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub tropo_delay: bool,
}

impl Default for Modeling {
    fn default() -> Self {
        Self {
            iono_delay: default_true(),
            tropo_delay: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_cs_enabled() -> bool {
    true
}

const fn default_cs_threshold() -> f64 {
    1.0
}

const fn default_cs_window() -> usize {
    3
}

const fn default_hatch_time() -> f64 {
    100.0
}

const fn default_hatch_state_factor() -> f64 {
    4.0
}

const fn default_gap_threshold() -> f64 {
    10.0
}

const fn default_sampling_rate() -> f64 {
    1.0
}

const fn default_nchannels() -> usize {
    10
}

const fn default_mask_angle() -> f64 {
    5.0
}

const fn default_elev_noise_threshold() -> f64 {
    20.0
}

const fn default_min_cnr() -> Threshold {
    Threshold::enabled(20.0)
}

const fn default_max_psr() -> Threshold {
    Threshold::enabled(330_000_000.0)
}

const fn default_max_code_rate() -> Threshold {
    Threshold::enabled(952.0)
}

const fn default_max_code_rate_step() -> Threshold {
    Threshold::enabled(10.0)
}

const fn default_max_phase_rate() -> Threshold {
    Threshold::enabled(952.0)
}

const fn default_max_phase_rate_step() -> Threshold {
    Threshold::enabled(10.0)
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Observation sampling period [s]
    #[cfg_attr(feature = "serde", serde(default = "default_sampling_rate"))]
    pub sampling_rate_s: f64,
    /// Number of GPS tracking channels of the receiver
    #[cfg_attr(feature = "serde", serde(default = "default_nchannels"))]
    pub nchannels_gps: usize,
    /// Masking angle [°], unless [Receiver] overrides it
    #[cfg_attr(feature = "serde", serde(default = "default_mask_angle"))]
    pub mask_angle_deg: f64,
    /// Minimal carrier to noise ratio [dB.Hz]
    #[cfg_attr(feature = "serde", serde(default = "default_min_cnr"))]
    pub min_cnr: Threshold,
    /// Maximal pseudo range [m]
    #[cfg_attr(feature = "serde", serde(default = "default_max_psr"))]
    pub max_psr: Threshold,
    /// Maximal (smoothed) code rate [m.s⁻¹]
    #[cfg_attr(feature = "serde", serde(default = "default_max_code_rate"))]
    pub max_code_rate: Threshold,
    /// Maximal (smoothed) code rate step [m.s⁻²]
    #[cfg_attr(feature = "serde", serde(default = "default_max_code_rate_step"))]
    pub max_code_rate_step: Threshold,
    /// Maximal phase rate [m.s⁻¹]
    #[cfg_attr(feature = "serde", serde(default = "default_max_phase_rate"))]
    pub max_phase_rate: Threshold,
    /// Maximal phase rate step [m.s⁻²]
    #[cfg_attr(feature = "serde", serde(default = "default_max_phase_rate_step"))]
    pub max_phase_rate_step: Threshold,
    /// [CycleSlipOpts]
    #[cfg_attr(feature = "serde", serde(default))]
    pub cycle_slip: CycleSlipOpts,
    /// [HatchOpts]
    #[cfg_attr(feature = "serde", serde(default))]
    pub hatch: HatchOpts,
    /// Elevation [°] under which the degraded airborne noise applies
    #[cfg_attr(feature = "serde", serde(default = "default_elev_noise_threshold"))]
    pub elev_noise_threshold_deg: f64,
    /// [Modeling]
    #[cfg_attr(feature = "serde", serde(default))]
    pub modeling: Modeling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_rate_s: default_sampling_rate(),
            nchannels_gps: default_nchannels(),
            mask_angle_deg: default_mask_angle(),
            min_cnr: default_min_cnr(),
            max_psr: default_max_psr(),
            max_code_rate: default_max_code_rate(),
            max_code_rate_step: default_max_code_rate_step(),
            max_phase_rate: default_max_phase_rate(),
            max_phase_rate_step: default_max_phase_rate_step(),
            cycle_slip: CycleSlipOpts::default(),
            hatch: HatchOpts::default(),
            elev_noise_threshold_deg: default_elev_noise_threshold(),
            modeling: Modeling::default(),
        }
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), Error> {
    if value < min || value > max {
        Err(Error::ParameterOutOfRange {
            name,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

impl Config {
    /// Verifies all parameters lie within their physical range.
    /// This is meant to run once, before any epoch is processed.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sampling_rate_s <= 0.0 {
            return Err(Error::NullSamplingRate);
        }
        if self.hatch.time_s <= 0.0 {
            return Err(Error::NullHatchTime);
        }
        if self.cycle_slip.window == 0 {
            return Err(Error::NullCycleSlipWindow);
        }

        check_range(
            "sampling_rate_s",
            self.sampling_rate_s,
            1.0,
            SECONDS_PER_DAY as f64,
        )?;
        check_range(
            "nchannels_gps",
            self.nchannels_gps as f64,
            1.0,
            MAX_GPS_PRN as f64,
        )?;
        check_range("mask_angle_deg", self.mask_angle_deg, 0.0, 90.0)?;
        check_range("min_cnr", self.min_cnr.value, 0.0, 80.0)?;
        check_range("max_psr", self.max_psr.value, 0.0, 4.0E8)?;
        check_range("max_code_rate", self.max_code_rate.value, 0.0, 2000.0)?;
        check_range(
            "max_code_rate_step",
            self.max_code_rate_step.value,
            0.0,
            100.0,
        )?;
        check_range("max_phase_rate", self.max_phase_rate.value, 0.0, 2000.0)?;
        check_range(
            "max_phase_rate_step",
            self.max_phase_rate_step.value,
            0.0,
            100.0,
        )?;
        check_range(
            "cycle_slip.threshold_cycles",
            self.cycle_slip.threshold_cycles,
            0.0,
            10.0,
        )?;
        check_range(
            "cycle_slip.window",
            self.cycle_slip.window as f64,
            1.0,
            3.0,
        )?;
        check_range("hatch.time_s", self.hatch.time_s, 0.0, 3600.0)?;
        check_range("hatch.state_factor", self.hatch.state_factor, 0.0, 10.0)?;
        check_range(
            "hatch.gap_threshold_s",
            self.hatch.gap_threshold_s,
            0.0,
            3600.0,
        )?;
        check_range(
            "elev_noise_threshold_deg",
            self.elev_noise_threshold_deg,
            0.0,
            90.0,
        )?;
        Ok(())
    }

    /// Copies and returns [Config] with desired masking angle [°]
    pub fn with_mask_angle(&self, mask_deg: f64) -> Self {
        let mut s = self.clone();
        s.mask_angle_deg = mask_deg;
        s
    }

    /// Copies and returns [Config] with desired number of GPS channels
    pub fn with_gps_channels(&self, nchannels: usize) -> Self {
        let mut s = self.clone();
        s.nchannels_gps = nchannels;
        s
    }

    /// Copies and returns [Config] with desired sampling period [s]
    pub fn with_sampling_rate(&self, sampling_rate_s: f64) -> Self {
        let mut s = self.clone();
        s.sampling_rate_s = sampling_rate_s;
        s
    }

    /// Copies and returns [Config] with desired [HatchOpts]
    pub fn with_hatch(&self, hatch: HatchOpts) -> Self {
        let mut s = self.clone();
        s.hatch = hatch;
        s
    }

    /// Copies and returns [Config] with desired [CycleSlipOpts]
    pub fn with_cycle_slip(&self, cycle_slip: CycleSlipOpts) -> Self {
        let mut s = self.clone();
        s.cycle_slip = cycle_slip;
        s
    }

    /// Copies and returns [Config] with desired [Modeling]
    pub fn with_modeling(&self, modeling: Modeling) -> Self {
        let mut s = self.clone();
        s.modeling = modeling;
        s
    }

    /// Copies and returns [Config] with all code and phase
    /// rate checks turned off.
    pub fn without_rate_checks(&self) -> Self {
        let mut s = self.clone();
        s.max_code_rate.enabled = false;
        s.max_code_rate_step.enabled = false;
        s.max_phase_rate.enabled = false;
        s.max_phase_rate_step.enabled = false;
        s
    }
}
