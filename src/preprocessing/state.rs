use crate::prelude::EpochTag;

use super::{
    cycle_slip::CycleSlipDetector, hatch::HatchFilter, measurement::RejectionCause,
};

/// Persistent state of one satellite, for the duration of one receiver-day.
#[derive(Debug, Clone)]
pub(crate) struct SatelliteState {
    /// Hatch filter accumulators
    pub hatch: HatchFilter,
    /// Cycle slip detector
    pub cycle_slip: CycleSlipDetector,
    /// Last epoch that went through the filter
    pub prev_epoch: Option<EpochTag>,
    /// Previous phase rate [m.s⁻¹]
    pub prev_phase_rate: Option<f64>,
    /// Previous smoothed code rate [m.s⁻¹]
    pub prev_code_rate: Option<f64>,
    /// Filter must be (re)initialized on next opportunity
    pub reset_pending: bool,
    /// Last rejection
    pub prev_rejection: Option<RejectionCause>,
    /// Previous geometry free combination [m]
    pub prev_geometry_free: Option<(EpochTag, f64)>,
}

impl SatelliteState {
    /// Fresh state: the first sighting will initialize the filter.
    pub fn new(cs_window: usize) -> Self {
        Self {
            hatch: HatchFilter::default(),
            cycle_slip: CycleSlipDetector::new(cs_window),
            prev_epoch: None,
            prev_phase_rate: None,
            prev_code_rate: None,
            reset_pending: true,
            prev_rejection: None,
            prev_geometry_free: None,
        }
    }

    /// Reinitializes the filter on this sample.
    pub fn reinitialize(&mut self, tag: EpochTag, c1_m: f64, l1_cycles: f64) {
        self.hatch.reset(c1_m, l1_cycles);
        self.cycle_slip.reset();
        self.cycle_slip.push(tag, l1_cycles);
        self.prev_epoch = Some(tag);
        self.prev_phase_rate = None;
        self.prev_code_rate = None;
        self.prev_geometry_free = None;
        self.reset_pending = false;
    }
}
