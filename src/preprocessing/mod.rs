use itertools::Itertools;
use log::{debug, warn};
use std::cmp::Ordering;

use crate::{
    bias::iono_mapping_function,
    cfg::{Config, Receiver},
    constants::{GPS_GAMMA_L1L2, GPS_L1_WAVELENGTH_M, GPS_L2_WAVELENGTH_M, MAX_GPS_PRN},
    observation::RawObservation,
    prelude::{Constellation, SV},
};

mod cycle_slip;
mod hatch;
mod measurement;
mod state;

pub use measurement::{PreprocessedMeasurement, RejectionCause};

use cycle_slip::Detection;
use state::SatelliteState;

/// [Preprocessor] validates raw observations, detects cycle slips and
/// smoothes the pseudo range, epoch after epoch. It owns the persistent
/// state of every GPS satellite, for one receiver and one day.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    states: [SatelliteState; MAX_GPS_PRN as usize],
}

impl Preprocessor {
    /// Builds a new [Preprocessor] with fresh state for all PRNs.
    pub fn new(cfg: &Config) -> Self {
        Self {
            states: std::array::from_fn(|_| SatelliteState::new(cfg.cycle_slip.window)),
        }
    }

    fn state_index(sv: SV) -> Option<usize> {
        if sv.constellation == Constellation::GPS && sv.prn >= 1 && sv.prn <= MAX_GPS_PRN {
            Some((sv.prn - 1) as usize)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self, sv: SV) -> Option<&SatelliteState> {
        Self::state_index(sv).map(|index| &self.states[index])
    }

    /// Processes all observations of a single epoch, returns one
    /// [PreprocessedMeasurement] per GPS satellite, sorted by PRN.
    pub fn process_epoch(
        &mut self,
        cfg: &Config,
        receiver: &Receiver,
        observations: &[RawObservation],
    ) -> Vec<PreprocessedMeasurement> {
        let mask_deg = receiver.mask_angle(cfg.mask_angle_deg);

        let observations = observations
            .iter()
            .filter(|obs| {
                if Self::state_index(obs.sv).is_some() {
                    true
                } else {
                    warn!("{} ({}) - unsupported satellite", obs.tag, obs.sv);
                    false
                }
            })
            .unique_by(|obs| obs.sv)
            .sorted_by_key(|obs| obs.sv.prn)
            .collect::<Vec<_>>();

        // lowest satellites are dropped when channels are exceeded
        let dropped = if observations.len() > cfg.nchannels_gps {
            observations
                .iter()
                .sorted_by(|a, b| {
                    b.elevation_deg
                        .partial_cmp(&a.elevation_deg)
                        .unwrap_or(Ordering::Equal)
                })
                .skip(cfg.nchannels_gps)
                .map(|obs| obs.sv)
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        let mut measurements = Vec::with_capacity(observations.len());

        for obs in observations.iter() {
            let Some(index) = Self::state_index(obs.sv) else {
                continue;
            };

            let mut meas = PreprocessedMeasurement::new(
                obs.tag,
                obs.sv,
                obs.elevation_deg,
                obs.azimuth_deg,
                obs.c1_m,
                obs.l1_cycles,
                obs.s1_dbhz,
            );

            let state = &mut self.states[index];

            if let Some(cause) = screening(cfg, mask_deg, dropped.contains(&obs.sv), obs) {
                debug!("{} ({}) - rejected: {}", obs.tag, obs.sv, cause);
                meas.reject(cause);
                state.prev_rejection = Some(cause);
            } else {
                run_filter(cfg, state, obs, &mut meas);
            }

            measurements.push(meas);
        }

        for (obs, meas) in observations.iter().zip(measurements.iter_mut()) {
            if let Some(index) = Self::state_index(obs.sv) {
                geometry_free(cfg, &mut self.states[index], obs, meas);
            }
        }

        measurements
    }
}

/// Checks that do not depend on the satellite history.
/// A rejection here leaves the satellite state untouched.
fn screening(
    cfg: &Config,
    mask_deg: f64,
    channel_limited: bool,
    obs: &RawObservation,
) -> Option<RejectionCause> {
    if channel_limited {
        return Some(RejectionCause::Channels);
    }
    if obs.elevation_deg < mask_deg {
        return Some(RejectionCause::MaskAngle);
    }
    if cfg.min_cnr.undershot_by(obs.s1_dbhz) {
        return Some(RejectionCause::MinCnr);
    }
    if cfg.max_psr.exceeded_by(obs.c1_m) {
        return Some(RejectionCause::MaxPsrOutOfRange);
    }
    None
}

fn reject_and_reset(
    state: &mut SatelliteState,
    meas: &mut PreprocessedMeasurement,
    cause: RejectionCause,
) {
    debug!("{} ({}) - rejected: {}", meas.tag, meas.sv, cause);
    meas.reject(cause);
    state.reset_pending |= cause.resets_filter();
    state.prev_rejection = Some(cause);
}

/// Continuity checks, Hatch filter and rate checks.
fn run_filter(
    cfg: &Config,
    state: &mut SatelliteState,
    obs: &RawObservation,
    meas: &mut PreprocessedMeasurement,
) {
    let tag = obs.tag;
    let dt = state.prev_epoch.map(|prev| tag.seconds_since(&prev));

    if let Some(dt) = dt {
        if dt <= 0.0 {
            warn!("{} ({}) - epoch already processed", tag, obs.sv);
            meas.smoothed_c1_m = Some(state.hatch.c_n);
            meas.ksmooth_s = state.hatch.ksmooth;
            return;
        }

        if dt > cfg.sampling_rate_s && dt > cfg.hatch.gap_threshold_s {
            debug!("{} ({}) - data gap: {}s", tag, obs.sv, dt);
            meas.reject(RejectionCause::DataGap);
            state.reset_pending = true;
        }
    }

    if cfg.cycle_slip.enabled && !state.reset_pending {
        match state
            .cycle_slip
            .detect(tag, obs.l1_cycles, cfg.cycle_slip.threshold_cycles)
        {
            Detection::Declared => {
                debug!("{} ({}) - cycle slip", tag, obs.sv);
                meas.reject(RejectionCause::CycleSlip);
                state.reset_pending = true;
            },
            Detection::Suspected => {
                // suspect phase must not reach the filter: state is frozen
                debug!(
                    "{} ({}) - cycle slip suspected ({}/{})",
                    tag,
                    obs.sv,
                    state.cycle_slip.detections(),
                    cfg.cycle_slip.window
                );
                meas.valid = false;
                meas.ksmooth_s = state.hatch.ksmooth;
                return;
            },
            Detection::Clean | Detection::Unavailable => {},
        }
    }

    if state.reset_pending {
        debug!("{} ({}) - filter reset", tag, obs.sv);
        state.reinitialize(tag, obs.c1_m, obs.l1_cycles);
        state.prev_rejection = meas.rejection;
        meas.smoothed_c1_m = Some(obs.c1_m);
        meas.ksmooth_s = state.hatch.ksmooth;
        return;
    }

    // reset_pending is only lowered by a reinitialization, which sets prev_epoch
    let Some(dt) = dt else {
        return;
    };

    let smoothed = state
        .hatch
        .smooth(dt, cfg.hatch.time_s, obs.c1_m, obs.l1_cycles);

    let ksmooth = state.hatch.ksmooth + dt;
    meas.smoothed_c1_m = Some(smoothed);
    meas.ksmooth_s = ksmooth;

    let phase_rate = (obs.l1_cycles - state.hatch.l_n) * GPS_L1_WAVELENGTH_M / dt;
    meas.phase_rate = Some(phase_rate);

    if cfg.max_phase_rate.exceeded_by(phase_rate.abs()) {
        reject_and_reset(state, meas, RejectionCause::MaxPhaseRate);
        return;
    }

    if let Some(prev_rate) = state.prev_phase_rate {
        let step = (phase_rate - prev_rate) / dt;
        meas.phase_rate_step = Some(step);
        if cfg.max_phase_rate_step.exceeded_by(step.abs()) {
            reject_and_reset(state, meas, RejectionCause::MaxPhaseRateStep);
            return;
        }
    }

    let code_rate = (smoothed - state.hatch.c_n) / dt;
    meas.code_rate = Some(code_rate);

    if cfg.max_code_rate.exceeded_by(code_rate.abs()) {
        reject_and_reset(state, meas, RejectionCause::MaxCodeRate);
        return;
    }

    if let Some(prev_rate) = state.prev_code_rate {
        let step = (code_rate - prev_rate) / dt;
        meas.code_rate_step = Some(step);
        if cfg.max_code_rate_step.exceeded_by(step.abs()) {
            reject_and_reset(state, meas, RejectionCause::MaxCodeRateStep);
            return;
        }
    }

    meas.converged = meas.valid && ksmooth > cfg.hatch.state_factor * cfg.hatch.time_s;

    state.hatch.commit(dt, smoothed, obs.l1_cycles);
    state.prev_epoch = Some(tag);
    state.prev_phase_rate = Some(phase_rate);
    state.prev_code_rate = Some(code_rate);
    state.prev_rejection = meas.rejection;
}

/// Geometry free combination, VTEC rate and instantaneous AATR.
fn geometry_free(
    cfg: &Config,
    state: &mut SatelliteState,
    obs: &RawObservation,
    meas: &mut PreprocessedMeasurement,
) {
    if !meas.valid {
        return;
    }

    let Some(l2_cycles) = obs.l2_phase() else {
        return;
    };

    let gf = (GPS_L1_WAVELENGTH_M * obs.l1_cycles - GPS_L2_WAVELENGTH_M * l2_cycles)
        / (1.0 - GPS_GAMMA_L1L2);

    meas.geometry_free_m = Some(gf);

    if let Some((prev_tag, prev_gf)) = state.prev_geometry_free {
        let dt = obs.tag.seconds_since(&prev_tag);
        if dt > 0.0 && dt <= cfg.hatch.gap_threshold_s {
            let mpp = iono_mapping_function(obs.elevation_deg);
            let vtec_rate = (gf - prev_gf) / dt / mpp * 1000.0;
            meas.vtec_rate_mm_s = Some(vtec_rate);
            meas.iaatr_mm_s = Some(vtec_rate / mpp);
        }
    }

    state.prev_geometry_free = Some((obs.tag, gf));
}
