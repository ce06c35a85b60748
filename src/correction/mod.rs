use log::{debug, warn};

use crate::{
    averager::Averager,
    bias::{iono_mapping_function, tropo_sigma_m, TroposphereModel},
    cfg::{Config, Receiver},
    preprocessing::PreprocessedMeasurement,
};

mod measurement;
mod records;
mod sigma;

pub use measurement::{CorrectedMeasurement, EpochClockEstimate, Usability};
pub use records::{LosCorrection, SatCorrection};
pub use sigma::{sigma_flt, sigma_multipath, sigma_noise_divergence};

use sigma::rss;

/// [Corrector] applies the SBAS corrections to the smoothed measurements
/// of one epoch, and estimates the receiver clock offset.
/// It does not hold any state from one epoch to another.
#[derive(Debug, Clone, Copy)]
pub struct Corrector<'a> {
    cfg: &'a Config,
    receiver: &'a Receiver,
}

impl<'a> Corrector<'a> {
    /// Builds a new [Corrector] for this [Receiver]
    pub fn new(cfg: &'a Config, receiver: &'a Receiver) -> Self {
        Self { cfg, receiver }
    }

    /// Corrects all converged measurements of a single epoch.
    /// Satellites missing from either correction table are reported as not used.
    pub fn correct_epoch(
        &self,
        measurements: &[PreprocessedMeasurement],
        sat_corrections: &[SatCorrection],
        los_corrections: &[LosCorrection],
    ) -> (Vec<CorrectedMeasurement>, EpochClockEstimate) {
        let mut corrected = measurements
            .iter()
            .filter(|meas| meas.converged)
            .map(|meas| {
                let sat = sat_corrections.iter().find(|sat| sat.sv == meas.sv);
                let los = los_corrections.iter().find(|los| los.sv == meas.sv);

                match (sat, los) {
                    (Some(sat), Some(los)) => self.correct(meas, sat, los),
                    _ => {
                        warn!("{} ({}) - missing SBAS corrections", meas.tag, meas.sv);
                        CorrectedMeasurement::unused(meas)
                    },
                }
            })
            .collect::<Vec<_>>();

        let estimate = self.clock_estimate(&corrected, sat_corrections);

        if let Some(clock) = estimate.receiver_clock_m {
            for record in corrected.iter_mut() {
                if record.is_precision_approach() {
                    record.clock_free_residual_m = record.residual_m - clock;
                }
            }
        }

        (corrected, estimate)
    }

    fn correct(
        &self,
        meas: &PreprocessedMeasurement,
        sat: &SatCorrection,
        los: &LosCorrection,
    ) -> CorrectedMeasurement {
        let mut record = CorrectedMeasurement::unused(meas);
        record.ipp_lat_deg = los.ipp_lat_deg;
        record.ipp_lon_deg = los.ipp_lon_deg;
        record.usability = sat.usability();

        if !record.is_precision_approach() {
            debug!(
                "{} ({}) - udrei={}: {}",
                meas.tag, meas.sv, sat.udrei, record.usability
            );
            return record;
        }

        let Some(smoothed) = meas.smoothed_c1_m else {
            return CorrectedMeasurement::unused(meas);
        };

        let elevation = meas.elevation_deg;

        let iono = match los.grid.interpolate(meas.sv, los.ipp_lat_deg, los.ipp_lon_deg) {
            Ok(iono) => iono,
            Err(e) => {
                warn!("{} ({}) - {}", meas.tag, meas.sv, e);
                return CorrectedMeasurement::unused(meas);
            },
        };

        let fpp = iono_mapping_function(elevation);
        record.uisd_m = fpp * iono.delay_m;
        record.sigma_uire_m = fpp * iono.sigma_m;

        let troposphere = TroposphereModel {
            lat_deg: self.receiver.latitude_deg(),
            height_m: self.receiver.altitude_m(),
            day_of_year: meas.tag.doy as f64,
        };

        record.std_m = troposphere.slant_delay_m(elevation);
        record.sigma_tropo_m = tropo_sigma_m(elevation);

        record.sat_position_ecef_m = sat.corrected_position();
        record.sat_clock_m = sat.corrected_clock_m();

        record.sigma_flt_m = sigma_flt(sat);
        record.sigma_multipath_m = sigma_multipath(elevation);
        record.sigma_noise_div_m =
            sigma_noise_divergence(elevation, self.cfg.elev_noise_threshold_deg);
        record.sigma_airborne_m = rss(&[record.sigma_multipath_m, record.sigma_noise_div_m]);

        record.sigma_uere_m = rss(&[
            record.sigma_flt_m,
            record.sigma_uire_m,
            record.sigma_tropo_m,
            record.sigma_airborne_m,
        ]);

        let mut corrected_psr = record.sat_clock_m + smoothed;

        if self.cfg.modeling.tropo_delay {
            corrected_psr -= record.std_m;
        }
        if self.cfg.modeling.iono_delay {
            corrected_psr -= record.uisd_m;
        }

        record.corrected_psr_m = corrected_psr;
        record.geometric_range_m =
            (record.sat_position_ecef_m - self.receiver.position_ecef_m).norm();
        record.residual_m = record.corrected_psr_m - record.geometric_range_m;

        debug!(
            "{} ({}) - uisd={:.3} std={:.3} residual={:.3} sigma_uere={:.3}",
            meas.tag, meas.sv, record.uisd_m, record.std_m, record.residual_m, record.sigma_uere_m
        );

        record
    }

    /// Weighted receiver clock and ENT-GPS offset, over all PA satellites
    fn clock_estimate(
        &self,
        corrected: &[CorrectedMeasurement],
        sat_corrections: &[SatCorrection],
    ) -> EpochClockEstimate {
        let mut clock = Averager::new();
        let mut ent_gps = Averager::new();

        for record in corrected.iter().filter(|record| record.is_precision_approach()) {
            clock.add_weighted(record.residual_m, 1.0 / record.sigma_uere_m.powi(2));

            let Some(sat) = sat_corrections.iter().find(|sat| sat.sv == record.sv) else {
                continue;
            };

            if record.geometric_range_m > 0.0 {
                let los = (record.sat_position_ecef_m - self.receiver.position_ecef_m)
                    / record.geometric_range_m;

                ent_gps.add(sat.ltc_position_m.dot(&los) - (sat.fast_correction_m + sat.ltc_clock_m));
            }
        }

        EpochClockEstimate {
            receiver_clock_m: clock.value(),
            ent_gps_m: ent_gps.value(),
            nb_sv: clock.count as usize,
        }
    }
}
