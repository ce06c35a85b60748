use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::{
    cfg::{Config, Receiver},
    correction::{
        CorrectedMeasurement, Corrector, EpochClockEstimate, LosCorrection, SatCorrection,
        Usability,
    },
    error::Error,
    observation::{EpochTag, RawObservation},
    preprocessing::{PreprocessedMeasurement, Preprocessor, RejectionCause},
};

/// Everything we produced at a given epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSolution {
    /// [EpochTag]
    pub tag: EpochTag,
    /// One [PreprocessedMeasurement] per satellite in sight
    pub measurements: Vec<PreprocessedMeasurement>,
    /// SBAS corrections, when this epoch was corrected
    pub corrections: Option<(Vec<CorrectedMeasurement>, EpochClockEstimate)>,
}

impl EpochSolution {
    /// Corrected measurements, empty when this epoch was not corrected
    pub fn corrected(&self) -> &[CorrectedMeasurement] {
        self.corrections
            .as_ref()
            .map(|(corrected, _)| corrected.as_slice())
            .unwrap_or(&[])
    }

    /// [EpochClockEstimate], when this epoch was corrected
    pub fn clock_estimate(&self) -> Option<&EpochClockEstimate> {
        self.corrections.as_ref().map(|(_, estimate)| estimate)
    }
}

/// Statistics gathered over one [Session]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    /// Number of processed epochs
    pub epochs: usize,
    /// Number of epochs that went through SBAS correction
    pub corrected_epochs: usize,
    /// Number of preprocessed measurements
    pub measurements: usize,
    /// Number of converged measurements
    pub converged: usize,
    /// Rejections, per cause
    pub rejections: BTreeMap<RejectionCause, usize>,
    /// Corrected measurements, per [Usability]
    pub usability: BTreeMap<Usability, usize>,
}

impl SessionSummary {
    /// Number of rejections for this cause
    pub fn rejections(&self, cause: RejectionCause) -> usize {
        self.rejections.get(&cause).copied().unwrap_or(0)
    }

    /// Number of corrected measurements with this [Usability]
    pub fn usability(&self, usability: Usability) -> usize {
        self.usability.get(&usability).copied().unwrap_or(0)
    }

    fn update(&mut self, solution: &EpochSolution) {
        self.epochs += 1;
        self.measurements += solution.measurements.len();

        for meas in solution.measurements.iter() {
            if meas.converged {
                self.converged += 1;
            }
            if let Some(cause) = meas.rejection {
                *self.rejections.entry(cause).or_default() += 1;
            }
        }

        if solution.corrections.is_some() {
            self.corrected_epochs += 1;
            for record in solution.corrected().iter() {
                *self.usability.entry(record.usability).or_default() += 1;
            }
        }
    }
}

/// [Session] processes the observations of one receiver during one day,
/// epoch by epoch, in chronological order.
#[derive(Debug, Clone)]
pub struct Session {
    cfg: Config,
    receiver: Receiver,
    doy: u16,
    preprocessor: Preprocessor,
    last_tag: Option<EpochTag>,
    summary: SessionSummary,
}

impl Session {
    /// Creates a new [Session]. The [Config] is verified here,
    /// before any epoch gets processed.
    pub fn new(cfg: Config, receiver: Receiver, doy: u16) -> Result<Self, Error> {
        cfg.validate()?;

        info!("{} - new session (doy={:03})", receiver.name, doy);

        Ok(Self {
            preprocessor: Preprocessor::new(&cfg),
            cfg,
            receiver,
            doy,
            last_tag: None,
            summary: SessionSummary::default(),
        })
    }

    /// [Config] of this [Session]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// [Receiver] of this [Session]
    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    /// [SessionSummary] so far
    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Processes a new epoch. SBAS corrections are applied on epochs
    /// aligned to the sampling rate, when corrections are available.
    pub fn process_epoch(
        &mut self,
        tag: EpochTag,
        observations: &[RawObservation],
        sat_corrections: &[SatCorrection],
        los_corrections: &[LosCorrection],
    ) -> Result<EpochSolution, Error> {
        if tag.doy != self.doy {
            return Err(Error::DayMismatch(tag, self.doy));
        }

        if let Some(last) = self.last_tag {
            if tag <= last {
                return Err(Error::NonChronologicalEpoch(tag, last));
            }
        }

        self.last_tag = Some(tag);

        let observations = observations
            .iter()
            .filter(|obs| {
                if obs.tag == tag {
                    true
                } else {
                    warn!(
                        "{} ({}) - observation does not belong to {}",
                        obs.tag, obs.sv, tag
                    );
                    false
                }
            })
            .copied()
            .collect::<Vec<_>>();

        let measurements = self
            .preprocessor
            .process_epoch(&self.cfg, &self.receiver, &observations);

        let aligned = (tag.sod as f64) % self.cfg.sampling_rate_s == 0.0;

        let has_corrections = !sat_corrections.is_empty() && !los_corrections.is_empty();

        let corrections = if aligned && has_corrections {
            let corrector = Corrector::new(&self.cfg, &self.receiver);
            Some(corrector.correct_epoch(&measurements, sat_corrections, los_corrections))
        } else {
            None
        };

        debug!(
            "{} - {} measurements, corrected: {}",
            tag,
            measurements.len(),
            corrections.is_some()
        );

        let solution = EpochSolution {
            tag,
            measurements,
            corrections,
        };

        self.summary.update(&solution);

        Ok(solution)
    }
}
