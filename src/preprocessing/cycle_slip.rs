use crate::prelude::EpochTag;

/// Outcome of one cycle slip test
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Detection {
    /// Not enough history to extrapolate the phase
    Unavailable,
    /// Phase is consistent with its extrapolation
    Clean,
    /// Phase departs from its extrapolation, not enough detections to declare a slip
    Suspected,
    /// Slip declared: the detection buffer is full
    Declared,
}

/// Phase extrapolation based cycle slip detector.
/// The last three (clean) L1 phase samples are fitted with a second order
/// polynomial, extrapolated to the current epoch. Each residual above
/// threshold is one detection; a slip is declared once all slots of the
/// circular detection buffer are set.
#[derive(Debug, Clone)]
pub(crate) struct CycleSlipDetector {
    /// (epoch, L1 [cycles]), most recent first
    history: [(EpochTag, f64); 3],
    /// Number of valid history samples
    len: usize,
    /// Detection flags
    buffer: Vec<bool>,
    /// Write index within the buffer
    index: usize,
}

impl CycleSlipDetector {
    pub fn new(window: usize) -> Self {
        Self {
            history: [(EpochTag::default(), 0.0); 3],
            len: 0,
            buffer: vec![false; window.max(1)],
            index: 0,
        }
    }

    /// Clears history and detection buffer
    pub fn reset(&mut self) {
        self.len = 0;
        self.index = 0;
        self.buffer.iter_mut().for_each(|flag| *flag = false);
    }

    /// Rolls the history forward
    pub fn push(&mut self, tag: EpochTag, l1_cycles: f64) {
        self.history[2] = self.history[1];
        self.history[1] = self.history[0];
        self.history[0] = (tag, l1_cycles);
        self.len = (self.len + 1).min(3);
    }

    /// Number of detections currently held by the buffer
    pub fn detections(&self) -> usize {
        self.buffer.iter().filter(|flag| **flag).count()
    }

    /// Lagrange coefficients of the three point extrapolation,
    /// given the three time gaps (most recent first).
    fn coefficients(t1: f64, t2: f64, t3: f64) -> (f64, f64, f64) {
        let r1 = (t1 + t2) * (t1 + t2 + t3) / (t2 * (t2 + t3));
        let r2 = -t1 * (t1 + t2 + t3) / (t2 * t3);
        let r3 = t1 * (t1 + t2) / ((t2 + t3) * t3);
        (r1, r2, r3)
    }

    /// |L1 - extrapolated L1| [cycles], when history permits.
    pub fn residual(&self, tag: EpochTag, l1_cycles: f64) -> Option<f64> {
        if self.len < 3 {
            return None;
        }

        let (t_1, l_1) = self.history[0];
        let (t_2, l_2) = self.history[1];
        let (t_3, l_3) = self.history[2];

        let t1 = tag.seconds_since(&t_1);
        let t2 = t_1.seconds_since(&t_2);
        let t3 = t_2.seconds_since(&t_3);

        if t1 <= 0.0 || t2 <= 0.0 || t3 <= 0.0 {
            return None;
        }

        let (r1, r2, r3) = Self::coefficients(t1, t2, t3);
        Some((l1_cycles - r1 * l_1 - r2 * l_2 - r3 * l_3).abs())
    }

    /// Runs the test for this new sample. History is only rolled forward
    /// while the detection buffer is clean.
    pub fn detect(&mut self, tag: EpochTag, l1_cycles: f64, threshold_cycles: f64) -> Detection {
        let residual = match self.residual(tag, l1_cycles) {
            Some(residual) => residual,
            None => {
                self.push(tag, l1_cycles);
                return Detection::Unavailable;
            },
        };

        let flagged = residual > threshold_cycles;

        self.buffer[self.index] = flagged;
        self.index = (self.index + 1) % self.buffer.len();

        let detections = self.detections();

        if detections == self.buffer.len() {
            Detection::Declared
        } else if flagged {
            Detection::Suspected
        } else {
            if detections == 0 {
                self.push(tag, l1_cycles);
            }
            Detection::Clean
        }
    }
}
