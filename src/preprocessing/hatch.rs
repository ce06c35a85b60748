use log::debug;

use crate::constants::GPS_L1_WAVELENGTH_M;

/// Recursive code carrier smoothing (Hatch filter)
#[derive(Debug, Clone, Default)]
pub(crate) struct HatchFilter {
    /// Time index [s]
    pub ksmooth: f64,
    /// Previous smoothed code [m]
    pub c_n: f64,
    /// Previous L1 phase [cycles]
    pub l_n: f64,
}

impl HatchFilter {
    /// (Re)initializes the filter: smoothed code is the raw code.
    pub fn reset(&mut self, c_n: f64, l_n: f64) {
        self.ksmooth = 1.0;
        self.c_n = c_n;
        self.l_n = l_n;
    }

    /// Smoothing weight for a new sample, `dt` [s] after the previous one.
    pub fn alpha(&self, dt: f64, time_constant_s: f64) -> f64 {
        let smoothing_time = (self.ksmooth + dt).min(time_constant_s);
        if smoothing_time > 0.0 {
            (dt / smoothing_time).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Smoothed code for this new sample. The filter state
    /// is only updated by [Self::commit].
    pub fn smooth(&self, dt: f64, time_constant_s: f64, c_k: f64, l_k: f64) -> f64 {
        let alpha = self.alpha(dt, time_constant_s);
        let predicted = self.c_n + (l_k - self.l_n) * GPS_L1_WAVELENGTH_M;
        let smoothed = alpha * c_k + (1.0 - alpha) * predicted;

        debug!(
            "hatch - alpha={:.4} | c_k={:.3} | smoothed={:.3} | err={:.3}",
            alpha,
            c_k,
            smoothed,
            (c_k - smoothed).abs()
        );

        smoothed
    }

    /// Accepts a new smoothed sample
    pub fn commit(&mut self, dt: f64, smoothed: f64, l_k: f64) {
        self.ksmooth += dt;
        self.c_n = smoothed;
        self.l_n = l_k;
    }
}
