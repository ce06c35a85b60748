use super::records::SatCorrection;

/// Airborne noise and divergence [m], below elevation threshold
const SIGMA_NOISE_DIV_LOW_M: f64 = 0.36;

/// Airborne noise and divergence [m], above elevation threshold
const SIGMA_NOISE_DIV_HIGH_M: f64 = 0.15;

/// Fast and long term correction residual error [m].
/// Degradation terms are either summed or root sum squared.
pub fn sigma_flt(sat: &SatCorrection) -> f64 {
    let terms = [
        sat.sigma_udre_m * sat.delta_udre,
        sat.eps_fc_m,
        sat.eps_rrc_m,
        sat.eps_ltc_m,
        sat.eps_er_m,
    ];

    if sat.rss_udre {
        rss(&terms)
    } else {
        terms.iter().sum()
    }
}

/// Airborne multipath [m] at given elevation [°]
pub fn sigma_multipath(elevation_deg: f64) -> f64 {
    if elevation_deg > 2.0 {
        0.13 + 0.53 * (-elevation_deg / 10.0).exp()
    } else {
        0.0
    }
}

/// Airborne noise and divergence [m] at given elevation [°]
pub fn sigma_noise_divergence(elevation_deg: f64, threshold_deg: f64) -> f64 {
    if elevation_deg < threshold_deg {
        SIGMA_NOISE_DIV_LOW_M
    } else {
        SIGMA_NOISE_DIV_HIGH_M
    }
}

/// Root sum square
pub(crate) fn rss(terms: &[f64]) -> f64 {
    terms.iter().map(|term| term.powi(2)).sum::<f64>().sqrt()
}
