use log::debug;
use std::f64::consts::PI;

/// MOPS meteorological parameters
#[derive(Copy, Clone, Debug)]
pub(crate) enum MetParam {
    // pressure in mBar
    Pressure = 0,
    // temperature in Kelvin
    Temperature = 1,
    // water vapour pressure in mBar
    WaterVapourPressure = 2,
    // beta is temperature lapse rate (Kelvin/m)
    Beta = 3,
    // lambda is wvp height factor (N/A)
    Lambda = 4,
}

const AVERAGE_LUT: [(f64, [f64; 5]); 5] = [
    (15.0, [1013.25, 299.65, 26.31, 6.30E-3, 2.77]),
    (30.0, [1017.25, 294.15, 21.79, 6.05E-3, 3.15]),
    (45.0, [1015.75, 283.15, 11.66, 5.58E-3, 2.57]),
    (60.0, [1011.75, 272.15, 6.78, 5.39E-3, 1.81]),
    (75.0, [1013.00, 263.65, 4.11, 4.53E-3, 1.55]),
];

const SEASONAL_LUT: [(f64, [f64; 5]); 5] = [
    (15.0, [0.0, 0.0, 0.0, 0.0, 0.0]),
    (30.0, [-3.75, 7.0, 8.85, 0.25E-3, 0.33]),
    (45.0, [-2.25, 11.0, 7.24, 0.32E-3, 0.46]),
    (60.0, [-1.75, 15.0, 5.36, 0.81E-3, 0.74]),
    (75.0, [-0.50, 14.5, 3.39, 0.62E-3, 0.30]),
];

/// Linear interpolation of the look up table, in absolute latitude
fn interpolate(lut: &[(f64, [f64; 5]); 5], prm: MetParam, abs_lat_deg: f64) -> f64 {
    let prm = prm as usize;

    if abs_lat_deg <= lut[0].0 {
        return lut[0].1[prm];
    }
    if abs_lat_deg >= lut[4].0 {
        return lut[4].1[prm];
    }

    let upper = lut
        .iter()
        .position(|(lat, _)| *lat > abs_lat_deg)
        .unwrap_or(4)
        .max(1);

    let (lat_0, values_0) = lut[upper - 1];
    let (lat_1, values_1) = lut[upper];

    values_0[prm] + (values_1[prm] - values_0[prm]) * (abs_lat_deg - lat_0) / (lat_1 - lat_0)
}

/// Seasonal value of the meteorological parameter
pub(crate) fn met_parameter(prm: MetParam, lat_deg: f64, day_of_year: f64) -> f64 {
    let d_min = if lat_deg.is_sign_negative() {
        211.0_f64
    } else {
        28.0_f64
    };

    let abs_lat = lat_deg.abs();
    let average = interpolate(&AVERAGE_LUT, prm, abs_lat);
    let seasonal = interpolate(&SEASONAL_LUT, prm, abs_lat);

    average - seasonal * ((day_of_year - d_min) * 2.0 * PI / 365.25).cos()
}

/// Returns (zenith hydrostatic, zenith wet) delays [m] at receiver height.
pub(crate) fn zenith_delays(lat_deg: f64, height_m: f64, day_of_year: f64) -> (f64, f64) {
    const K_1: f64 = 77.604;
    const K_2: f64 = 382000.0;
    const R_D: f64 = 287.054;
    const G: f64 = 9.80665;
    const G_M: f64 = 9.784;

    let p = met_parameter(MetParam::Pressure, lat_deg, day_of_year);
    let temp = met_parameter(MetParam::Temperature, lat_deg, day_of_year);
    let e = met_parameter(MetParam::WaterVapourPressure, lat_deg, day_of_year);
    let beta = met_parameter(MetParam::Beta, lat_deg, day_of_year);
    let lambda = met_parameter(MetParam::Lambda, lat_deg, day_of_year);

    let z0_hyd = 1.0E-6 * K_1 * R_D * p / G_M;
    let z0_wet = 1.0E-6 * K_2 * R_D / ((lambda + 1.0) * G_M - beta * R_D) * e / temp;

    let decay = 1.0 - beta * height_m / temp;

    let z_hyd = decay.powf(G / R_D / beta) * z0_hyd;
    let z_wet = decay.powf((lambda + 1.0) * G / R_D / beta - 1.0) * z0_wet;

    debug!(
        "mops - p={:.3} t={:.3} e={:.3} beta={:.5} lambda={:.3} | zhd(h={:.1})={:.4} zwd={:.4}",
        p, temp, e, beta, lambda, height_m, z_hyd, z_wet
    );

    (z_hyd, z_wet)
}
