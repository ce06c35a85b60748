mod mops;

/// Vertical tropospheric residual error (1 sigma) [m]
pub const SIGMA_TROPO_VERTICAL_M: f64 = 0.12;

/// MOPS tropospheric obliquity factor at given elevation [°]
pub fn tropo_mapping_function(elevation_deg: f64) -> f64 {
    1.001_f64 / (0.002001_f64 + elevation_deg.to_radians().sin().powi(2)).sqrt()
}

/// Tropospheric residual error (1 sigma) at given elevation [°]
pub fn tropo_sigma_m(elevation_deg: f64) -> f64 {
    SIGMA_TROPO_VERTICAL_M * tropo_mapping_function(elevation_deg)
}

/// MOPS tropospheric model, evaluated at the receiver location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TroposphereModel {
    /// Receiver latitude [°]
    pub lat_deg: f64,
    /// Receiver height [m]
    pub height_m: f64,
    /// Day of year
    pub day_of_year: f64,
}

impl TroposphereModel {
    /// Slant tropospheric delay [m] for a satellite at given elevation [°]
    pub fn slant_delay_m(&self, elevation_deg: f64) -> f64 {
        let (zhd, zwd) = mops::zenith_delays(self.lat_deg, self.height_m, self.day_of_year);
        (zhd + zwd) * tropo_mapping_function(elevation_deg)
    }
}
