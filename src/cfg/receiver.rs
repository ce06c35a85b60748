use nalgebra::Vector3;

/// Static monitoring receiver (reference station)
#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    /// Receiver acronym (4 characters at most by convention)
    pub name: String,
    /// Antenna position, ECEF [m]
    pub position_ecef_m: Vector3<f64>,
    /// Geodetic coordinates: latitude [°], longitude [°], height above ellipsoid [m]
    pub lat_lon_alt_deg_deg_m: (f64, f64, f64),
    /// Receiver specific masking angle [°], when defined
    /// this supersedes the configured one.
    pub mask_angle_deg: Option<f64>,
}

impl Receiver {
    /// Defines a new [Receiver]. Both coordinates systems are required:
    /// ECEF for geometry, geodetic for atmospheric modeling.
    pub fn new(
        name: &str,
        position_ecef_m: Vector3<f64>,
        lat_lon_alt_deg_deg_m: (f64, f64, f64),
    ) -> Self {
        Self {
            name: name.to_string(),
            position_ecef_m,
            lat_lon_alt_deg_deg_m,
            mask_angle_deg: None,
        }
    }

    /// Copies and returns [Receiver] with a specific masking angle [°]
    pub fn with_mask_angle(&self, mask_deg: f64) -> Self {
        let mut s = self.clone();
        s.mask_angle_deg = Some(mask_deg);
        s
    }

    /// Masking angle to apply, given the default configured value [°]
    pub fn mask_angle(&self, default_deg: f64) -> f64 {
        self.mask_angle_deg.unwrap_or(default_deg)
    }

    /// Latitude [°]
    pub fn latitude_deg(&self) -> f64 {
        self.lat_lon_alt_deg_deg_m.0
    }

    /// Height above ellipsoid [m]
    pub fn altitude_m(&self) -> f64 {
        self.lat_lon_alt_deg_deg_m.2
    }
}
