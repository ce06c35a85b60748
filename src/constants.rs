/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth radius used by the ionospheric thin shell model (meters)
pub const EARTH_RADIUS_M: f64 = 6378136.3;

/// Height of the ionospheric thin shell (meters)
pub const IONO_HEIGHT_M: f64 = 350_000.0;

/// GPS L1 frequency (Hz)
pub const GPS_L1_FREQ_HZ: f64 = 1575.42E6;

/// GPS L2 frequency (Hz)
pub const GPS_L2_FREQ_HZ: f64 = 1227.60E6;

/// GPS L1 wavelength (meters)
pub const GPS_L1_WAVELENGTH_M: f64 = SPEED_OF_LIGHT_M_S / GPS_L1_FREQ_HZ;

/// GPS L2 wavelength (meters)
pub const GPS_L2_WAVELENGTH_M: f64 = SPEED_OF_LIGHT_M_S / GPS_L2_FREQ_HZ;

/// (f_L1 / f_L2)²
pub const GPS_GAMMA_L1L2: f64 = (GPS_L1_FREQ_HZ / GPS_L2_FREQ_HZ) * (GPS_L1_FREQ_HZ / GPS_L2_FREQ_HZ);

/// Highest GPS PRN we track
pub const MAX_GPS_PRN: u8 = 36;

/// Seconds in one day
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Value reported for quantities that are not defined at a given epoch
/// (first epochs of a filter, missing previous rate).
pub const UNDEFINED: f64 = -9999.9;
