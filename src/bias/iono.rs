use log::debug;

use crate::{
    constants::{EARTH_RADIUS_M, IONO_HEIGHT_M},
    prelude::{Error, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ionospheric obliquity factor (thin shell at 350 km),
/// converts a vertical delay to slant delay at given elevation [°].
pub fn iono_mapping_function(elevation_deg: f64) -> f64 {
    let fract = EARTH_RADIUS_M * elevation_deg.to_radians().cos() / (EARTH_RADIUS_M + IONO_HEIGHT_M);
    (1.0 - fract.powi(2)).powf(-0.5)
}

/// Ionospheric Grid Point broadcast by the SBAS
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IgpVertex {
    /// Latitude [°]
    pub lat_deg: f64,
    /// Longitude [°]
    pub lon_deg: f64,
    /// Grid Ionospheric Vertical Delay [m]
    pub givd_m: f64,
    /// Grid Ionospheric Vertical Error (1 sigma) [m]
    pub give_m: f64,
}

/// Vertex position within the IGP cell surrounding the pierce point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Vertex {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Vertex {
    /// Vertex located at the opposite of the cell diagonal
    fn diagonal(&self) -> Self {
        match self {
            Self::NorthEast => Self::SouthWest,
            Self::NorthWest => Self::SouthEast,
            Self::SouthWest => Self::NorthEast,
            Self::SouthEast => Self::NorthWest,
        }
    }

    /// Vertex sharing our latitude
    fn lon_neighbour(&self) -> Self {
        match self {
            Self::NorthEast => Self::NorthWest,
            Self::NorthWest => Self::NorthEast,
            Self::SouthWest => Self::SouthEast,
            Self::SouthEast => Self::SouthWest,
        }
    }

    /// Vertex sharing our longitude
    fn lat_neighbour(&self) -> Self {
        match self {
            Self::NorthEast => Self::SouthEast,
            Self::NorthWest => Self::SouthWest,
            Self::SouthWest => Self::NorthWest,
            Self::SouthEast => Self::NorthEast,
        }
    }

    fn is_west(&self) -> bool {
        matches!(self, Self::NorthWest | Self::SouthWest)
    }

    fn is_south(&self) -> bool {
        matches!(self, Self::SouthWest | Self::SouthEast)
    }
}

/// IGP interpolation scheme, selected by the LOS record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterpolationMode {
    /// All four vertices are monitored
    Square,
    /// Three vertices are monitored, this one is excluded
    Triangular(Vertex),
}

impl TryFrom<u8> for InterpolationMode {
    type Error = Error;
    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Self::Square),
            1 => Ok(Self::Triangular(Vertex::NorthEast)),
            2 => Ok(Self::Triangular(Vertex::NorthWest)),
            3 => Ok(Self::Triangular(Vertex::SouthWest)),
            4 => Ok(Self::Triangular(Vertex::SouthEast)),
            _ => Err(Error::InvalidInterpolationMode(selector)),
        }
    }
}

impl InterpolationMode {
    /// Latitude [°] above which the polar formulation applies
    fn pole_threshold_deg(&self) -> f64 {
        match self {
            Self::Square => 85.0,
            Self::Triangular(_) => 75.0,
        }
    }

    fn includes(&self, vertex: Vertex) -> bool {
        match self {
            Self::Square => true,
            Self::Triangular(excluded) => *excluded != vertex,
        }
    }
}

/// Longitude difference `lhs - rhs` wrapped to ]-180, 180] [°]
fn lon_difference(lhs: f64, rhs: f64) -> f64 {
    let mut delta = (lhs - rhs).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Interpolated vertical ionosphere at the pierce point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerticalIono {
    /// Vertical delay [m]
    pub delay_m: f64,
    /// Vertical delay error (1 sigma) [m]
    pub sigma_m: f64,
    /// Interpolation weights, indexed by [Vertex]
    pub weights: [f64; 4],
}

/// The four IGPs surrounding the ionospheric pierce point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IgpGrid {
    /// Vertices, indexed by [Vertex]
    pub vertices: [IgpVertex; 4],
    /// [InterpolationMode]
    pub mode: InterpolationMode,
}

impl IgpGrid {
    /// Builds a new [IgpGrid]
    pub fn new(
        north_east: IgpVertex,
        north_west: IgpVertex,
        south_west: IgpVertex,
        south_east: IgpVertex,
        mode: InterpolationMode,
    ) -> Self {
        Self {
            vertices: [north_east, north_west, south_west, south_east],
            mode,
        }
    }

    fn vertex(&self, vertex: Vertex) -> &IgpVertex {
        &self.vertices[vertex as usize]
    }

    /// Picks the coordinate from the first monitored vertex.
    /// Excluded vertices may carry meaningless coordinates.
    fn coordinate<F: Fn(&IgpVertex) -> f64>(&self, candidates: [Vertex; 2], f: F) -> f64 {
        if self.mode.includes(candidates[0]) {
            f(self.vertex(candidates[0]))
        } else {
            f(self.vertex(candidates[1]))
        }
    }

    /// Normalized pierce point coordinates (Xpp, Ypp) within the cell
    fn normalized_coordinates(
        &self,
        sv: SV,
        ipp_lat_deg: f64,
        ipp_lon_deg: f64,
    ) -> Result<(f64, f64), Error> {
        let threshold = self.mode.pole_threshold_deg();

        if ipp_lat_deg.abs() < threshold {
            let lat_n = self.coordinate([Vertex::NorthEast, Vertex::NorthWest], |v| v.lat_deg);
            let lat_s = self.coordinate([Vertex::SouthWest, Vertex::SouthEast], |v| v.lat_deg);
            let lon_w = self.coordinate([Vertex::NorthWest, Vertex::SouthWest], |v| v.lon_deg);
            let lon_e = self.coordinate([Vertex::NorthEast, Vertex::SouthEast], |v| v.lon_deg);

            let lon_span = lon_difference(lon_e, lon_w);
            let lat_span = lat_n - lat_s;

            if lon_span == 0.0 || lat_span == 0.0 {
                return Err(Error::DegenerateIgpGrid(sv));
            }

            let x_pp = lon_difference(ipp_lon_deg, lon_w) / lon_span;
            let y_pp = (ipp_lat_deg - lat_s) / lat_span;
            Ok((x_pp, y_pp))
        } else {
            let lon_sw = self.coordinate([Vertex::SouthWest, Vertex::NorthWest], |v| v.lon_deg);
            let y_pp = (ipp_lat_deg.abs() - threshold) / 10.0;
            let x_pp = ((ipp_lon_deg - lon_sw).rem_euclid(360.0) / 90.0) * (1.0 - 2.0 * y_pp) + y_pp;
            Ok((x_pp, y_pp))
        }
    }

    /// Interpolation weights, indexed by [Vertex]. They always sum to 1.
    pub fn weights(&self, sv: SV, ipp_lat_deg: f64, ipp_lon_deg: f64) -> Result<[f64; 4], Error> {
        let (x_pp, y_pp) = self.normalized_coordinates(sv, ipp_lat_deg, ipp_lon_deg)?;

        let mut weights = [0.0_f64; 4];

        match self.mode {
            InterpolationMode::Square => {
                weights[Vertex::NorthEast as usize] = x_pp * y_pp;
                weights[Vertex::NorthWest as usize] = (1.0 - x_pp) * y_pp;
                weights[Vertex::SouthWest as usize] = (1.0 - x_pp) * (1.0 - y_pp);
                weights[Vertex::SouthEast as usize] = x_pp * (1.0 - y_pp);
            },
            InterpolationMode::Triangular(excluded) => {
                // right angle sits at the diagonal of the excluded vertex
                let corner = excluded.diagonal();

                let x = if corner.is_west() { x_pp } else { 1.0 - x_pp };
                let y = if corner.is_south() { y_pp } else { 1.0 - y_pp };

                weights[corner as usize] = 1.0 - x - y;
                weights[corner.lon_neighbour() as usize] = x;
                weights[corner.lat_neighbour() as usize] = y;
            },
        }

        debug!(
            "({}) - iono {:?} x_pp={:.4} y_pp={:.4} weights={:?}",
            sv, self.mode, x_pp, y_pp, weights
        );

        Ok(weights)
    }

    /// Interpolates vertical delay and its sigma at the pierce point.
    pub fn interpolate(
        &self,
        sv: SV,
        ipp_lat_deg: f64,
        ipp_lon_deg: f64,
    ) -> Result<VerticalIono, Error> {
        let weights = self.weights(sv, ipp_lat_deg, ipp_lon_deg)?;

        let (mut delay_m, mut variance) = (0.0, 0.0);

        for (w, vertex) in weights.iter().zip(self.vertices.iter()) {
            delay_m += w * vertex.givd_m;
            variance += w * vertex.give_m.powi(2);
        }

        Ok(VerticalIono {
            delay_m,
            sigma_m: variance.max(0.0).sqrt(),
            weights,
        })
    }
}
