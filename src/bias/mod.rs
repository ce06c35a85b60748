pub(crate) mod tropo;
pub use tropo::{tropo_mapping_function, tropo_sigma_m, TroposphereModel};

pub(crate) mod iono;
pub use iono::{
    iono_mapping_function, IgpGrid, IgpVertex, InterpolationMode, Vertex, VerticalIono,
};
