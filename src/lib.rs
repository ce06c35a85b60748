#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod averager;
mod bias;
mod cfg;
mod constants;
mod correction;
mod error;
mod observation;
mod preprocessing;
mod session;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::bias::{
        iono_mapping_function, tropo_mapping_function, tropo_sigma_m, IgpGrid, IgpVertex,
        InterpolationMode, TroposphereModel, Vertex, VerticalIono,
    };
    pub use crate::cfg::{Config, CycleSlipOpts, HatchOpts, Modeling, Receiver, Threshold};
    pub use crate::constants::UNDEFINED;
    pub use crate::correction::{
        CorrectedMeasurement, Corrector, EpochClockEstimate, LosCorrection, SatCorrection,
        Usability,
    };
    pub use crate::error::Error;
    pub use crate::cfg::Error as ConfigError;
    pub use crate::observation::{EpochTag, RawObservation};
    pub use crate::preprocessing::{PreprocessedMeasurement, Preprocessor, RejectionCause};
    pub use crate::session::{EpochSolution, Session, SessionSummary};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use cfg::Error as ConfigError;
pub use error::Error;
