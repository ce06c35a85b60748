use thiserror::Error;

use crate::{
    cfg::Error as ConfigError,
    prelude::{EpochTag, SV},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid [Config](crate::prelude::Config): this is fatal and
    /// is reported before any epoch is processed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Epochs must be proposed in chronological order,
    /// we do not support going back in time within a session.
    #[error("non chronological epoch {0} (last processed {1})")]
    NonChronologicalEpoch(EpochTag, EpochTag),

    /// A session covers one receiver and a single day.
    #[error("epoch {0} does not belong to session day {1}")]
    DayMismatch(EpochTag, u16),

    /// LOS record selects an interpolation scheme we do not know.
    #[error("invalid IGP interpolation mode {0}")]
    InvalidInterpolationMode(u8),

    /// IGP cell surrounding the pierce point has zero extent.
    #[error("{0}: degenerate IGP cell")]
    DegenerateIgpGrid(SV),
}
