//! Evolutionary phase tags carried by track samples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Discrete evolutionary phase of a star at one track sample.
///
/// Track tables store the phase as a small integer code; see
/// [`from_code`](EvolutionaryPhase::from_code) for the mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvolutionaryPhase {
    /// Core hydrogen burning.
    MainSequence,
    /// Post-main-sequence low/intermediate-mass giant.
    Giant,
    /// Hot (blue) supergiant.
    BlueSupergiant,
    /// Cool (red) supergiant.
    RedSupergiant,
    /// Nitrogen-sequence Wolf–Rayet star.
    WolfRayetWn,
    /// Carbon-sequence Wolf–Rayet star.
    WolfRayetWc,
}

impl EvolutionaryPhase {
    /// Decode the integer phase code used by track tables.
    ///
    /// `0` main sequence, `1` giant, `2` blue supergiant, `3` red
    /// supergiant, `4` WN, `5` WC.
    pub fn from_code(code: i64) -> Result<Self, DataError> {
        match code {
            0 => Ok(Self::MainSequence),
            1 => Ok(Self::Giant),
            2 => Ok(Self::BlueSupergiant),
            3 => Ok(Self::RedSupergiant),
            4 => Ok(Self::WolfRayetWn),
            5 => Ok(Self::WolfRayetWc),
            other => Err(DataError::InvalidValue {
                table: "phase".into(),
                reason: format!("unknown evolutionary phase code {other}"),
            }),
        }
    }

    /// The integer code written in track tables.
    pub fn code(self) -> i64 {
        match self {
            Self::MainSequence => 0,
            Self::Giant => 1,
            Self::BlueSupergiant => 2,
            Self::RedSupergiant => 3,
            Self::WolfRayetWn => 4,
            Self::WolfRayetWc => 5,
        }
    }

    /// Whether this phase is one of the Wolf–Rayet subtypes.
    pub fn is_wolf_rayet(self) -> bool {
        matches!(self, Self::WolfRayetWn | Self::WolfRayetWc)
    }
}

impl fmt::Display for EvolutionaryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MainSequence => "MS",
            Self::Giant => "giant",
            Self::BlueSupergiant => "BSG",
            Self::RedSupergiant => "RSG",
            Self::WolfRayetWn => "WN",
            Self::WolfRayetWc => "WC",
        };
        f.write_str(s)
    }
}
