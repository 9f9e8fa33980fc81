use serde::{Deserialize, Serialize};

/// Answer given by the learner. Maps onto the extremes of the SM-2 0-5 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Good,
}

impl Rating {
    pub fn quality(self) -> u8 {
        match self {
            Rating::Again => 0,
            Rating::Good => 5,
        }
    }
}
