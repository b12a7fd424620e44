//! Qualitative reaction shared by debate rankings and plurality votes

use serde::{Deserialize, Serialize};

/// A member's reaction to a proposal
///
/// Used both for rankings during debate and for plurality ballots during
/// the vote. Closed set: every match over it is exhaustive.
///
/// # Example
///
/// ```
/// use agora_domain::Stance;
///
/// let stance: Stance = "positive".parse().unwrap();
/// assert_eq!(stance, Stance::Positive);
/// assert_eq!(Stance::Negative.to_string(), "negative");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Positive,
    Neutral,
    Negative,
}

impl Stance {
    pub const ALL: [Stance; 3] = [Stance::Positive, Stance::Neutral, Stance::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Positive => "positive",
            Stance::Neutral => "neutral",
            Stance::Negative => "negative",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Stance::Positive)
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" | "pos" | "+" => Ok(Stance::Positive),
            "neutral" | "neu" | "0" => Ok(Stance::Neutral),
            "negative" | "neg" | "-" => Ok(Stance::Negative),
            _ => Err(format!(
                "Unknown stance: {}. Valid: positive, neutral, negative",
                s
            )),
        }
    }
}
