//! Column sort direction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::GridError;

/// The sort state of a column.
///
/// Exactly three values; anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
    None,
}

impl Direction {
    /// Next direction on activation: ascending, then descending, then
    /// back to none.
    pub fn cycle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
            Self::None => Self::Ascending,
        }
    }

    /// Sign handed to the comparator factory: ascending is -1,
    /// descending is +1. The +1 comparator swaps its operands, so
    /// ascending presents smallest-first and the two signs produce
    /// exactly mirrored orders.
    pub fn sign(self) -> Option<i8> {
        match self {
            Self::Ascending => Some(-1),
            Self::Descending => Some(1),
            Self::None => Option::None,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
            Self::None => write!(f, "none"),
        }
    }
}

impl FromStr for Direction {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            "none" => Ok(Self::None),
            other => Err(GridError::UnknownDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_all_three_states() {
        assert_eq!(Direction::None.cycle(), Direction::Ascending);
        assert_eq!(Direction::Ascending.cycle(), Direction::Descending);
        assert_eq!(Direction::Descending.cycle(), Direction::None);
    }

    #[test]
    fn signs_match_directions() {
        assert_eq!(Direction::Ascending.sign(), Some(-1));
        assert_eq!(Direction::Descending.sign(), Some(1));
        assert_eq!(Direction::None.sign(), None);
    }

    #[test]
    fn parses_known_directions_case_insensitively() {
        assert_eq!("ascending".parse::<Direction>().unwrap(), Direction::Ascending);
        assert_eq!("Descending".parse::<Direction>().unwrap(), Direction::Descending);
        assert_eq!("NONE".parse::<Direction>().unwrap(), Direction::None);
    }

    #[test]
    fn rejects_unknown_directions() {
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert!(matches!(err, GridError::UnknownDirection(s) if s == "sideways"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Ascending).unwrap(),
            "\"ascending\""
        );
        let parsed: Direction = serde_json::from_str("\"descending\"").unwrap();
        assert_eq!(parsed, Direction::Descending);
    }
}
