use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// A user rating, always finite and within `[MIN_RATING, MAX_RATING]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Validates a numeric rating
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (MIN_RATING..=MAX_RATING).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Parses a rating typed by the user, e.g. `" 4.5 "`
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<f64>().ok().and_then(Self::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "rating {} outside [{}, {}]",
                value, MIN_RATING, MAX_RATING
            )
        })
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Rating::new(1.0).is_some());
        assert!(Rating::new(5.0).is_some());
        assert!(Rating::new(3.5).is_some());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Rating::new(0.9).is_none());
        assert!(Rating::new(5.1).is_none());
        assert!(Rating::new(-3.0).is_none());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Rating::new(f64::NAN).is_none());
        assert!(Rating::new(f64::INFINITY).is_none());
    }

    #[test]
    fn test_parse_user_input() {
        assert_eq!(Rating::parse(" 4.5 ").map(Rating::value), Some(4.5));
        assert_eq!(Rating::parse("5").map(Rating::value), Some(5.0));
        assert!(Rating::parse("").is_none());
        assert!(Rating::parse("great").is_none());
        assert!(Rating::parse("NaN").is_none());
        assert!(Rating::parse("inf").is_none());
        assert!(Rating::parse("6").is_none());
    }

    #[test]
    fn test_serde_validates() {
        let rating: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(rating.value(), 4.0);
        assert_eq!(serde_json::to_string(&rating).unwrap(), "4.0");

        assert!(serde_json::from_str::<Rating>("7").is_err());
    }
}
