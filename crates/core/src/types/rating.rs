//! Recipe review rating.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a rating is outside the 1-5 star range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating must be between {min} and {max} (got {value})", min = Rating::MIN, max = Rating::MAX)]
pub struct RatingError {
    /// The rejected value.
    pub value: i32,
}

/// A star rating from 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(i32);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: i32 = 1;
    /// Highest allowed rating.
    pub const MAX: i32 = 5;

    /// Create a rating, rejecting values outside `MIN..=MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError`] if `value` is out of range.
    pub const fn new(value: i32) -> Result<Self, RatingError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(RatingError { value });
        }
        Ok(Self(value))
    }

    /// Get the underlying star count.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Rating {
    type Error = RatingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().get(), 1);
        assert_eq!(Rating::new(5).unwrap().get(), 5);
        assert_eq!(Rating::new(6), Err(RatingError { value: 6 }));
    }

    #[test]
    fn test_rating_error_message() {
        let err = Rating::new(9).unwrap_err();
        assert_eq!(err.to_string(), "rating must be between 1 and 5 (got 9)");
    }

    #[test]
    fn test_rating_deserialize_validates() {
        let rating: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(rating.get(), 4);
        assert!(serde_json::from_str::<Rating>("11").is_err());
    }
}
