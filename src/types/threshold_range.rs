use crate::MinTempError;
use serde::Serialize;

/// Inclusive integer range of candidate thresholds for a [`crate::ThresholdTable`].
///
/// Construct with [`ThresholdRange::new`], which rejects `lower > upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ThresholdRange {
    lower: i32,
    upper: i32,
}

impl ThresholdRange {
    /// Creates a range spanning `lower..=upper`.
    ///
    /// # Errors
    ///
    /// Returns [`MinTempError::InvalidThresholdRange`] if `lower > upper`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mintemp::ThresholdRange;
    ///
    /// let range = ThresholdRange::new(2, 6).unwrap();
    /// assert_eq!(range.thresholds().collect::<Vec<_>>(), vec![6, 5, 4, 3, 2]);
    /// assert!(ThresholdRange::new(6, 2).is_err());
    /// ```
    pub fn new(lower: i32, upper: i32) -> Result<Self, MinTempError> {
        if lower > upper {
            return Err(MinTempError::InvalidThresholdRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub(crate) const fn new_unchecked(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    /// Every integer threshold in the range, from `upper` down to `lower`.
    pub fn thresholds(&self) -> impl Iterator<Item = i32> {
        (self.lower..=self.upper).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_threshold() {
        let range = ThresholdRange::new(-3, -3).unwrap();
        assert_eq!(range.thresholds().collect::<Vec<_>>(), vec![-3]);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = ThresholdRange::new(1, 0).unwrap_err();
        assert!(matches!(
            err,
            MinTempError::InvalidThresholdRange { lower: 1, upper: 0 }
        ));
    }
}
