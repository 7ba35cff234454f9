//! Duration chosen on the configuration screen

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Hours, minutes and seconds picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSelection {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeSelection {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Total duration in seconds
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Check minutes/seconds are in [0, 59] and that the total is non-zero
    pub fn validate(&self) -> Result<(), TimerError> {
        for (field, value) in [("minutes", self.minutes), ("seconds", self.seconds)] {
            if value > 59 {
                return Err(TimerError::FieldOutOfRange {
                    field,
                    value: i64::from(value),
                    min: 0,
                    max: 59,
                });
            }
        }
        if self.total_seconds() == 0 {
            return Err(TimerError::InvalidDuration);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_combines_all_fields() {
        assert_eq!(TimeSelection::new(1, 2, 3).total_seconds(), 3723);
        assert_eq!(TimeSelection::new(0, 0, 0).total_seconds(), 0);
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert_eq!(TimeSelection::new(0, 0, 0).validate(), Err(TimerError::InvalidDuration));
    }

    #[test]
    fn sixty_seconds_is_out_of_range() {
        let err = TimeSelection::new(0, 0, 60).validate().unwrap_err();
        assert!(matches!(err, TimerError::FieldOutOfRange { field: "seconds", value: 60, .. }));
    }

    #[test]
    fn large_hours_are_accepted() {
        assert!(TimeSelection::new(48, 59, 59).validate().is_ok());
    }
}
