//! Scrolling duration picker state
//!
//! Each picker is an ordered list of integers `min..=max` shown through a
//! fixed window of [`VISIBLE_ROWS`] rows. The value sitting [`CENTER_OFFSET`]
//! rows below the top of the window is the selected one. When a scroll
//! gesture settles, the row at the center offset is committed and the list
//! snaps so that the committed value sits at the center row again.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TimeSelection;
use crate::{display::two_digits, error::TimerError};

/// Rows between the top of the visible window and the selected row
pub const CENTER_OFFSET: usize = 3;
/// Rows visible at once: three above the center, the center, three below
pub const VISIBLE_ROWS: usize = 2 * CENTER_OFFSET + 1;

/// One row of the visible window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerRow {
    pub value: u32,
    pub text: String,
    /// Only the centered row is emphasized
    pub emphasized: bool,
}

/// A single bounded picker column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    field: PickerField,
    values: Vec<u32>,
    top_index: usize,
    centered_index: usize,
}

impl PickerState {
    /// Build a picker over `range` whose window starts at `initial_offset`
    ///
    /// An inverted range collapses to its lower bound.
    pub fn select(field: PickerField, range: RangeInclusive<u32>, initial_offset: usize) -> Self {
        let (min, max) = (*range.start(), *range.end());
        let values: Vec<u32> = (min..=max.max(min)).collect();
        let mut picker = Self {
            field,
            values,
            top_index: 0,
            centered_index: 0,
        };
        picker.settle(initial_offset);
        picker
    }

    /// Commit the value under the center row after a gesture stops at `first_visible`
    ///
    /// Positions too close to the end of the list clamp to the last value.
    pub fn settle(&mut self, first_visible: usize) -> u32 {
        let last = self.values.len() - 1;
        self.centered_index = first_visible.saturating_add(CENTER_OFFSET).min(last);
        self.top_index = self.centered_index.saturating_sub(CENTER_OFFSET);
        debug!(
            "Picker {} settled at row {}: value {}",
            self.field,
            first_visible,
            self.value()
        );
        self.value()
    }

    /// Center `value` directly, without a scroll gesture
    pub fn center_on(&mut self, value: u32) -> Result<u32, TimerError> {
        let (min, max) = self.bounds();
        if !(min..=max).contains(&value) {
            return Err(TimerError::FieldOutOfRange {
                field: self.field.name(),
                value: i64::from(value),
                min: i64::from(min),
                max: i64::from(max),
            });
        }
        self.centered_index = (value - min) as usize;
        self.top_index = self.centered_index.saturating_sub(CENTER_OFFSET);
        Ok(value)
    }

    /// The currently centered value
    pub fn value(&self) -> u32 {
        self.values[self.centered_index]
    }

    pub fn centered_index(&self) -> usize {
        self.centered_index
    }

    pub fn top_index(&self) -> usize {
        self.top_index
    }

    pub fn field(&self) -> PickerField {
        self.field
    }

    /// Unit label shown beside the column
    pub fn label(&self) -> &'static str {
        self.field.label()
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.values[0], self.values[self.values.len() - 1])
    }

    /// Rows currently inside the visible window
    pub fn window(&self) -> Vec<PickerRow> {
        self.values
            .iter()
            .enumerate()
            .skip(self.top_index)
            .take(VISIBLE_ROWS)
            .map(|(index, &value)| PickerRow {
                value,
                text: two_digits(u64::from(value)),
                emphasized: index == self.centered_index,
            })
            .collect()
    }
}

/// Which of the three pickers a request addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerField {
    Hours,
    Minutes,
    Seconds,
}

impl FromStr for PickerField {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hours" | "h" => Ok(PickerField::Hours),
            "minutes" | "m" => Ok(PickerField::Minutes),
            "seconds" | "s" => Ok(PickerField::Seconds),
            _ => Err(TimerError::UnknownField(s.to_string())),
        }
    }
}

impl PickerField {
    pub fn name(&self) -> &'static str {
        match self {
            PickerField::Hours => "hours",
            PickerField::Minutes => "minutes",
            PickerField::Seconds => "seconds",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PickerField::Hours => "H",
            PickerField::Minutes => "M",
            PickerField::Seconds => "S",
        }
    }
}

impl fmt::Display for PickerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The hours/minutes/seconds pickers of the configuration screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPickers {
    pub hours: PickerState,
    pub minutes: PickerState,
    pub seconds: PickerState,
}

impl SelectionPickers {
    pub fn new(initial_offset: usize) -> Self {
        Self {
            hours: PickerState::select(PickerField::Hours, 0..=23, initial_offset),
            minutes: PickerState::select(PickerField::Minutes, 0..=59, initial_offset),
            seconds: PickerState::select(PickerField::Seconds, 0..=59, initial_offset),
        }
    }

    pub fn get(&self, field: PickerField) -> &PickerState {
        match field {
            PickerField::Hours => &self.hours,
            PickerField::Minutes => &self.minutes,
            PickerField::Seconds => &self.seconds,
        }
    }

    pub fn get_mut(&mut self, field: PickerField) -> &mut PickerState {
        match field {
            PickerField::Hours => &mut self.hours,
            PickerField::Minutes => &mut self.minutes,
            PickerField::Seconds => &mut self.seconds,
        }
    }

    /// The duration the three pickers currently show
    pub fn selection(&self) -> TimeSelection {
        TimeSelection::new(self.hours.value(), self.minutes.value(), self.seconds.value())
    }
}

impl Default for SelectionPickers {
    fn default() -> Self {
        Self::new(0)
    }
}
