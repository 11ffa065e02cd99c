//! Year range selection and validation
//!
//! Prediction queries are bounded by an inclusive `[start, end]` year range.
//! [`YearRange`] is the validated value; [`YearRangePicker`] tracks an
//! interactive selection that may temporarily be invalid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default first year offered by the picker
pub const DEFAULT_START_YEAR: i32 = 2025;

/// Default last year offered by the picker
pub const DEFAULT_END_YEAR: i32 = 2030;

/// An inclusive, validated year range (`start <= end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Create a range, rejecting an end year before the start year
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if end < start {
            return Err(Error::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// First year of the range
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last year of the range
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of years covered, both ends included
    pub fn len(&self) -> usize {
        self.end.abs_diff(self.start) as usize + 1
    }

    /// A valid range always covers at least one year
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `year` falls inside the range
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Stateful start/end year selection with an error flag
///
/// Inputs are `Option<i32>`: `None` stands for a value that could not be
/// parsed as a year. An unparseable input raises the error flag and leaves
/// the stored year untouched. A parseable input is always stored, and the
/// error flag then reflects whether the pair is ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRangePicker {
    initial_start: i32,
    initial_end: i32,
    start: i32,
    end: i32,
    error: bool,
}

impl Default for YearRangePicker {
    fn default() -> Self {
        Self::new(DEFAULT_START_YEAR, DEFAULT_END_YEAR)
    }
}

impl YearRangePicker {
    /// Create a picker seeded with initial years
    pub fn new(initial_start: i32, initial_end: i32) -> Self {
        Self {
            initial_start,
            initial_end,
            start: initial_start,
            end: initial_end,
            error: false,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Whether the current selection is invalid
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Update the start year
    pub fn set_start(&mut self, year: Option<i32>) {
        match year {
            Some(year) => {
                self.start = year;
                self.error = self.end < self.start;
            }
            None => self.error = true,
        }
    }

    /// Update the end year
    pub fn set_end(&mut self, year: Option<i32>) {
        match year {
            Some(year) => {
                self.end = year;
                self.error = self.end < self.start;
            }
            None => self.error = true,
        }
    }

    /// Parse and apply a start year from free text
    pub fn set_start_str(&mut self, input: &str) {
        self.set_start(parse_year(input));
    }

    /// Parse and apply an end year from free text
    pub fn set_end_str(&mut self, input: &str) {
        self.set_end(parse_year(input));
    }

    /// Restore the initial years and clear the error flag
    pub fn reset(&mut self) {
        self.start = self.initial_start;
        self.end = self.initial_end;
        self.error = false;
    }

    /// The current selection, if it is valid
    pub fn range(&self) -> Option<YearRange> {
        if self.error {
            return None;
        }
        YearRange::new(self.start, self.end).ok()
    }
}

/// Parse a four-digit-ish year, rejecting anything non-numeric
pub fn parse_year(input: &str) -> Option<i32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
