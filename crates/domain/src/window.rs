// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-of-day windows for shift slots.
//!
//! A window is a pair of wall-clock times with minute precision. When the end
//! precedes the start the window runs past midnight into the next calendar
//! day. A window whose start equals its end is rejected: it is ambiguous
//! between zero length and a full day.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Time;
use time::format_description::FormatItem;

const MINUTES_PER_DAY: u32 = 24 * 60;
const TIME_WITH_SECONDS: &[FormatItem<'_>] =
    time::macros::format_description!("[hour]:[minute]:[second]");
const TIME_WITHOUT_SECONDS: &[FormatItem<'_>] =
    time::macros::format_description!("[hour]:[minute]");

/// A validated shift window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShiftWindow")]
pub struct ShiftWindow {
    start: Time,
    end: Time,
}

/// Unvalidated wire form of [`ShiftWindow`].
#[derive(Deserialize)]
struct RawShiftWindow {
    start: Time,
    end: Time,
}

impl TryFrom<RawShiftWindow> for ShiftWindow {
    type Error = DomainError;

    fn try_from(raw: RawShiftWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl ShiftWindow {
    /// Builds a window from two times, truncated to whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ZeroLengthWindow` if start and end coincide.
    pub fn new(start: Time, end: Time) -> Result<Self, DomainError> {
        let start: Time = truncate_to_minute(start)?;
        let end: Time = truncate_to_minute(end)?;
        if start == end {
            return Err(DomainError::ZeroLengthWindow {
                time: format_time(start),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a window from two `HH:MM` (or `HH:MM:SS`) strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either string is malformed or the window has zero
    /// length.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    /// Returns the start time.
    #[must_use]
    pub const fn start(&self) -> Time {
        self.start
    }

    /// Returns the end time.
    #[must_use]
    pub const fn end(&self) -> Time {
        self.end
    }

    /// Returns true when the window ends on the following calendar day.
    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Returns the length of the window in minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        let start: u32 = minute_of_day(self.start);
        let end: u32 = minute_of_day(self.end);
        if end > start {
            end - start
        } else {
            MINUTES_PER_DAY - start + end
        }
    }

    /// Returns the start formatted as `HH:MM`.
    #[must_use]
    pub fn start_str(&self) -> String {
        format_time(self.start)
    }

    /// Returns the end formatted as `HH:MM`.
    #[must_use]
    pub fn end_str(&self) -> String {
        format_time(self.end)
    }
}

/// Parses a wall-clock time in `HH:MM` or `HH:MM:SS` form.
///
/// # Errors
///
/// Returns `DomainError::InvalidTime` if the string matches neither form.
pub fn parse_time(value: &str) -> Result<Time, DomainError> {
    let trimmed: &str = value.trim();
    Time::parse(trimmed, TIME_WITH_SECONDS)
        .or_else(|_| Time::parse(trimmed, TIME_WITHOUT_SECONDS))
        .map_err(|e| DomainError::InvalidTime {
            value: value.to_string(),
            error: e.to_string(),
        })
}

/// Formats a time as zero-padded `HH:MM`.
#[must_use]
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

fn minute_of_day(time: Time) -> u32 {
    u32::from(time.hour()) * 60 + u32::from(time.minute())
}

fn truncate_to_minute(time: Time) -> Result<Time, DomainError> {
    Time::from_hms(time.hour(), time.minute(), 0).map_err(|e| DomainError::InvalidTime {
        value: format_time(time),
        error: e.to_string(),
    })
}
