// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Date;
use time::format_description::FormatItem;

/// Longest accepted slot, instance, position or member name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Longest accepted assignment note.
pub const MAX_NOTE_LENGTH: usize = 500;

/// Largest capacity or priority the storage columns can hold.
pub const MAX_COUNT: u32 = i32::MAX.unsigned_abs();

const DATE_FORMAT: &[FormatItem<'_>] = time::macros::format_description!("[year]-[month]-[day]");

/// Trims a required name and checks it is non-blank and not too long.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the trimmed value is empty or longer
/// than [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName {
            field,
            reason: String::from("must not be blank"),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidName {
            field,
            reason: format!("must be at most {MAX_NAME_LENGTH} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional label: blank collapses to `None`.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the label is too long.
pub fn normalize_optional_name(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => validate_name(field, label).map(Some),
    }
}

/// Converts a requested capacity into the stored form.
///
/// # Errors
///
/// Returns `DomainError::InvalidCapacity` for values below 1 or above
/// [`MAX_COUNT`].
pub fn validate_required_count(value: i64) -> Result<u32, DomainError> {
    match u32::try_from(value) {
        Ok(count) if (1..=MAX_COUNT).contains(&count) => Ok(count),
        _ => Err(DomainError::InvalidCapacity { value }),
    }
}

/// Converts a requested priority into the stored form.
///
/// # Errors
///
/// Returns `DomainError::InvalidPriority` for values below 1 or above
/// [`MAX_COUNT`].
pub fn validate_priority(value: i64) -> Result<u32, DomainError> {
    match u32::try_from(value) {
        Ok(priority) if (1..=MAX_COUNT).contains(&priority) => Ok(priority),
        _ => Err(DomainError::InvalidPriority { value }),
    }
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the string is malformed.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::InvalidDate {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
