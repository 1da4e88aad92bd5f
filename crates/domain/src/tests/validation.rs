// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, MAX_COUNT, MAX_NAME_LENGTH, format_date, normalize_optional_name, parse_date,
    validate_name, validate_priority, validate_required_count,
};
use time::macros::date;

#[test]
fn test_validate_name_trims() {
    assert_eq!(validate_name("slot_name", "  Bar  ").unwrap(), "Bar");
}

#[test]
fn test_validate_name_rejects_blank() {
    let result: Result<String, DomainError> = validate_name("slot_name", "   ");

    assert!(matches!(
        result,
        Err(DomainError::InvalidName {
            field: "slot_name",
            ..
        })
    ));
}

#[test]
fn test_validate_name_rejects_too_long() {
    let long: String = "x".repeat(MAX_NAME_LENGTH + 1);

    assert!(validate_name("slot_name", &long).is_err());
    assert!(validate_name("slot_name", &long[..MAX_NAME_LENGTH]).is_ok());
}

#[test]
fn test_optional_name_blank_is_none() {
    assert_eq!(normalize_optional_name("instance_name", None).unwrap(), None);
    assert_eq!(
        normalize_optional_name("instance_name", Some("  ")).unwrap(),
        None
    );
    assert_eq!(
        normalize_optional_name("instance_name", Some(" Patio ")).unwrap(),
        Some(String::from("Patio"))
    );
}

#[test]
fn test_required_count_must_be_positive() {
    assert_eq!(validate_required_count(1).unwrap(), 1);
    assert_eq!(validate_required_count(40).unwrap(), 40);
    assert_eq!(
        validate_required_count(0),
        Err(DomainError::InvalidCapacity { value: 0 })
    );
    assert_eq!(
        validate_required_count(-3),
        Err(DomainError::InvalidCapacity { value: -3 })
    );
    assert!(validate_required_count(i64::from(u32::MAX) + 1).is_err());
}

#[test]
fn test_required_count_must_fit_storage_column() {
    let largest: i64 = i64::from(i32::MAX);

    assert_eq!(validate_required_count(largest).unwrap(), MAX_COUNT);
    assert_eq!(
        validate_required_count(largest + 1),
        Err(DomainError::InvalidCapacity { value: largest + 1 })
    );
    assert_eq!(
        validate_required_count(i64::from(u32::MAX)),
        Err(DomainError::InvalidCapacity {
            value: i64::from(u32::MAX)
        })
    );
}

#[test]
fn test_priority_must_be_at_least_one() {
    assert_eq!(validate_priority(1).unwrap(), 1);
    assert_eq!(
        validate_priority(0),
        Err(DomainError::InvalidPriority { value: 0 })
    );
}

#[test]
fn test_priority_must_fit_storage_column() {
    let largest: i64 = i64::from(i32::MAX);

    assert_eq!(validate_priority(largest).unwrap(), MAX_COUNT);
    assert_eq!(
        validate_priority(largest + 1),
        Err(DomainError::InvalidPriority { value: largest + 1 })
    );
}

#[test]
fn test_date_round_trip_format() {
    let parsed = parse_date("2026-03-09").unwrap();

    assert_eq!(parsed, date!(2026 - 03 - 09));
    assert_eq!(format_date(parsed), "2026-03-09");
}

#[test]
fn test_parse_date_rejects_malformed() {
    assert!(matches!(
        parse_date("03/09/2026"),
        Err(DomainError::InvalidDate { .. })
    ));
}
