//! Tests for error types and messages

use geoencode::{EncodeError, GeoPoint, OptionExt};

#[test]
fn test_error_messages() {
    let err = EncodeError::MissingRequiredField {
        shape: "connection points",
        field: "lat".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "missing required field 'lat' for connection points dataset"
    );

    let err = EncodeError::MalformedRow {
        line: 4,
        expected: 3,
        found: 2,
    };
    assert_eq!(
        err.to_string(),
        "malformed row at line 4: expected 3 fields, found 2"
    );

    let err = EncodeError::InvalidDomain {
        transform: "sqrt",
        value: -1.0,
    };
    assert!(err.to_string().contains("sqrt"));
}

#[test]
fn test_degenerate_message_names_endpoints() {
    let err = EncodeError::DegenerateGreatCircle {
        from: GeoPoint::new(0.0, 0.0),
        to: GeoPoint::new(0.0, 180.0),
    };
    assert_eq!(
        err.to_string(),
        "great circle between (0, 0) and (0, 180) is undefined"
    );
}

#[test]
fn test_option_ext() {
    let none: Option<f64> = None;
    assert_eq!(
        none.ok_or_empty_range("speed"),
        Err(EncodeError::EmptyRange {
            variable: "speed".to_string()
        })
    );
    assert_eq!(Some(1.0).ok_or_missing_field("segments", "x"), Ok(1.0));
    assert!(matches!(
        None::<u8>.ok_or_missing_field("segments", "x"),
        Err(EncodeError::MissingRequiredField { field, .. }) if field == "x"
    ));
}

#[test]
fn test_io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: EncodeError = io.into();
    assert!(matches!(err, EncodeError::Csv(ref msg) if msg.contains("gone")));
}

#[test]
fn test_errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<EncodeError>();
}
