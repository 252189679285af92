use std::error::Error;

use error_strata::{deferred, ensure, record, ErrorBuilder, ErrorRecord};

#[test]
fn record_formats_the_message() {
    let err = record!("user {} not found in {}", 7, "eu-west");
    assert_eq!(err.to_string(), "user 7 not found in eu-west");
}

#[test]
fn record_uses_the_given_builder() {
    let builder = ErrorBuilder::new().code("E404");
    let err = record!(builder => "missing {}", "page");

    assert_eq!(err.to_string(), "missing page");
    assert_eq!(err.code(), Some("E404"));
}

#[test]
fn deferred_macro_builds_a_deferred_value() {
    let base = 40;
    let value = deferred!(base + 2);

    assert!(value.is_deferred());
    assert_eq!(value.resolve(), 42);
}

fn check_positive(n: i64) -> Result<i64, ErrorRecord> {
    ensure!(n > 0);
    Ok(n)
}

fn check_even(n: i64) -> Result<i64, ErrorRecord> {
    ensure!(n % 2 == 0, "{} is odd", n);
    Ok(n)
}

fn check_small(n: i64) -> Result<i64, Box<dyn Error + Send + Sync>> {
    let builder = ErrorBuilder::new().code("too_large");
    ensure!(n < 100, builder => "{} exceeds {}", n, 100);
    Ok(n)
}

#[test]
fn ensure_passes_when_the_condition_holds() {
    assert_eq!(check_positive(4).unwrap(), 4);
    assert_eq!(check_even(4).unwrap(), 4);
    assert_eq!(check_small(4).unwrap(), 4);
}

#[test]
fn ensure_without_message_names_the_condition() {
    let err = check_positive(-1).unwrap_err();
    assert_eq!(err.to_string(), "condition failed: n > 0");
}

#[test]
fn ensure_formats_its_message() {
    assert_eq!(check_even(3).unwrap_err().to_string(), "3 is odd");
}

#[test]
fn ensure_converts_into_the_return_error_type() {
    let err = check_small(250).unwrap_err();
    let record = err.downcast_ref::<ErrorRecord>().unwrap();

    assert_eq!(record.to_string(), "250 exceeds 100");
    assert_eq!(record.code(), Some("too_large"));
}
