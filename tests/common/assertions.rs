//! Logged assertion helpers.
//!
//! These wrap the standard assertions with tracing output so a CI log shows
//! both values even when the panic message is truncated.

#![allow(dead_code)]

use std::fmt::Debug;

/// Assert equality with detailed logging.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq_logged("hex of red", rgb_to_hex(red), "#ff0000".to_string());
/// ```
#[track_caller]
pub fn assert_eq_logged<T: PartialEq + Debug>(context: &str, actual: T, expected: T) {
    tracing::debug!(
        context = context,
        expected = ?expected,
        actual = ?actual,
        "asserting equality"
    );

    if actual != expected {
        tracing::error!(
            context = context,
            expected = ?expected,
            actual = ?actual,
            "assertion failed: values not equal"
        );
    }

    assert_eq!(
        actual, expected,
        "{context}: expected {expected:?}, got {actual:?}"
    );
}

/// Assert that a result is `Ok`, returning the value.
#[track_caller]
pub fn assert_ok_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => {
            tracing::trace!(context = context, value = ?value, "result is ok");
            value
        }
        Err(err) => {
            tracing::error!(context = context, error = ?err, "assertion failed: expected Ok");
            panic!("{context}: expected Ok, got Err({err:?})");
        }
    }
}

/// Assert that a result is `Err`, returning the error.
#[track_caller]
pub fn assert_err_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> E {
    match result {
        Ok(value) => {
            tracing::error!(context = context, value = ?value, "assertion failed: expected Err");
            panic!("{context}: expected Err, got Ok({value:?})");
        }
        Err(err) => {
            tracing::trace!(context = context, error = ?err, "result is err");
            err
        }
    }
}

/// Assert that every channel of `actual` is within `tolerance` of `expected`.
#[track_caller]
pub fn assert_channels_within(
    context: &str,
    actual: (f64, f64, f64),
    expected: (f64, f64, f64),
    tolerance: f64,
) {
    let worst = [
        (actual.0 - expected.0).abs(),
        (actual.1 - expected.1).abs(),
        (actual.2 - expected.2).abs(),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max);

    tracing::debug!(
        context = context,
        actual = ?actual,
        expected = ?expected,
        worst = worst,
        "comparing channels"
    );

    assert!(
        worst <= tolerance,
        "{context}: {actual:?} differs from {expected:?} by {worst} (> {tolerance})"
    );
}
