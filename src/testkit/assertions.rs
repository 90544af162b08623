//! Assertion macros for assembly results.
//!
//! - [`crate::assert_result_ok!`] - Assert Result is Ok and extract value
//! - [`crate::assert_result_err!`] - Assert Result is Err and extract error
//! - [`crate::assert_error_code!`] - Assert an `AssemblyError` carries a code
//!
//! # Example
//!
//! ```rust
//! use exam_assembly::errors::{AssemblyError, ErrorCode};
//! use exam_assembly::{assert_error_code, assert_result_err, assert_result_ok};
//!
//! let ok: Result<u32, AssemblyError> = Ok(3);
//! assert_eq!(assert_result_ok!(ok), 3);
//!
//! let err: Result<u32, AssemblyError> = Err(AssemblyError::no_content("exam-1"));
//! assert_error_code!(err, ErrorCode::NO_CONTENT);
//! ```

/// Assert that a Result is Ok and extract the value.
///
/// An optional format string prefixes the panic message.
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr $(,)?) => {
        $crate::assert_result_ok!($result, "assert_result_ok")
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!(
                "{}: expected Ok, got Err({:?}) at {}:{}",
                format_args!($($msg)+),
                err,
                file!(),
                line!()
            ),
        }
    };
}

/// Assert that a Result is Err and extract the error.
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr $(,)?) => {
        $crate::assert_result_err!($result, "assert_result_err")
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => panic!(
                "{}: expected Err, got Ok({:?}) at {}:{}",
                format_args!($($msg)+),
                value,
                file!(),
                line!()
            ),
            Err(err) => err,
        }
    };
}

/// Assert that a Result failed with the given [`ErrorCode`](crate::errors::ErrorCode)
/// and extract the error.
#[macro_export]
macro_rules! assert_error_code {
    ($result:expr, $code:expr) => {{
        let err = $crate::assert_result_err!($result);
        assert_eq!(
            err.code(),
            $code,
            "unexpected error: {} at {}:{}",
            err,
            file!(),
            line!()
        );
        err
    }};
}
