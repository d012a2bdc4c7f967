//! Utility macros for the protocol engine.

/// Returns early with `$error` when `$predicate` does not hold.
///
/// Works like `assert!`, but produces an `Err` instead of panicking, which keeps
/// validation of wire input and handler calls on the `Result` path.
///
/// ```ignore
/// ensure!(headers.len() <= MAX_HEADER_NUM, ParseError::too_many_headers(MAX_HEADER_NUM));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
