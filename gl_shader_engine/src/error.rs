//! Error types for the GLShader engine
//!
//! Errors are produced by the GPU binding layer (compile, link, missing source).
//! The shader core never hands them back to draw code: a failing variant is a
//! fatal configuration error reported through `engine_fatal!`.

use std::fmt;

/// Result type for GLShader engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// GLShader engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (driver, context, function loading)
    BackendError(String),

    /// A shader source or macro library file could not be found
    SourceNotFound(String),

    /// A shader stage failed to compile
    CompileFailed(String),

    /// The program failed to link
    LinkFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::SourceNotFound(msg) => write!(f, "Shader source not found: {}", msg),
            Error::CompileFailed(msg) => write!(f, "Shader compile failed: {}", msg),
            Error::LinkFailed(msg) => write!(f, "Program link failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error and build an `Error::BackendError` from the same message
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::glshader::Error::BackendError(message)
    }};
}

/// Log an error and return it from the enclosing function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
