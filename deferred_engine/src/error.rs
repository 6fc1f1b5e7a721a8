//! Error types for the deferred engine
//!
//! This module defines the error types used throughout the engine,
//! including GPU resource allocation, attachment configuration and
//! binding state transitions.

use std::fmt;
use crate::graphics_device::PixelFormat;

/// Result type for deferred engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Deferred engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A GPU object (image, framebuffer object, shader program) could not be created
    ResourceAllocation(String),

    /// Pixel format outside the RGB / RGBA / depth families
    UnsupportedFormat(PixelFormat),

    /// Attachment name was never attached to the framebuffer
    UnknownAttachment(String),

    /// Attachment name is already used in the framebuffer
    DuplicateAttachment(String),

    /// The framebuffer already owns a depth attachment
    DuplicateDepthAttachment(String),

    /// Operation not allowed in the current framebuffer or binding state
    InvalidState(String),

    /// Backend-specific error
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ResourceAllocation(msg) => write!(f, "Resource allocation failed: {}", msg),
            Error::UnsupportedFormat(format) => write!(
                f,
                "Unsupported attachment format {:?} (expected one of RGB16/32(F/UI), RGBA16/32(F/UI), D32F)",
                format
            ),
            Error::UnknownAttachment(name) => write!(f, "Unknown attachment '{}'", name),
            Error::DuplicateAttachment(name) => write!(f, "Attachment '{}' already exists", name),
            Error::DuplicateDepthAttachment(existing) => write!(
                f,
                "Framebuffer already has a depth attachment ('{}')",
                existing
            ),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error at ERROR severity (with file:line) and evaluate to it
///
/// Takes either an `Error` value or a format string, which builds an
/// `Error::BackendError`.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("deferred::Framebuffer", Error::UnknownAttachment(name.to_string()));
/// let err = engine_err!("deferred::mock", "unknown image {:?}", image);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let err = $crate::deferred::Error::BackendError(format!($fmt $(, $arg)*));
        $crate::engine_error!($source, "{}", err);
        err
    }};
    ($source:expr, $err:expr) => {{
        let err = $err;
        $crate::engine_error!($source, "{}", err);
        err
    }};
}

/// Log an error and return it from the enclosing function
///
/// # Example
///
/// ```ignore
/// engine_bail!("deferred::Framebuffer", Error::DuplicateAttachment(name.to_string()));
/// engine_bail!("deferred::mock", "unknown framebuffer {:?}", framebuffer);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::engine_err!($source, $fmt $(, $arg)*))
    };
    ($source:expr, $err:expr) => {
        return Err($crate::engine_err!($source, $err))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
