//! Error types for expansion and sweep execution

use std::error::Error;
use std::fmt;

/// Errors raised while merging, nesting, or expanding parameter trees.
///
/// Expansion is pure: any of these abort the whole call before a sweep
/// target is ever touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// Two values under the same path cannot be merged because at least one
    /// of them is not a group. Carries rendered forms of both sides.
    TypeMismatch { left: String, right: String },
    /// Sibling keys in a group expanded to unequal lengths.
    LengthMismatch { expected: usize, got: usize },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::TypeMismatch { left, right } => {
                write!(f, "cannot merge {left} and {right}")
            }
            ExpandError::LengthMismatch { expected, got } => {
                write!(f, "unequal expansion lengths: expected {expected}, got {got}")
            }
        }
    }
}

impl Error for ExpandError {}

/// Errors produced by [`crate::FieldAccess`] implementations, scoped to the
/// failing path segment. The sweep driver wraps them with element context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No field with this name on the current object.
    UnknownField(String),
    /// The path ended on a field that is itself a sub-object.
    NotAScalar(String),
    /// The path tried to descend through a scalar field.
    NotAnObject(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::UnknownField(name) => write!(f, "unknown field `{name}`"),
            FieldError::NotAScalar(name) => write!(f, "field `{name}` is not a scalar"),
            FieldError::NotAnObject(name) => write!(f, "field `{name}` is not a sub-object"),
        }
    }
}

impl Error for FieldError {}

/// Errors raised while driving a sweep over a target.
#[derive(Debug)]
pub enum SweepError {
    /// The target has no element with this name.
    UnknownElement(String),
    /// Field access failed at `path` inside `element`.
    Field {
        element: String,
        path: String,
        error: FieldError,
    },
    /// A configuration's top-level value for this element is a bare scalar,
    /// not an attribute group.
    NotAGroup(String),
    /// The target's trace operation failed.
    Trace(Box<dyn Error + Send + Sync>),
    /// Restoring the target failed while unwinding another error; both are
    /// reported so the caller knows the target may be left corrupted.
    Restore {
        error: Box<SweepError>,
        while_handling: Box<SweepError>,
    },
    /// Normalizing the parameter spec failed before any mutation.
    Expand(ExpandError),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::UnknownElement(name) => write!(f, "unknown element `{name}`"),
            SweepError::Field {
                element,
                path,
                error,
            } => write!(f, "element `{element}`, path `{path}`: {error}"),
            SweepError::NotAGroup(element) => {
                write!(f, "configuration for element `{element}` is not an attribute group")
            }
            SweepError::Trace(error) => write!(f, "trace failed: {error}"),
            SweepError::Restore {
                error,
                while_handling,
            } => write!(
                f,
                "restore failed ({error}) while handling: {while_handling}"
            ),
            SweepError::Expand(error) => write!(f, "{error}"),
        }
    }
}

impl Error for SweepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SweepError::Field { error, .. } => Some(error),
            SweepError::Trace(error) => Some(error.as_ref()),
            SweepError::Restore { while_handling, .. } => Some(while_handling.as_ref()),
            SweepError::Expand(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ExpandError> for SweepError {
    fn from(error: ExpandError) -> Self {
        SweepError::Expand(error)
    }
}
