/// Error when constructing or querying a shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A required value is missing or not a usable number.
    #[error("Invalid argument `{param}`: {reason}")]
    InvalidArgument {
        param: &'static str,
        reason: &'static str,
    },
    /// A value is present but outside the range the operation accepts.
    #[error("Argument `{param}` out of range: {reason}")]
    InvalidRange {
        param: &'static str,
        reason: &'static str,
    },
    /// The operation is not implemented for this kind of shape.
    #[error("Operation `{operation}` is not supported by {shape}")]
    Unsupported {
        operation: &'static str,
        shape: &'static str,
    },
}

impl ShapeError {
    pub(crate) fn invalid_argument(param: &'static str, reason: &'static str) -> Self {
        ShapeError::InvalidArgument { param, reason }
    }

    pub(crate) fn invalid_range(param: &'static str, reason: &'static str) -> Self {
        ShapeError::InvalidRange { param, reason }
    }
}
