use core::fmt;

/// Result alias for `clusterview`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering, projection and plotting.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Matrix dimension mismatch (usize).
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Input contained NaN or infinite values.
    NonFinite(&'static str),

    /// A reducer was asked to `transform` before it was fit.
    NotFitted,

    /// The pipeline has a shape that cannot be displayed.
    Pipeline(String),

    /// The dimensionality reduction backend failed.
    Reduction(String),

    /// The drawing backend failed.
    Render(String),

    /// Generic error with message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {requested} clusters from {n_items} items")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::NonFinite(what) => write!(f, "{what} contain non-finite values"),
            Error::NotFitted => write!(f, "reducer used before fit"),
            Error::Pipeline(msg) => write!(f, "invalid pipeline: {msg}"),
            Error::Reduction(msg) => write!(f, "dimensionality reduction failed: {msg}"),
            Error::Render(msg) => write!(f, "rendering failed: {msg}"),
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
