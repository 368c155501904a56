use thiserror::Error;

/// Failures surfaced by the aggregation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Connection, timeout, non-2xx status or an undecodable body.
    #[error("transport error: {method} {url}: {reason}")]
    Transport {
        method: &'static str,
        url: String,
        reason: String,
    },

    /// The API answered with `"error": true`.
    #[error("API Error: {message}")]
    Api { message: String },

    /// A field the operation needs is absent or has the wrong type.
    #[error("missing field in {context} response: {detail}")]
    MissingField {
        context: &'static str,
        detail: String,
    },

    /// A numeric field could not be read as a number.
    #[error("cannot parse {field} value {value:?}")]
    Parse { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
