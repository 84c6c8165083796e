//! Error types for the async adapters.

use thiserror::Error;

/// Errors surfaced by the sender half.
///
/// The underlying diode publish can never fail; the only error condition
/// the adapters add is cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The stream has been cancelled; the sender refuses new values.
    #[error("diode stream cancelled")]
    Cancelled,
}
