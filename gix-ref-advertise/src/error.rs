//! Error taxonomy for the ref advertisement encoder.

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or emitting a ref advertisement.
///
/// Object-resolution failures (an unresolvable ref, an unresolvable peel
/// target, an unknown alternate-source id) are *not* represented here: per
/// the wire protocol, a ref that vanishes between listing and advertising is
/// tolerated and the ref is silently dropped instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The line sink failed to write or finalize the stream.
    #[error("the line sink failed: {0}")]
    Io(#[from] std::io::Error),
    /// A ref name contained a NUL byte, which the wire format cannot encode.
    #[error("ref name contains a NUL byte")]
    InvalidRefName,
    /// A capability was registered, or deref-tags was toggled, after the
    /// first advertisement line had already been emitted.
    #[error("capabilities and deref-tags may only be configured before the first emitted line")]
    AfterFirstLine,
    /// An emission was attempted after `end()` had already closed the sink.
    #[error("the advertisement stream has already been closed")]
    SinkClosed,
}
