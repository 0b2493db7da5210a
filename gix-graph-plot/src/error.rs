//! Error taxonomy for the commit graph lane allocator.

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while binding or driving the lane allocator.
///
/// Once a plot-aware commit source is bound, `enter` has no recoverable
/// error path: a violated internal invariant is a programmer error and is
/// reported as a fatal assertion (`panic!`/`debug_assert!`), not a `Result`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bound commit source did not declare itself plot-aware (i.e. it
    /// does not guarantee child-before-parent delivery order).
    #[error("the commit source is not plot-aware: commits must be delivered child-before-parent")]
    WrongSource,
}
