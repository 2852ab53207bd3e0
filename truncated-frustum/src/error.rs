use thiserror::Error;

/// The ways truncation can give up.
///
/// Both leave the caller with a valid fallback: [`Truncation::unclipped`](crate::Truncation::unclipped)
/// describes the whole frustum as visible.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TruncationError {
    #[error("the arrangement has {points} points, more than the limit of {limit}")]
    TooManyPoints { points: usize, limit: usize },
    #[error("partition covers {covered} of {expected} square pixels after {rounds} rounds")]
    NonConvergence {
        covered: f64,
        expected: f64,
        rounds: usize,
    },
}
