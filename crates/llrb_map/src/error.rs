use thiserror::Error;

/// Errors returned by the checked entry points of [`LlrbMap`](crate::LlrbMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("key argument is missing")]
    MissingKey,
}

/// A broken tree invariant found by [`LlrbMap::validate`](crate::LlrbMap::validate).
///
/// `depth` counts nodes from the root, which sits at depth 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("root link is red")]
    RedRoot,
    #[error("red right link below depth {depth}")]
    RedRightLink { depth: usize },
    #[error("two consecutive red links below depth {depth}")]
    ConsecutiveReds { depth: usize },
    #[error("unbalanced black links at depth {depth}: left {left}, right {right}")]
    UnbalancedBlacks {
        depth: usize,
        left: usize,
        right: usize,
    },
    #[error("key out of order at depth {depth}")]
    OutOfOrder { depth: usize },
    #[error("stored length {stored} does not match {counted} reachable nodes")]
    LengthMismatch { stored: usize, counted: usize },
}
