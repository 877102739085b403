use tracing::debug;

use crate::error::InvariantError;
use crate::map::LlrbMap;
use crate::node::{Color, Node, is_red};

/// Shape summary returned by [`LlrbMap::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Nodes reachable from the root.
    pub entries: usize,
    /// Black links on every root-to-empty path.
    pub black_height: usize,
    /// Nodes on the longest root-to-leaf path.
    pub max_depth: usize,
}

impl<K: Ord, V> LlrbMap<K, V> {
    /// Checks every structural invariant of the tree:
    /// - the root link is black,
    /// - red links lean left and never follow another red link,
    /// - every root-to-empty path crosses the same number of black links,
    /// - keys are in strictly increasing in-order sequence,
    /// - the stored length matches the number of nodes.
    pub fn validate(&self) -> Result<Stats, InvariantError> {
        let result = self.check();
        if let Err(err) = &result {
            debug!(%err, len = self.len(), "llrb invariant check failed");
        }
        result
    }

    fn check(&self) -> Result<Stats, InvariantError> {
        let root = self.root();
        if root.is_some_and(Node::is_red) {
            return Err(InvariantError::RedRoot);
        }
        let mut stats = Stats::default();
        let black_height = check_subtree(root, None, None, 1, &mut stats)?;
        stats.black_height = black_height;
        if stats.entries != self.len() {
            return Err(InvariantError::LengthMismatch {
                stored: self.len(),
                counted: stats.entries,
            });
        }
        Ok(stats)
    }
}

/// Returns the black height of `node`, with every key strictly inside `(low, high)`.
fn check_subtree<K: Ord, V>(
    node: Option<&Node<K, V>>,
    low: Option<&K>,
    high: Option<&K>,
    depth: usize,
    stats: &mut Stats,
) -> Result<usize, InvariantError> {
    let Some(node) = node else {
        return Ok(0);
    };
    stats.entries += 1;
    stats.max_depth = stats.max_depth.max(depth);

    if low.is_some_and(|low| node.key <= *low) || high.is_some_and(|high| node.key >= *high) {
        return Err(InvariantError::OutOfOrder { depth });
    }
    if is_red(&node.right) {
        return Err(InvariantError::RedRightLink { depth });
    }
    if node.is_red() && is_red(&node.left) {
        return Err(InvariantError::ConsecutiveReds { depth });
    }

    let left = check_subtree(node.left.as_deref(), low, Some(&node.key), depth + 1, stats)?;
    let right = check_subtree(node.right.as_deref(), Some(&node.key), high, depth + 1, stats)?;
    if left != right {
        return Err(InvariantError::UnbalancedBlacks { depth, left, right });
    }
    Ok(left + usize::from(node.color == Color::Black))
}
