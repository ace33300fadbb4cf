//! Error types for graph construction and the backward traversals.

use thiserror::Error;

/// Result type for goal-tree operations
pub type GoalTreeResult<T> = Result<T, GoalTreeError>;

/// Errors raised by the goal-tree engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalTreeError {
    /// A label that names no node in the graph
    #[error("Unknown proposition: '{0}'")]
    UnknownProposition(String),

    /// A rule that cannot be turned into graph edges.
    /// `index` is the rule's position in its source sequence.
    #[error("Invalid rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },

    /// A backward traversal re-entered a node it was still expanding
    #[error("Cyclic derivation through '{0}'")]
    CyclicDerivation(String),

    /// The oracle can no longer answer (closed input, exhausted script)
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Reading or parsing a rule file failed
    #[error("Rule file error: {0}")]
    RuleFile(String),
}
