//! Request and response types for atomic store batches.

use std::fmt;

use crate::errors::StoreError;

/// A single write inside an atomic batch.
///
/// The set is closed on purpose: it holds exactly the writes the ledger needs to
/// perform inside one transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Set a field of a hash.
    HashSet {
        key: String,
        field: String,
        value: String,
    },
    /// Add a member to a sorted set with an absolute score.
    SortedSetAdd {
        key: String,
        member: String,
        score: f64,
    },
    /// Increment the score of a sorted-set member, creating it at `delta` if absent.
    SortedSetIncrement {
        key: String,
        member: String,
        delta: f64,
    },
    /// Add a member to a set.
    SetAdd { key: String, member: String },
    /// Remove a member from a set.
    SetRemove { key: String, member: String },
    /// Delete a whole key.
    Delete { key: String },
}

impl StoreOp {
    /// The key this operation writes to.
    pub fn key(&self) -> &str {
        match self {
            StoreOp::HashSet { key, .. }
            | StoreOp::SortedSetAdd { key, .. }
            | StoreOp::SortedSetIncrement { key, .. }
            | StoreOp::SetAdd { key, .. }
            | StoreOp::SetRemove { key, .. }
            | StoreOp::Delete { key } => key,
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::HashSet { key, field, .. } => write!(f, "HSET {} {}", key, field),
            StoreOp::SortedSetAdd { key, member, score } => {
                write!(f, "ZADD {} {} {}", key, score, member)
            }
            StoreOp::SortedSetIncrement { key, member, delta } => {
                write!(f, "ZINCRBY {} {} {}", key, delta, member)
            }
            StoreOp::SetAdd { key, member } => write!(f, "SADD {} {}", key, member),
            StoreOp::SetRemove { key, member } => write!(f, "SREM {} {}", key, member),
            StoreOp::Delete { key } => write!(f, "DEL {}", key),
        }
    }
}

/// An ordered group of writes applied entirely or not at all.
///
/// Built with chained calls, then handed to `KeyValueStore::execute_atomic`:
///
/// ```
/// use vote_ledger_repository::AtomicBatch;
///
/// let mut batch = AtomicBatch::new();
/// batch
///     .set_add("item_voted_by:Norway-1", "alice")
///     .sorted_set_increment("vote_counts", "Norway-1", 1.0);
/// assert_eq!(batch.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomicBatch {
    ops: Vec<StoreOp>,
}

impl AtomicBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary operation.
    pub fn push(&mut self, op: StoreOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn hash_set(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.push(StoreOp::HashSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn sorted_set_add(
        &mut self,
        key: impl Into<String>,
        member: impl Into<String>,
        score: f64,
    ) -> &mut Self {
        self.push(StoreOp::SortedSetAdd {
            key: key.into(),
            member: member.into(),
            score,
        })
    }

    pub fn sorted_set_increment(
        &mut self,
        key: impl Into<String>,
        member: impl Into<String>,
        delta: f64,
    ) -> &mut Self {
        self.push(StoreOp::SortedSetIncrement {
            key: key.into(),
            member: member.into(),
            delta,
        })
    }

    pub fn set_add(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.push(StoreOp::SetAdd {
            key: key.into(),
            member: member.into(),
        })
    }

    pub fn set_remove(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.push(StoreOp::SetRemove {
            key: key.into(),
            member: member.into(),
        })
    }

    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.push(StoreOp::Delete { key: key.into() })
    }

    /// The queued operations, in execution order.
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Result of a single operation inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOpResult {
    /// Rendered operation, for logging.
    pub op: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Integer reply, when the store returned one.
    pub reply: Option<i64>,
    /// Error if the operation failed.
    pub error: Option<StoreError>,
}

impl BatchOpResult {
    /// A successful operation.
    pub fn ok(op: &StoreOp, reply: Option<i64>) -> Self {
        Self {
            op: op.to_string(),
            success: true,
            reply,
            error: None,
        }
    }

    /// A failed operation.
    pub fn failed(op: &StoreOp, error: StoreError) -> Self {
        Self {
            op: op.to_string(),
            success: false,
            reply: None,
            error: Some(error),
        }
    }
}

/// Summary of an atomic batch containing aggregate statistics and per-operation results.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Total number of operations in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results, in batch order.
    pub results: Vec<BatchOpResult>,
}

impl BatchSummary {
    /// Build a summary from per-operation results.
    pub fn from_results(results: Vec<BatchOpResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Whether every operation reported success.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// The first recorded error, if any.
    pub fn first_error(&self) -> Option<&StoreError> {
        self.results.iter().find_map(|r| r.error.as_ref())
    }
}
