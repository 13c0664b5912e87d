//! Error types for PDW clustering operations.

use thiserror::Error;

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur while building containers or running a clustering pass.
///
/// None of these are recoverable mid-run: a clustering run either completes
/// with a fully consistent label assignment or aborts, leaving only the state
/// that was already finalized at the point of failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// Every slot in the container pool is currently leased.
    #[error("container pool exhausted: all {slots} slots in use")]
    PoolExhausted { slots: usize },

    /// A bounded container was pushed past its fixed capacity.
    ///
    /// During a clustering run this means the sizing precondition
    /// (slot capacity >= point count) was violated.
    #[error("container overflow: capacity {capacity} exceeded")]
    ContainerOverflow { capacity: usize },

    /// Pop from an empty bounded container.
    #[error("container underflow: pop from empty container")]
    ContainerUnderflow,

    /// A clustering run was attempted before the point store was loaded.
    #[error("point store not initialized: {loaded} of {capacity} points loaded")]
    NotInitialized { loaded: usize, capacity: usize },

    /// Heap-backed initialization could not reserve its storage.
    #[error("allocation failure: could not reserve {bytes} bytes")]
    AllocationFailure { bytes: usize },

    /// A slot handle was released into a pool it does not belong to.
    ///
    /// The slot still returns to its true owner when the handle drops, so
    /// this reports the caller error without corrupting either pool.
    #[error("slot {slot} does not belong to this pool")]
    ForeignHandle { slot: usize },

    /// The pool's per-slot capacity cannot hold one index per point.
    #[error("pool slot capacity {slot_capacity} is smaller than point count {points}")]
    SlotTooSmall { slot_capacity: usize, points: usize },

    /// Configuration rejected during construction.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
