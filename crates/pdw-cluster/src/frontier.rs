//! # Frontier Worklist
//!
//! The bounded worklist of points awaiting expansion during one cluster's
//! density-reachability traversal. Built on a slot leased from the
//! [`ContainerPool`]; supports stack (LIFO) or deque (FIFO) discipline,
//! selected when the frontier is acquired.
//!
//! The discipline changes the order in which discovered points are expanded,
//! never the final partition, so both stay available as a tunable.
//!
//! ## Example
//!
//! ```rust
//! use pdw_cluster::{ContainerPool, Frontier, FrontierKind, PoolConfig};
//!
//! let pool = ContainerPool::new(PoolConfig { slots: 2, slot_capacity: 16 }).unwrap();
//! let mut frontier = Frontier::acquire(&pool, FrontierKind::Fifo).unwrap();
//!
//! frontier.push(3).unwrap();
//! frontier.push(7).unwrap();
//! assert_eq!(frontier.pop().unwrap(), 3); // FIFO pops the front
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};
use crate::pool::{ContainerPool, SlotHandle};

/// Expansion-order discipline for the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontierKind {
    /// Stack discipline: pop returns the most recently pushed index.
    Lifo,
    /// Deque discipline: pop returns the oldest pushed index (ring buffer).
    Fifo,
}

/// Bounded sequential container of point indices over one leased pool slot.
///
/// Capacity is the pool's per-slot capacity, fixed at pool configuration
/// time. The slot stays leased for the frontier's whole lifetime; dropping
/// the frontier (or releasing via [`into_slot`](Frontier::into_slot))
/// returns it.
pub struct Frontier {
    slot: SlotHandle,
    kind: FrontierKind,
    /// Read position (FIFO only).
    head: usize,
    /// Next write position; also the LIFO top.
    tail: usize,
    len: usize,
}

impl Frontier {
    /// Lease a slot from the pool and wrap it as an empty frontier.
    pub fn acquire(pool: &ContainerPool, kind: FrontierKind) -> Result<Self> {
        let slot = pool.acquire()?;
        Ok(Self {
            slot,
            kind,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    /// Discipline this frontier was acquired with.
    #[inline]
    pub fn kind(&self) -> FrontierKind {
        self.kind
    }

    /// Fixed capacity in point indices.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slot.capacity()
    }

    /// Number of stored indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the frontier holds no indices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a point index.
    ///
    /// Fails with [`ClusterError::ContainerOverflow`] at capacity. During a
    /// correctly sized clustering run each point is pushed at most once, so
    /// overflow there means the sizing precondition was violated.
    pub fn push(&mut self, index: u32) -> Result<()> {
        let capacity = self.capacity();
        if self.len == capacity {
            return Err(ClusterError::ContainerOverflow { capacity });
        }

        self.slot.as_mut_slice()[self.tail] = index;
        self.tail = (self.tail + 1) % capacity;
        self.len += 1;
        Ok(())
    }

    /// Remove and return the next index per the discipline.
    ///
    /// Fails with [`ClusterError::ContainerUnderflow`] when empty.
    pub fn pop(&mut self) -> Result<u32> {
        if self.len == 0 {
            return Err(ClusterError::ContainerUnderflow);
        }

        let capacity = self.capacity();
        let value = match self.kind {
            FrontierKind::Fifo => {
                let v = self.slot.as_slice()[self.head];
                self.head = (self.head + 1) % capacity;
                v
            }
            FrontierKind::Lifo => {
                self.tail = (self.tail + capacity - 1) % capacity;
                self.slot.as_slice()[self.tail]
            }
        };
        self.len -= 1;
        Ok(value)
    }

    /// Reset to empty without releasing the leased slot.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Consume the frontier and hand back its slot lease, so the caller can
    /// return it through [`ContainerPool::release`].
    pub fn into_slot(self) -> SlotHandle {
        self.slot
    }
}
