//! # Container Pool
//!
//! A fixed registry of pre-allocated index buffers shared by the clustering
//! engine's auxiliary containers (frontier worklist, neighbor scratch list).
//!
//! ## Design
//!
//! - Fixed number of fixed-size slots, all allocated at pool creation
//! - Occupancy tracked by a bitmap in a single atomic word
//! - Whole slots are leased and reclaimed, never partial slots
//! - A leased slot is returned automatically when its handle is dropped
//!
//! The target is a single-core signal processor, so acquire/release are never
//! contended in practice; the atomic bitmap is what keeps a multi-threaded
//! host port from needing extra serialization around the pool.
//!
//! ## Example
//!
//! ```rust
//! use pdw_cluster::{ContainerPool, PoolConfig};
//!
//! let pool = ContainerPool::new(PoolConfig { slots: 4, slot_capacity: 128 }).unwrap();
//!
//! let slot = pool.acquire().unwrap();
//! assert_eq!(pool.available(), 3);
//!
//! pool.release(slot).unwrap();
//! assert_eq!(pool.available(), 4);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Sizing of the container pool.
///
/// `slot_capacity` must be at least the point count of any store the
/// clustering engine will run over; the engine checks this precondition
/// before touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of slots (max 64, bitmap width).
    pub slots: usize,
    /// Capacity of each slot in point indices.
    pub slot_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            slots: 8,
            slot_capacity: 4096,
        }
    }
}

/// Internal pool state shared between the pool and its leased handles.
struct PoolInner {
    /// The slot storage. A slot's contents are only touched through the
    /// handle that holds its claim.
    slots: Vec<Vec<u32>>,
    /// Bitmap of free slots (1 = free).
    free: AtomicU64,
    count: usize,
    slot_capacity: usize,
}

/// A fixed pool of pre-allocated index buffers.
///
/// Slots are leased with [`acquire`](ContainerPool::acquire) and reclaimed
/// either explicitly via [`release`](ContainerPool::release) or when the
/// [`SlotHandle`] drops. At most `slots` handles can be live at once.
pub struct ContainerPool {
    inner: Arc<PoolInner>,
}

impl ContainerPool {
    /// Create a pool with all slots allocated up front.
    ///
    /// Fails with [`ClusterError::InvalidParams`] for a zero or >64 slot
    /// count or a zero slot capacity, and with
    /// [`ClusterError::AllocationFailure`] if the backing storage cannot be
    /// reserved. Slots already built when a later reservation fails are
    /// freed on the error return.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.slots == 0 || config.slots > 64 {
            return Err(ClusterError::InvalidParams(format!(
                "slot count must be 1..=64, got {}",
                config.slots
            )));
        }
        if config.slot_capacity == 0 {
            return Err(ClusterError::InvalidParams(
                "slot capacity must be non-zero".into(),
            ));
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(config.slots)
            .map_err(|_| ClusterError::AllocationFailure {
                bytes: config.slots * std::mem::size_of::<Vec<u32>>(),
            })?;
        for _ in 0..config.slots {
            let mut buf = Vec::new();
            buf.try_reserve_exact(config.slot_capacity).map_err(|_| {
                ClusterError::AllocationFailure {
                    bytes: config.slot_capacity * std::mem::size_of::<u32>(),
                }
            })?;
            buf.resize(config.slot_capacity, 0);
            slots.push(buf);
        }

        let free = if config.slots == 64 {
            u64::MAX
        } else {
            (1u64 << config.slots) - 1
        };

        Ok(Self {
            inner: Arc::new(PoolInner {
                slots,
                free: AtomicU64::new(free),
                count: config.slots,
                slot_capacity: config.slot_capacity,
            }),
        })
    }

    /// Number of slots in the pool.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.inner.count
    }

    /// Capacity of each slot in point indices.
    #[inline]
    pub fn slot_capacity(&self) -> usize {
        self.inner.slot_capacity
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.inner.free.load(Ordering::Relaxed).count_ones() as usize
    }

    /// Check whether every slot is leased.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.available() == 0
    }

    /// Lease the lowest free slot.
    ///
    /// O(slot count) bitmap scan. Fails with [`ClusterError::PoolExhausted`]
    /// when every slot is leased; a slot only frees when another consumer
    /// releases one, so there is no retry here.
    pub fn acquire(&self) -> Result<SlotHandle> {
        loop {
            let free = self.inner.free.load(Ordering::Acquire);
            if free == 0 {
                return Err(ClusterError::PoolExhausted {
                    slots: self.inner.count,
                });
            }

            let index = free.trailing_zeros() as usize;
            let mask = 1u64 << index;

            match self.inner.free.compare_exchange_weak(
                free,
                free & !mask,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    return Ok(SlotHandle {
                        pool: Arc::clone(&self.inner),
                        index,
                    });
                }
                Err(_) => continue,
            }
        }
    }

    /// Return a leased slot to this pool.
    ///
    /// Releasing a handle that belongs to a different pool is a caller
    /// error: it is reported as [`ClusterError::ForeignHandle`], and the
    /// slot still returns to its true owner when the handle drops.
    pub fn release(&self, handle: SlotHandle) -> Result<()> {
        if !Arc::ptr_eq(&self.inner, &handle.pool) {
            tracing::warn!("release: slot {} does not belong to this pool", handle.index);
            return Err(ClusterError::ForeignHandle { slot: handle.index });
        }
        // Dropping the handle clears its bit.
        Ok(())
    }
}

/// Exclusive lease on one pool slot.
///
/// The slot is returned to its pool when the handle is dropped, on every
/// path out of a clustering run, including early error returns.
pub struct SlotHandle {
    pool: Arc<PoolInner>,
    index: usize,
}

impl SlotHandle {
    /// View the slot contents.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.pool.slots[self.index]
    }

    /// Mutable view of the slot contents.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        // Safety: this handle holds the exclusive claim on `index`; no other
        // live handle or pool method touches that slot's contents.
        unsafe {
            let ptr = self.pool.slots.as_ptr().add(self.index) as *mut Vec<u32>;
            (*ptr).as_mut_slice()
        }
    }

    /// Slot capacity in point indices.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.slot_capacity
    }

    /// Index of this slot within its pool.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Drop for SlotHandle {
    fn drop(&mut self) {
        let mask = 1u64 << self.index;
        self.pool.free.fetch_or(mask, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_creation() {
        let pool = ContainerPool::new(PoolConfig {
            slots: 4,
            slot_capacity: 1024,
        })
        .unwrap();
        assert_eq!(pool.slot_count(), 4);
        assert_eq!(pool.slot_capacity(), 1024);
        assert_eq!(pool.available(), 4);
        assert!(!pool.is_exhausted());
    }

    #[test]
    fn test_default_config_matches_target_sizing() {
        let config = PoolConfig::default();
        assert_eq!(config.slots, 8);
        assert_eq!(config.slot_capacity, 4096);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            ContainerPool::new(PoolConfig { slots: 0, slot_capacity: 16 }),
            Err(ClusterError::InvalidParams(_))
        ));
        assert!(matches!(
            ContainerPool::new(PoolConfig { slots: 65, slot_capacity: 16 }),
            Err(ClusterError::InvalidParams(_))
        ));
        assert!(matches!(
            ContainerPool::new(PoolConfig { slots: 4, slot_capacity: 0 }),
            Err(ClusterError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_acquire_release_round_trip() {
        let pool = ContainerPool::new(PoolConfig {
            slots: 2,
            slot_capacity: 10,
        })
        .unwrap();

        let before = pool.available();
        let slot = pool.acquire().unwrap();
        assert_eq!(pool.available(), before - 1);

        pool.release(slot).unwrap();
        assert_eq!(pool.available(), before, "occupancy must return to pre-acquire value");
    }

    #[test]
    fn test_exhaustion_on_extra_acquire() {
        let pool = ContainerPool::new(PoolConfig {
            slots: 3,
            slot_capacity: 8,
        })
        .unwrap();

        let held: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();
        assert!(pool.is_exhausted());

        // The (S+1)th acquire without an intervening release must fail.
        assert!(matches!(
            pool.acquire(),
            Err(ClusterError::PoolExhausted { slots: 3 })
        ));

        drop(held);
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn test_release_into_foreign_pool_reported() {
        let pool_a = ContainerPool::new(PoolConfig {
            slots: 1,
            slot_capacity: 8,
        })
        .unwrap();
        let pool_b = ContainerPool::new(PoolConfig {
            slots: 1,
            slot_capacity: 8,
        })
        .unwrap();

        let slot = pool_a.acquire().unwrap();
        let err = pool_b.release(slot).unwrap_err();
        assert_eq!(err, ClusterError::ForeignHandle { slot: 0 });

        // The slot still went back to its true owner via drop.
        assert_eq!(pool_a.available(), 1);
        assert_eq!(pool_b.available(), 1);
    }

    #[test]
    fn test_slot_access() {
        let pool = ContainerPool::new(PoolConfig {
            slots: 1,
            slot_capacity: 100,
        })
        .unwrap();

        let mut slot = pool.acquire().unwrap();
        assert_eq!(slot.capacity(), 100);

        slot.as_mut_slice()[0] = 42;
        slot.as_mut_slice()[99] = 7;
        assert_eq!(slot.as_slice()[0], 42);
        assert_eq!(slot.as_slice()[99], 7);
    }

    #[test]
    fn test_distinct_slot_indices() {
        let pool = ContainerPool::new(PoolConfig {
            slots: 4,
            slot_capacity: 8,
        })
        .unwrap();

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_ne!(a.index(), b.index());
        assert!(a.index() < 4 && b.index() < 4);
    }

    #[test]
    fn test_drop_releases_on_early_return() {
        let pool = ContainerPool::new(PoolConfig {
            slots: 1,
            slot_capacity: 8,
        })
        .unwrap();

        fn bails_early(pool: &ContainerPool) -> Result<()> {
            let _slot = pool.acquire()?;
            Err(ClusterError::ContainerUnderflow)
        }

        assert!(bails_early(&pool).is_err());
        assert_eq!(pool.available(), 1, "slot must free on the error path");
    }
}
