//! # Clustering Engine
//!
//! Density-based clustering (DBSCAN) of pulse descriptor words into emitter
//! groups, sized for a resource-constrained single-core signal processor:
//! no recursion, no allocation during a run, and strict fixed-capacity
//! failure semantics.
//!
//! Neighbor search is a linear scan over the whole store (point counts are
//! capped at a few thousand, so no spatial index is warranted). The
//! expansion worklist and the neighbor scratch list each lease one slot from
//! the shared [`ContainerPool`], so a run needs two free slots.
//!
//! ## Example
//!
//! ```rust
//! use pdw_cluster::{
//!     ClusterParams, ClusteringEngine, ContainerPool, DistanceMetric, PointStore,
//!     PoolConfig, RawPdw, NOISE,
//! };
//!
//! let pool = ContainerPool::new(PoolConfig { slots: 4, slot_capacity: 64 }).unwrap();
//! let mut store = PointStore::new(6).unwrap();
//! store
//!     .load(&[
//!         RawPdw { aoa: 0, fc: 0, pw: 0 },
//!         RawPdw { aoa: 1, fc: 0, pw: 1 },
//!         RawPdw { aoa: 2, fc: 0, pw: 0 },
//!         RawPdw { aoa: 50, fc: 0, pw: 50 },
//!         RawPdw { aoa: 51, fc: 0, pw: 51 },
//!         RawPdw { aoa: 100, fc: 0, pw: 100 },
//!     ])
//!     .unwrap();
//!
//! let engine = ClusteringEngine::new(ClusterParams {
//!     epsilon: 5,
//!     min_pts: 3,
//!     metric: DistanceMetric::AoaPw,
//!     ..ClusterParams::default()
//! })
//! .unwrap();
//!
//! let groups = engine.cluster(&mut store, &pool).unwrap();
//! assert_eq!(groups, 1);
//! assert_eq!(store.labels(), &[0, 0, 0, NOISE, NOISE, NOISE]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};
use crate::frontier::{Frontier, FrontierKind};
use crate::pool::ContainerPool;
use crate::store::{PointStore, Pdw, VisitState};

/// Default pulse-width normalization divisor for [`DistanceMetric::AoaFreqPw`].
///
/// Brings the pulse-width axis to a magnitude comparable with the angle and
/// frequency axes in the source capture format.
pub const DEFAULT_PW_SCALE: u32 = 70;

/// Distance function over two pulse descriptor words.
///
/// The two forms come from different revisions of the reference processor;
/// a deployment picks one and never mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Canonical three-axis form: `|daoa| + |dfreq| + |dpw| / pw_scale`.
    AoaFreqPw {
        /// Pulse-width normalization divisor; must be non-zero.
        pw_scale: u32,
    },
    /// Two-axis alternate: `|daoa| + |dpw|`, no frequency term.
    AoaPw,
}

/// Whether a point's epsilon-neighborhood counts the point itself.
///
/// Canonical is [`IncludeSelf`](NeighborMode::IncludeSelf): `distance(i, i)
/// = 0` always passes, so a neighborhood size is at least 1 and `min_pts`
/// is calibrated as "neighborhood size including self".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborMode {
    /// The query point counts toward its own neighborhood (canonical).
    IncludeSelf,
    /// The query point is excluded (documented alternate calibration).
    ExcludeSelf,
}

/// Parameters for one clustering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Neighbor radius, in the units of the configured metric.
    pub epsilon: u32,
    /// Minimum neighborhood size for a core point (see [`NeighborMode`]).
    pub min_pts: usize,
    /// Distance function.
    pub metric: DistanceMetric,
    /// Self-inclusion convention for neighborhoods.
    pub neighbor_mode: NeighborMode,
    /// Expansion-order discipline for the frontier worklist.
    pub frontier: FrontierKind,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            epsilon: 5,
            min_pts: 3,
            metric: DistanceMetric::AoaFreqPw {
                pw_scale: DEFAULT_PW_SCALE,
            },
            neighbor_mode: NeighborMode::IncludeSelf,
            frontier: FrontierKind::Fifo,
        }
    }
}

/// DBSCAN engine over a [`PointStore`], using pool-leased worklists.
///
/// A run visits each index at most once as a seed and pushes each point onto
/// the frontier at most once, so the hard bound is O(capacity^2) distance
/// evaluations.
pub struct ClusteringEngine {
    params: ClusterParams,
}

impl ClusteringEngine {
    /// Create an engine, validating the parameters.
    pub fn new(params: ClusterParams) -> Result<Self> {
        if params.min_pts == 0 {
            return Err(ClusterError::InvalidParams(
                "min_pts must be at least 1".into(),
            ));
        }
        if let DistanceMetric::AoaFreqPw { pw_scale: 0 } = params.metric {
            return Err(ClusterError::InvalidParams(
                "pw_scale must be non-zero".into(),
            ));
        }
        Ok(Self { params })
    }

    /// The parameters this engine was built with.
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Cluster the store in place and return the group count.
    ///
    /// Preconditions checked before any state is touched: the store is fully
    /// loaded, and the pool's slot capacity can hold one index per point.
    /// Two slots are leased for the duration of the run and released on
    /// every exit path, error paths included.
    ///
    /// After a successful run, every label is either a cluster id in
    /// `[0, groups)` or [`crate::NOISE`]; labeled points are final.
    pub fn cluster(&self, store: &mut PointStore, pool: &ContainerPool) -> Result<u32> {
        if !store.is_loaded() {
            return Err(ClusterError::NotInitialized {
                loaded: store.loaded(),
                capacity: store.capacity(),
            });
        }
        if pool.slot_capacity() < store.capacity() {
            return Err(ClusterError::SlotTooSmall {
                slot_capacity: pool.slot_capacity(),
                points: store.capacity(),
            });
        }

        let mut scratch = pool.acquire()?;
        let mut frontier = Frontier::acquire(pool, self.params.frontier)?;

        let result = self.run(store, &mut frontier, scratch.as_mut_slice());

        pool.release(frontier.into_slot())?;
        pool.release(scratch)?;

        match result {
            Ok(groups) => {
                tracing::debug!(
                    "clustering complete: {} points, {} groups",
                    store.capacity(),
                    groups
                );
                Ok(groups)
            }
            Err(e) => {
                tracing::warn!("clustering run aborted: {}", e);
                Err(e)
            }
        }
    }

    /// Single pass over all seed indices with iterative frontier expansion.
    fn run(
        &self,
        store: &mut PointStore,
        frontier: &mut Frontier,
        scratch: &mut [u32],
    ) -> Result<u32> {
        let capacity = store.capacity();
        // Resuming an un-reset store keeps the existing ids valid; after a
        // reset this starts at zero.
        let mut group = store.group_count();

        for seed in 0..capacity {
            if store.state(seed) == VisitState::Labeled {
                continue;
            }

            let nnbr = self.search_neighbors(store, seed, scratch);
            if nnbr < self.params.min_pts {
                store.set_edge(seed);
                continue;
            }

            // Seed is a core point: open a new group and absorb its
            // epsilon-neighborhood.
            store.set_labeled(seed, group);
            self.absorb(store, frontier, scratch, nnbr, group)?;

            // Drain the frontier: each popped point that proves to be a core
            // point extends the same group with its own neighborhood.
            while !frontier.is_empty() {
                let point = frontier.pop()? as usize;

                let nnbr = self.search_neighbors(store, point, scratch);
                if nnbr < self.params.min_pts {
                    // Not a core point; its label, set at absorption time,
                    // stands.
                    continue;
                }
                self.absorb(store, frontier, scratch, nnbr, group)?;
            }

            group += 1;
        }

        store.set_group_count(group);
        Ok(group)
    }

    /// Linear scan for every index within `epsilon` of `point`, written into
    /// the leased scratch slot. Returns the neighbor count.
    fn search_neighbors(&self, store: &PointStore, point: usize, scratch: &mut [u32]) -> usize {
        let origin = store.point(point);
        let epsilon = u64::from(self.params.epsilon);
        let mut nnbr = 0;

        for index in 0..store.capacity() {
            if self.params.neighbor_mode == NeighborMode::ExcludeSelf && index == point {
                continue;
            }
            if self.distance(origin, store.point(index)) > epsilon {
                continue;
            }
            scratch[nnbr] = index as u32;
            nnbr += 1;
        }

        nnbr
    }

    /// Label every unlabeled neighbor in `scratch[..nnbr]` with `group`,
    /// queueing the ones that may still have density-reachable points of
    /// their own. Points absorbed out of the EDGE state already failed the
    /// core test, so re-queueing them would be redundant work.
    fn absorb(
        &self,
        store: &mut PointStore,
        frontier: &mut Frontier,
        scratch: &[u32],
        nnbr: usize,
        group: u32,
    ) -> Result<()> {
        for &neighbor in &scratch[..nnbr] {
            let neighbor = neighbor as usize;
            if store.state(neighbor) == VisitState::Labeled {
                continue;
            }
            if store.state(neighbor) != VisitState::Edge {
                frontier.push(neighbor as u32)?;
            }
            store.set_labeled(neighbor, group);
        }
        Ok(())
    }

    /// Weighted Manhattan distance per the configured metric.
    fn distance(&self, p: Pdw, q: Pdw) -> u64 {
        match self.params.metric {
            DistanceMetric::AoaFreqPw { pw_scale } => {
                u64::from(p.aoa.abs_diff(q.aoa))
                    + u64::from(p.freq.abs_diff(q.freq))
                    + u64::from(p.pw.abs_diff(q.pw) / pw_scale)
            }
            DistanceMetric::AoaPw => {
                u64::from(p.aoa.abs_diff(q.aoa)) + u64::from(p.pw.abs_diff(q.pw))
            }
        }
    }
}
