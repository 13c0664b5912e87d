//! # PDW Emitter Clustering
//!
//! This crate groups radar pulse descriptor words (PDWs) into emitter
//! clusters with density-based clustering (DBSCAN), sized for a
//! resource-constrained single-core signal processor:
//!
//! - **Fixed capacities everywhere**: all storage is allocated up front, and
//!   exceeding a bound is a reported error, never a reallocation
//! - **Pooled auxiliary containers**: the expansion worklist and neighbor
//!   scratch list lease whole buffers from a bitmap-tracked
//!   [`ContainerPool`]
//! - **Iterative expansion**: density reachability is traversed with a
//!   bounded stack/deque [`Frontier`], no recursion
//!
//! ## Processing Flow
//!
//! ```text
//! ingestion → PointStore::load → ClusteringEngine::cluster → report table
//!                                   │
//!                                   └── leases two ContainerPool slots
//!                                       (frontier + neighbor scratch)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pdw_cluster::{
//!     ClusterParams, ClusteringEngine, ContainerPool, DistanceMetric, PointStore,
//!     PoolConfig, RawPdw, NOISE,
//! };
//!
//! // Pool sizing: slot capacity must cover the point count.
//! let pool = ContainerPool::new(PoolConfig { slots: 8, slot_capacity: 64 }).unwrap();
//!
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

pub mod engine;
pub mod error;
pub mod frontier;
pub mod pool;
pub mod report;
pub mod store;

pub use engine::{
    ClusterParams, ClusteringEngine, DistanceMetric, NeighborMode, DEFAULT_PW_SCALE,
};
pub use error::{ClusterError, Result};
pub use frontier::{Frontier, FrontierKind};
pub use pool::{ContainerPool, PoolConfig, SlotHandle};
pub use store::{Pdw, PointStore, RawPdw, VisitState, NOISE};
