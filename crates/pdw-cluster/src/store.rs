//! # Point Store
//!
//! Fixed-capacity storage for one clustering run: the ingested pulse
//! descriptor words plus the two parallel per-point state arrays the engine
//! mutates (cluster label and visit state).
//!
//! The store is filled once by the ingestion side via [`PointStore::load`],
//! clustered in place, and read back by the reporting side through the
//! read-only accessors. [`PointStore::reset`] must run between independent
//! clustering runs over the same storage; loaded points survive a reset.

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Sentinel label for a point that belongs to no cluster.
pub const NOISE: i32 = -1;

/// A pulse descriptor word: the measured attributes of one radar pulse used
/// as the clustering feature vector.
///
/// Each field is a 32-bit fixed-point word in the source capture format:
/// bits 20..31 carry the integer part, bits 0..19 the fraction. The core
/// treats the words as opaque unsigned magnitudes; scaling is the ingestion
/// side's concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pdw {
    /// Angle of arrival.
    pub aoa: u32,
    /// Carrier frequency.
    pub freq: u32,
    /// Pulse width.
    pub pw: u32,
}

/// Raw pulse record layout as delivered by the ingestion collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPdw {
    /// Angle of arrival.
    pub aoa: u32,
    /// Carrier frequency.
    pub fc: u32,
    /// Pulse width.
    pub pw: u32,
}

/// Per-point visit state during and after a clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    /// Initial state; the point has not been examined.
    Unlabeled,
    /// The point carries a final cluster id; both fields are frozen.
    Labeled,
    /// The point failed the core-point test when examined as a seed. It may
    /// still be absorbed by a neighboring core point's expansion; if not, it
    /// keeps the [`NOISE`] label.
    Edge,
}

/// Fixed-capacity array of points plus parallel label/state arrays.
pub struct PointStore {
    points: Vec<Pdw>,
    labels: Vec<i32>,
    states: Vec<VisitState>,
    loaded: usize,
    group_count: u32,
}

impl PointStore {
    /// Allocate a store for exactly `capacity` points.
    ///
    /// All storage is reserved here; nothing allocates during a run. Fails
    /// with [`ClusterError::AllocationFailure`] if the reservation fails.
    pub fn new(capacity: usize) -> Result<Self> {
        fn reserved<T: Clone>(capacity: usize, fill: T) -> Result<Vec<T>> {
            let mut v = Vec::new();
            v.try_reserve_exact(capacity)
                .map_err(|_| ClusterError::AllocationFailure {
                    bytes: capacity * std::mem::size_of::<T>(),
                })?;
            v.resize(capacity, fill);
            Ok(v)
        }

        Ok(Self {
            points: reserved(capacity, Pdw::default())?,
            labels: reserved(capacity, NOISE)?,
            states: reserved(capacity, VisitState::Unlabeled)?,
            loaded: 0,
            group_count: 0,
        })
    }

    /// Point capacity of this store.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Whether every point slot has been filled by [`load`](Self::load).
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded == self.capacity()
    }

    /// Ingest one raw record per point slot.
    ///
    /// Requires exactly `capacity` records; labels and states are reset so
    /// the store is ready for a fresh run. Returns the number of points
    /// loaded.
    pub fn load(&mut self, records: &[RawPdw]) -> Result<usize> {
        if records.len() != self.capacity() {
            return Err(ClusterError::InvalidParams(format!(
                "expected {} records, got {}",
                self.capacity(),
                records.len()
            )));
        }

        for (point, record) in self.points.iter_mut().zip(records) {
            *point = Pdw {
                aoa: record.aoa,
                freq: record.fc,
                pw: record.pw,
            };
        }
        self.loaded = records.len();
        self.reset();
        Ok(self.loaded)
    }

    /// Restore every label to [`NOISE`] and every state to
    /// [`VisitState::Unlabeled`]. Required before each independent run over
    /// the same points.
    pub fn reset(&mut self) {
        self.labels.fill(NOISE);
        self.states.fill(VisitState::Unlabeled);
        self.group_count = 0;
    }

    /// The point at `index`.
    #[inline]
    pub fn point(&self, index: usize) -> Pdw {
        self.points[index]
    }

    /// The label at `index`: a cluster id or [`NOISE`].
    #[inline]
    pub fn label(&self, index: usize) -> i32 {
        self.labels[index]
    }

    /// The full label array, one entry per point index.
    #[inline]
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// The cluster id at `index`, or `None` for noise.
    pub fn cluster_of(&self, index: usize) -> Option<u32> {
        match self.labels[index] {
            NOISE => None,
            id => Some(id as u32),
        }
    }

    /// The visit state at `index`.
    #[inline]
    pub fn state(&self, index: usize) -> VisitState {
        self.states[index]
    }

    /// Number of clusters produced by the last run.
    #[inline]
    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    /// Finalize `index` into cluster `group`. Once labeled, a point's label
    /// and state are frozen for the remainder of the run.
    pub(crate) fn set_labeled(&mut self, index: usize, group: u32) {
        debug_assert!(
            self.states[index] != VisitState::Labeled,
            "labeled point must never be relabeled"
        );
        self.labels[index] = group as i32;
        self.states[index] = VisitState::Labeled;
    }

    /// Mark `index` as having failed the core-point test.
    pub(crate) fn set_edge(&mut self, index: usize) {
        debug_assert!(self.states[index] != VisitState::Labeled);
        self.states[index] = VisitState::Edge;
    }

    pub(crate) fn set_group_count(&mut self, groups: u32) {
        self.group_count = groups;
    }

    pub(crate) fn loaded(&self) -> usize {
        self.loaded
    }
}
