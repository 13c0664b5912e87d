//! # Result Table
//!
//! Fixed-width text rendering of a clustering result, matching the reference
//! processor's simulation dump: one row per point with its pulse width,
//! carrier frequency, angle of arrival, and cluster id (-1 for noise).
//!
//! Formatting consumes only the read-only surface of [`PointStore`]; it is a
//! reporting concern layered on top of the core contract.

use std::fs;
use std::io;
use std::path::Path;

use crate::store::PointStore;

const RULE_WIDTH: usize = 93;

/// Render the clustering result as a fixed-width table.
///
/// ```rust
/// use pdw_cluster::{report, PointStore, RawPdw};
///
/// let mut store = PointStore::new(1).unwrap();
/// store.load(&[RawPdw { aoa: 7, fc: 9000, pw: 350 }]).unwrap();
///
/// let table = report::format_table(&store);
/// assert!(table.contains("cluster"));
/// assert!(table.contains("-1")); // unclustered point prints the sentinel
/// ```
pub fn format_table(store: &PointStore) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(
        "num                   PW                   FC                   AOA                   cluster\n",
    );
    out.push_str(&rule);
    out.push('\n');

    for i in 0..store.capacity() {
        let p = store.point(i);
        out.push_str(&format!(
            "{:<21} {:<20} {:<20} {:<21} {:<7}\n",
            i,
            p.pw,
            p.freq,
            p.aoa,
            store.label(i)
        ));
    }

    out.push_str(&rule);
    out.push_str("\n\n");
    out
}

/// Write the result table to `path`.
pub fn write_table<P: AsRef<Path>>(store: &PointStore, path: P) -> io::Result<()> {
    fs::write(path, format_table(store))
}
