use crate::table::Record;
use tracing::debug;

/// Population ceiling: a ZIP row stops receiving assignments once its
/// population reaches this value.
pub const POPULATION_THRESHOLD: i64 = 30_000;

/// Hands out ZIP codes from an owned working copy of the reference rows.
///
/// Each call scans the rows in order and reserves the first one whose
/// `population` is still under [`POPULATION_THRESHOLD`], bumping its count in
/// place. The scan is O(n) per call, O(n·m) across a merge; first-match order
/// is part of the contract, so it stays a plain scan.
pub struct ZipAllocator {
    rows: Vec<Record>,
}

impl ZipAllocator {
    /// Take ownership of a working copy of the reference rows. The caller
    /// keeps its original table untouched; mutations land only here.
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Reserve the next eligible ZIP and return its code.
    ///
    /// A missing or non-numeric `population` counts as 0. When every row has
    /// reached the threshold, returns `""` rather than an error; callers emit
    /// the empty assignment as-is.
    pub fn allocate(&mut self) -> String {
        for row in &mut self.rows {
            let population = row
                .get("population")
                .and_then(|p| p.trim().parse::<i64>().ok())
                .unwrap_or(0);
            if population < POPULATION_THRESHOLD {
                row.insert("population".to_string(), (population + 1).to_string());
                return row.get("zip").cloned().unwrap_or_default();
            }
        }
        debug!("all zip rows at or over threshold, assigning empty");
        String::new()
    }

    /// Consume the allocator and return the working rows, population counts
    /// reflecting every allocation made.
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}
