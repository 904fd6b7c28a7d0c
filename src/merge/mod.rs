use crate::alloc::ZipAllocator;
use crate::table::{Record, Table};
use tracing::info;

/// Field that joins master rows to work rows.
pub const JOIN_KEY: &str = "mdn";

/// Output schema for the updated master file.
pub const MASTER_COLUMNS: [&str; 4] = ["icc", "cus_name", "mdn", "zip"];

/// Output schema for the updated ZIP reference file.
pub const ZIP_COLUMNS: [&str; 2] = ["zip", "population"];

/// Result of one merge pass: the two output tables plus how many master rows
/// picked up work-order changes.
#[derive(Debug)]
pub struct MergeOutput {
    pub master: Table,
    pub zips: Table,
    pub modified: usize,
}

impl MergeOutput {
    /// Updated master file content, fixed `icc,cus_name,mdn,zip` order.
    pub fn master_csv(&self) -> String {
        Table::to_delimited(&MASTER_COLUMNS, &self.master.rows, self.master.delimiter)
    }

    /// Updated ZIP reference content, fixed `zip,population` order.
    pub fn zips_csv(&self) -> String {
        Table::to_delimited(&ZIP_COLUMNS, &self.zips.rows, self.zips.delimiter)
    }
}

/// Merge work orders into the master table and assign ZIPs to changed rows.
///
/// For each master row, the first work row with a matching `mdn` (if any)
/// supplies new `icc` and `cus_name` values from its `ICC-req` and
/// `cust-name` fields, falling back to the master's own values when a work
/// field is absent or blank. Every row changed this way then gets a fresh
/// ZIP from the allocator, scanned against a working copy of `zips`; the
/// caller's input tables are never mutated. Row order is preserved, unmatched
/// master rows pass through untouched, and no error can come out of the pass:
/// exhausted ZIP capacity degrades to an empty assignment.
pub fn merge(master: &Table, work: &Table, zips: &Table) -> MergeOutput {
    let mut allocator = ZipAllocator::new(zips.rows.clone());

    let mut rows: Vec<Record> = Vec::with_capacity(master.rows.len());
    let mut modified_flags: Vec<bool> = Vec::with_capacity(master.rows.len());

    for master_row in &master.rows {
        let key = master_row.get(JOIN_KEY);
        let matched = work.rows.iter().find(|work_row| work_row.get(JOIN_KEY) == key);

        let mut row = master_row.clone();
        let modified = match matched {
            Some(work_row) => {
                override_field(&mut row, "icc", work_row.get("ICC-req"));
                override_field(&mut row, "cus_name", work_row.get("cust-name"));
                true
            }
            None => false,
        };
        rows.push(row);
        modified_flags.push(modified);
    }

    let modified = modified_flags.iter().filter(|&&m| m).count();
    for (row, &was_modified) in rows.iter_mut().zip(&modified_flags) {
        if was_modified {
            row.insert("zip".to_string(), allocator.allocate());
        }
    }

    info!(
        "merged {} master rows against {} work rows, {} modified",
        rows.len(),
        work.rows.len(),
        modified
    );

    MergeOutput {
        master: Table {
            headers: MASTER_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
            delimiter: ',',
        },
        zips: Table {
            headers: ZIP_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: allocator.into_rows(),
            delimiter: ',',
        },
        modified,
    }
}

/// Overwrite `field` on the row when the work order carries a non-empty
/// replacement; otherwise the master's original value stands.
fn override_field(row: &mut Record, field: &str, replacement: Option<&String>) {
    if let Some(value) = replacement {
        if !value.is_empty() {
            row.insert(field.to_string(), value.clone());
        }
    }
}
