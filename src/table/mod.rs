use std::collections::HashMap;
use tracing::warn;

/// A single row, keyed by column name. Values are always strings; numeric
/// interpretation happens at the point of use.
pub type Record = HashMap<String, String>;

/// An in-memory delimited table: header order, rows, and the delimiter the
/// source document used.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column names from the first line, in source order.
    pub headers: Vec<String>,
    /// One record per data line. Every record carries every header; fields
    /// missing in the source line are filled with `""`.
    pub rows: Vec<Record>,
    /// Detected field delimiter, `\t` or `,`.
    pub delimiter: char,
}

impl Table {
    /// Parse raw delimited text into a `Table`.
    ///
    /// The delimiter is detected once for the whole document: tab if the text
    /// contains any tab character, comma otherwise. The first line is the
    /// header; every field (header and value) is trimmed of surrounding
    /// whitespace. Lines shorter than the header are padded with `""`.
    ///
    /// There is no quoting or escaping: a field containing the delimiter will
    /// shift the columns to its right. Empty input yields a table with a
    /// single empty header and no rows.
    pub fn parse(text: &str) -> Table {
        let delimiter = if text.contains('\t') { '\t' } else { ',' };

        let mut lines = text.trim().split('\n');
        let headers: Vec<String> = lines
            .next()
            .unwrap_or("")
            .split(delimiter)
            .map(|h| h.trim().to_string())
            .collect();

        let rows = lines
            .enumerate()
            .map(|(i, line)| {
                let values: Vec<&str> = line.split(delimiter).collect();
                if values.len() < headers.len() {
                    warn!(
                        "line {}: {} fields for {} headers, padding with empty",
                        i + 2,
                        values.len(),
                        headers.len()
                    );
                }
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        let value = values.get(idx).map(|v| v.trim()).unwrap_or("");
                        (header.clone(), value.to_string())
                    })
                    .collect::<Record>()
            })
            .collect();

        Table {
            headers,
            rows,
            delimiter,
        }
    }

    /// Serialize rows back to delimited text: one header line, then one line
    /// per record with fields emitted in `columns` order.
    ///
    /// `columns` may be any subset or reordering of the records' fields; only
    /// the listed columns are emitted, and a field a record lacks comes out
    /// as `""`.
    pub fn to_delimited<S: AsRef<str>>(columns: &[S], rows: &[Record], delimiter: char) -> String {
        let sep = delimiter.to_string();
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(
            columns
                .iter()
                .map(|c| c.as_ref())
                .collect::<Vec<_>>()
                .join(&sep),
        );
        for row in rows {
            let fields: Vec<&str> = columns
                .iter()
                .map(|c| row.get(c.as_ref()).map(String::as_str).unwrap_or(""))
                .collect();
            lines.push(fields.join(&sep));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn row<'a>(table: &'a Table, idx: usize, col: &str) -> &'a str {
        table.rows[idx].get(col).map(String::as_str).unwrap_or("")
    }

    #[test]
    fn parses_comma_document() -> Result<()> {
        let table = Table::parse("mdn,icc,cus_name\n1,a,Alice\n2,b,Bob\n");
        assert_eq!(table.delimiter, ',');
        assert_eq!(table.headers, vec!["mdn", "icc", "cus_name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(row(&table, 0, "cus_name"), "Alice");
        assert_eq!(row(&table, 1, "mdn"), "2");
        Ok(())
    }

    #[test]
    fn detects_tab_delimiter_document_wide() -> Result<()> {
        // A single tab anywhere flips the whole document to tab-delimited.
        let table = Table::parse("mdn\ticc\n1,still-one-field\tx\n");
        assert_eq!(table.delimiter, '\t');
        assert_eq!(table.headers, vec!["mdn", "icc"]);
        assert_eq!(row(&table, 0, "mdn"), "1,still-one-field");
        assert_eq!(row(&table, 0, "icc"), "x");
        Ok(())
    }

    #[test]
    fn trims_headers_and_values() -> Result<()> {
        let table = Table::parse(" mdn , icc \n 1 ,  a  \n");
        assert_eq!(table.headers, vec!["mdn", "icc"]);
        assert_eq!(row(&table, 0, "mdn"), "1");
        assert_eq!(row(&table, 0, "icc"), "a");
        Ok(())
    }

    #[test]
    fn pads_short_rows_with_empty() -> Result<()> {
        let table = Table::parse("mdn,icc,zip\n1\n2,b\n");
        assert_eq!(row(&table, 0, "icc"), "");
        assert_eq!(row(&table, 0, "zip"), "");
        assert_eq!(row(&table, 1, "icc"), "b");
        assert_eq!(row(&table, 1, "zip"), "");
        Ok(())
    }

    #[test]
    fn ignores_trailing_blank_lines() -> Result<()> {
        let table = Table::parse("mdn,icc\n1,a\n\n\n");
        assert_eq!(table.rows.len(), 1);
        Ok(())
    }

    #[test]
    fn empty_input_yields_empty_header_no_rows() -> Result<()> {
        let table = Table::parse("");
        assert_eq!(table.headers, vec![""]);
        assert!(table.rows.is_empty());
        Ok(())
    }

    #[test]
    fn serializes_subset_and_reordered_columns() -> Result<()> {
        let table = Table::parse("mdn,icc,zip\n1,a,90001\n");
        let out = Table::to_delimited(&["zip", "mdn"], &table.rows, ',');
        assert_eq!(out, "zip,mdn\n90001,1");
        Ok(())
    }

    #[test]
    fn missing_fields_serialize_as_empty() -> Result<()> {
        let table = Table::parse("mdn\n1\n");
        let out = Table::to_delimited(&["mdn", "zip"], &table.rows, ',');
        assert_eq!(out, "mdn,zip\n1,");
        Ok(())
    }

    #[test]
    fn round_trips_when_fields_are_delimiter_free() -> Result<()> {
        let text = "mdn,icc,cus_name\n1,a,Alice\n2,b,Bob";
        let table = Table::parse(text);
        let out = Table::to_delimited(&table.headers, &table.rows, table.delimiter);
        assert_eq!(out, text);
        Ok(())
    }
}
