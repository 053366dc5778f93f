use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::constants::{NAME_COLUMN, PERSON_ID_COLUMN, WORLD_RANK_SUFFIX};
use crate::error::Result;

/// A single report cell. Floats render with one decimal place to match the
/// report's seconds formatting; `Empty` serializes as an empty field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v:.1}"),
        }
    }
}

/// One wide report row, keyed by column name. Columns a row has no value
/// for are simply absent from the map.
pub type WideRow = BTreeMap<String, Cell>;

/// Schemaless wide table. The event column set is only known once the
/// roster has been reconciled, so columns are tracked as an ordered list
/// alongside the rows rather than as a fixed record type.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl ReportTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, unioning any columns not seen before.
    pub fn push_row(&mut self, row: WideRow) {
        for column in row.keys() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(row);
    }

    /// `Name` first, `personId` second, everything else ascending
    /// lexicographic. Deterministic regardless of discovery order.
    pub fn order_columns(&mut self) {
        let mut rest: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.as_str() != NAME_COLUMN && c.as_str() != PERSON_ID_COLUMN)
            .cloned()
            .collect();
        rest.sort();

        let mut ordered = Vec::with_capacity(self.columns.len());
        for fixed in [NAME_COLUMN, PERSON_ID_COLUMN] {
            if self.columns.iter().any(|c| c == fixed) {
                ordered.push(fixed.to_string());
            }
        }
        ordered.extend(rest);
        self.columns = ordered;
    }

    /// Stable ascending sort on `{main_event}_worldRank`. Rows without a
    /// value in that column keep their relative order after all ranked
    /// rows. If no registrant has the column at all, the table is left
    /// unsorted.
    pub fn sort_rows_by_world_rank(&mut self, main_event: &str) {
        let column = format!("{main_event}{WORLD_RANK_SUFFIX}");
        if !self.columns.iter().any(|c| c == &column) {
            return;
        }

        self.rows.sort_by(|a, b| {
            let ka = a.get(&column).and_then(Cell::as_int);
            let kb = b.get(&column).and_then(Cell::as_int);
            match (ka, kb) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    /// Write the table as CSV: header row, one record per row, no index
    /// column. Creates the parent directory if needed.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| row.get(column).map(Cell::to_string).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Cell)]) -> WideRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn float_cells_render_with_one_decimal() {
        assert_eq!(Cell::Float(45.1).to_string(), "45.1");
        assert_eq!(Cell::Float(45.0).to_string(), "45.0");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Int(10).to_string(), "10");
    }

    #[test]
    fn column_order_is_independent_of_discovery_order() {
        let mut a = ReportTable::new(vec![
            "Name".into(),
            "personId".into(),
            "333_best".into(),
            "222_best".into(),
        ]);
        let mut b = ReportTable::new(vec![
            "222_best".into(),
            "Name".into(),
            "333_best".into(),
            "personId".into(),
        ]);
        a.order_columns();
        b.order_columns();
        assert_eq!(a.columns, b.columns);
        assert_eq!(a.columns, vec!["Name", "personId", "222_best", "333_best"]);
    }

    #[test]
    fn push_row_unions_new_columns() {
        let mut table = ReportTable::new(vec!["Name".into(), "personId".into()]);
        table.push_row(row(&[
            ("Name", Cell::Text("Alice".into())),
            ("personId", Cell::Text("P1".into())),
            ("333_best", Cell::Int(4512)),
        ]));
        assert!(table.columns.iter().any(|c| c == "333_best"));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn rows_without_rank_sort_last_in_original_order() {
        let mut table = ReportTable::new(vec!["Name".into(), "333_worldRank".into()]);
        table.push_row(row(&[("Name", Cell::Text("NoRankFirst".into()))]));
        table.push_row(row(&[
            ("Name", Cell::Text("Second".into())),
            ("333_worldRank", Cell::Int(20)),
        ]));
        table.push_row(row(&[("Name", Cell::Text("NoRankSecond".into()))]));
        table.push_row(row(&[
            ("Name", Cell::Text("First".into())),
            ("333_worldRank", Cell::Int(3)),
        ]));

        table.sort_rows_by_world_rank("333");

        let names: Vec<String> = table
            .rows
            .iter()
            .map(|r| r["Name"].to_string())
            .collect();
        assert_eq!(names, vec!["First", "Second", "NoRankFirst", "NoRankSecond"]);
    }

    #[test]
    fn sorting_on_a_missing_column_leaves_rows_untouched() {
        let mut table = ReportTable::new(vec!["Name".into()]);
        table.push_row(row(&[("Name", Cell::Text("B".into()))]));
        table.push_row(row(&[("Name", Cell::Text("A".into()))]));

        table.sort_rows_by_world_rank("333");

        let names: Vec<String> = table
            .rows
            .iter()
            .map(|r| r["Name"].to_string())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
