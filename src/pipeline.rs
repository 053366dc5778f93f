//! The reconciliation and reshaping pass: join registrants to their rank
//! rows, pivot per-event metrics into wide rows, then normalize the table
//! for output. Every step is a pure function over in-memory tables.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::constants::{
    BEST_DIVISOR, BEST_SUFFIX, NAME_COLUMN, PERSON_ID_COLUMN, SUMMARY_COLUMN,
    TOP_RANK_THRESHOLD, WORLD_RANK_SUFFIX,
};
use crate::error::{Result, ScraperError};
use crate::table::{Cell, ReportTable, WideRow};
use crate::types::{RankRecord, Registrant};

/// Counts reported after a pipeline run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub registrants: usize,
    pub matched: usize,
    pub skipped_unregistered: usize,
    pub skipped_no_history: usize,
}

/// Pivot one competitor's rank rows (one per event) into a single wide row.
///
/// Well-formed export data has at most one row per (person, event); a
/// duplicate fails with a data-integrity error rather than picking a row.
fn pivot_registrant(name: &str, wca_id: &str, records: &[RankRecord]) -> Result<WideRow> {
    let mut row = WideRow::new();
    row.insert(NAME_COLUMN.to_string(), Cell::Text(name.to_string()));
    row.insert(PERSON_ID_COLUMN.to_string(), Cell::Text(wca_id.to_string()));

    for record in records {
        let best_column = format!("{}{}", record.event_id, BEST_SUFFIX);
        if row.contains_key(&best_column) {
            return Err(ScraperError::DuplicateEventRank {
                person_id: wca_id.to_string(),
                event_id: record.event_id.clone(),
            });
        }
        row.insert(best_column, Cell::Int(record.best));
        row.insert(
            format!("{}{}", record.event_id, WORLD_RANK_SUFFIX),
            Cell::Int(i64::from(record.world_rank)),
        );
    }
    Ok(row)
}

/// Join the roster against the rankings index and aggregate the pivoted
/// rows. Registrants without a WCA ID and registrants with no ranking
/// history are expected states, not errors; both are skipped.
fn reconcile(
    registrants: &[Registrant],
    rankings: &HashMap<String, Vec<RankRecord>>,
) -> Result<(ReportTable, PipelineStats)> {
    let mut table =
        ReportTable::new(vec![NAME_COLUMN.to_string(), PERSON_ID_COLUMN.to_string()]);
    let mut stats = PipelineStats::default();

    for registrant in registrants {
        stats.registrants += 1;

        let Some(wca_id) = registrant.wca_id.as_deref().filter(|id| !id.is_empty()) else {
            debug!("Skipping {} (no WCA ID)", registrant.name);
            stats.skipped_unregistered += 1;
            continue;
        };
        let Some(records) = rankings.get(wca_id) else {
            debug!("Skipping {} ({}): no ranking history", registrant.name, wca_id);
            stats.skipped_no_history += 1;
            continue;
        };

        table.push_row(pivot_registrant(&registrant.name, wca_id, records)?);
        stats.matched += 1;
    }

    Ok((table, stats))
}

/// Rescale every `*_best` cell from centiseconds to seconds, rounded to
/// one decimal place. Rank and identity columns are untouched, and missing
/// cells stay missing.
fn format_best_columns(table: &mut ReportTable) {
    let best_columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| c.ends_with(BEST_SUFFIX))
        .cloned()
        .collect();

    for row in &mut table.rows {
        for column in &best_columns {
            if let Some(&Cell::Int(v)) = row.get(column) {
                let seconds = (v as f64 / BEST_DIVISOR * 10.0).round() / 10.0;
                row.insert(column.clone(), Cell::Float(seconds));
            }
        }
    }
}

/// Build the `WR Top 100` digest from the rank columns, in final column
/// order, and insert it as the third column. Runs only after
/// `order_columns`, which fixes the iteration order the tokens follow.
fn derive_summary(table: &mut ReportTable) {
    if table.is_empty() {
        return;
    }

    let rank_columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| c.ends_with(WORLD_RANK_SUFFIX))
        .cloned()
        .collect();

    for row in &mut table.rows {
        let tokens: Vec<String> = rank_columns
            .iter()
            .filter_map(|column| {
                let rank = row.get(column).and_then(Cell::as_int)?;
                if rank > i64::from(TOP_RANK_THRESHOLD) {
                    return None;
                }
                let event = column.strip_suffix(WORLD_RANK_SUFFIX).unwrap_or(column);
                Some(format!("{event} (#{rank})"))
            })
            .collect();
        // Rows with no top-ranked event get an empty string, not a hole
        row.insert(SUMMARY_COLUMN.to_string(), Cell::Text(tokens.join(", ")));
    }

    let position = table.columns.len().min(2);
    table.columns.insert(position, SUMMARY_COLUMN.to_string());
}

/// Run the full reshape pass and return the finished report table.
pub fn build_report(
    registrants: &[Registrant],
    rankings: &HashMap<String, Vec<RankRecord>>,
    main_event: &str,
) -> Result<(ReportTable, PipelineStats)> {
    let (mut table, stats) = reconcile(registrants, rankings)?;
    info!(
        "Reconciled {} of {} registrants",
        stats.matched, stats.registrants
    );

    format_best_columns(&mut table);
    table.order_columns();
    table.sort_rows_by_world_rank(main_event);
    derive_summary(&mut table);

    Ok((table, stats))
}
