/// Fixed identifiers for the WCA export and the report layout.
/// Data source: https://www.worldcubeassociation.org/export/results

pub const WCA_EXPORT_URL: &str =
    "https://www.worldcubeassociation.org/export/results/WCA_export.tsv";
pub const RANKS_SINGLE_FILE: &str = "WCA_export_RanksSingle.tsv";

// Report column names
pub const NAME_COLUMN: &str = "Name";
pub const PERSON_ID_COLUMN: &str = "personId";
pub const SUMMARY_COLUMN: &str = "WR Top 100";
pub const BEST_SUFFIX: &str = "_best";
pub const WORLD_RANK_SUFFIX: &str = "_worldRank";

/// World-rank cutoff for inclusion in the summary column.
pub const TOP_RANK_THRESHOLD: u32 = 100;

/// The export encodes solve times in centiseconds; divide to get seconds.
pub const BEST_DIVISOR: f64 = 100.0;

pub const DEFAULT_COMPETITION_ID: &str = "TippingPointBloomsburg2025";
pub const DEFAULT_MAIN_EVENT: &str = "333";

/// Registrations page for one competition.
pub fn registrations_url(competition_id: &str) -> String {
    format!("https://www.worldcubeassociation.org/competitions/{competition_id}/registrations")
}
