use serde::Deserialize;

/// One row of the WCA single-solve rankings export.
///
/// The export carries more columns (continentRank, countryRank); only the
/// fields named here are retained.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRecord {
    #[serde(rename = "personId")]
    pub person_id: String,
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub best: i64,
    #[serde(rename = "worldRank")]
    pub world_rank: u32,
}

/// One scraped row of the competition registrations table. The WCA ID is
/// absent for competitors with no prior official results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub name: String,
    pub wca_id: Option<String>,
}
