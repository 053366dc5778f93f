//! WCA results export retrieval and parsing. The export archive is
//! downloaded once and the single-solve ranks TSV cached on disk; later
//! runs reuse the cached file.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use tracing::info;
use zip::ZipArchive;

use crate::constants::{RANKS_SINGLE_FILE, WCA_EXPORT_URL};
use crate::error::Result;
use crate::types::RankRecord;

/// Return the path of the cached ranks TSV, downloading and extracting the
/// export archive when it is not present. The zip is held in memory only.
pub async fn ensure_rankings_file(cache_dir: &Path) -> Result<PathBuf> {
    let target = cache_dir.join(RANKS_SINGLE_FILE);
    if target.exists() {
        info!("Using existing rankings file: {}", target.display());
        return Ok(target);
    }

    fs::create_dir_all(cache_dir)?;

    info!("Downloading WCA rankings export from {}", WCA_EXPORT_URL);
    let archive_bytes = reqwest::get(WCA_EXPORT_URL)
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let mut archive = ZipArchive::new(Cursor::new(archive_bytes.as_ref()))?;
    let mut entry = archive.by_name(RANKS_SINGLE_FILE)?;
    let mut out = fs::File::create(&target)?;
    io::copy(&mut entry, &mut out)?;

    info!("Extracted {} to {}", RANKS_SINGLE_FILE, target.display());
    Ok(target)
}

/// Parse the tab-separated ranks export into typed records.
pub fn load_rankings(path: &Path) -> Result<Vec<RankRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: RankRecord = result?;
        records.push(record);
    }

    info!("Loaded {} rank rows from {}", records.len(), path.display());
    Ok(records)
}

/// Index rank rows by person for the reconciliation join.
pub fn group_by_person(records: Vec<RankRecord>) -> HashMap<String, Vec<RankRecord>> {
    let mut by_person: HashMap<String, Vec<RankRecord>> = HashMap::new();
    for record in records {
        by_person
            .entry(record.person_id.clone())
            .or_default()
            .push(record);
    }
    by_person
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE_TSV: &str = "personId\teventId\tbest\tworldRank\tcontinentRank\tcountryRank\n\
        2009ZEMD01\t333\t455\t12\t3\t1\n\
        2009ZEMD01\t222\t98\t40\t11\t2\n\
        2015DOEJ01\t333\t612\t250\t88\t30\n";

    #[test]
    fn parses_tsv_and_ignores_extra_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE_TSV.as_bytes()).unwrap();

        let records = load_rankings(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].person_id, "2009ZEMD01");
        assert_eq!(records[0].event_id, "333");
        assert_eq!(records[0].best, 455);
        assert_eq!(records[0].world_rank, 12);
    }

    #[test]
    fn groups_records_by_person() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE_TSV.as_bytes()).unwrap();

        let by_person = group_by_person(load_rankings(file.path()).unwrap());
        assert_eq!(by_person.len(), 2);
        assert_eq!(by_person["2009ZEMD01"].len(), 2);
        assert_eq!(by_person["2015DOEJ01"].len(), 1);
    }
}
