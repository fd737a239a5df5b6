// Record store module: loads and saves the medication collection as a
// JSON file. Loading is deliberately forgiving: a missing file is a fresh
// start and a corrupted file is discarded with a warning rather than
// aborting the program.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name for the persisted medication list, kept from the original
/// data files so existing records keep loading.
pub const DATA_FILE: &str = "meds_ai_data.json";

/// One tracked medication. All fields are always present in memory;
/// `doses_taken` defaults to empty when an older on-disk record predates
/// dose tracking.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MedicationRecord {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    /// Calendar date (YYYY-MM-DD) the record was created. Never mutated.
    pub added_date: String,
    /// Timestamps of recorded doses, oldest first. Append-only.
    #[serde(default)]
    pub doses_taken: Vec<String>,
}

impl MedicationRecord {
    pub fn new(name: String, dosage: String, frequency: String, added_date: String) -> Self {
        MedicationRecord {
            name,
            dosage,
            frequency,
            added_date,
            doses_taken: Vec::new(),
        }
    }

    /// Append one dose timestamp. Earlier entries are never removed or
    /// reordered, so insertion order stays chronological.
    pub fn record_dose(&mut self, timestamp: String) {
        self.doses_taken.push(timestamp);
    }
}

/// Outcome of loading the store file. `Missing` and `Corrupt` both mean
/// "start with an empty collection"; they are separate so the caller can
/// warn about corruption but stay quiet on a fresh start.
#[derive(Debug)]
pub enum StoreLoad {
    /// No file at the path. Not an error.
    Missing,
    /// The file exists but could not be read or parsed. The old data is
    /// treated as unrecoverable.
    Corrupt,
    /// Parsed records, each normalized to have a `doses_taken` list.
    Records(Vec<MedicationRecord>),
}

impl StoreLoad {
    /// Collapse into the collection the menu loop should start with.
    pub fn into_records(self) -> Vec<MedicationRecord> {
        match self {
            StoreLoad::Records(records) => records,
            StoreLoad::Missing | StoreLoad::Corrupt => Vec::new(),
        }
    }
}

/// Default location of the store file: the user's home directory, or the
/// current directory when no home is available.
pub fn data_file_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(DATA_FILE)
}

/// Load the medication collection from `path`.
///
/// Never fails: a missing file yields `Missing`, unreadable or invalid
/// JSON yields `Corrupt`, and anything else yields the parsed records.
pub fn load(path: &Path) -> StoreLoad {
    if !path.exists() {
        return StoreLoad::Missing;
    }
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return StoreLoad::Corrupt,
    };
    match serde_json::from_str::<Vec<MedicationRecord>>(&contents) {
        Ok(records) => StoreLoad::Records(records),
        Err(_) => StoreLoad::Corrupt,
    }
}

/// Save the full collection to `path`, overwriting any previous content.
/// The file is pretty-printed so it stays hand-inspectable.
pub fn save(path: &Path, records: &[MedicationRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .context("Failed to serialize medication records")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write data file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(name: &str) -> MedicationRecord {
        MedicationRecord::new(
            name.to_string(),
            "200mg".to_string(),
            "once daily".to_string(),
            "2026-08-01".to_string(),
        )
    }

    #[test]
    fn load_missing_file_is_a_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(load(&path), StoreLoad::Missing));
        assert!(load(&path).into_records().is_empty());
    }

    #[test]
    fn load_backfills_missing_doses_taken() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        // Record written before dose tracking existed: no doses_taken key.
        fs::write(
            &path,
            r#"[{"name": "Ibuprofen", "dosage": "200mg",
                 "frequency": "as needed", "added_date": "2024-01-15"}]"#,
        )
        .unwrap();

        let records = load(&path).into_records();
        assert_eq!(records.len(), 1);
        assert!(records[0].doses_taken.is_empty());
    }

    #[test]
    fn load_corrupt_file_yields_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "this is not json {{{").unwrap();
        assert!(matches!(load(&path), StoreLoad::Corrupt));
        assert!(load(&path).into_records().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meds.json");

        let mut first = sample_record("Amoxicillin");
        first.record_dose("2026-08-02 08:00:00".to_string());
        first.record_dose("2026-08-02 20:00:00".to_string());
        let original = vec![first, sample_record("Lisinopril")];

        save(&path, &original).unwrap();
        let reloaded = load(&path).into_records();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meds.json");

        save(&path, &[sample_record("Aspirin"), sample_record("Warfarin")]).unwrap();
        save(&path, &[sample_record("Aspirin")]).unwrap();

        let reloaded = load(&path).into_records();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].name, "Aspirin");
    }

    #[test]
    fn record_dose_appends_without_disturbing_history() {
        let mut record = sample_record("Metformin");
        record.record_dose("2026-08-01 09:00:00".to_string());
        record.record_dose("2026-08-01 21:00:00".to_string());
        let before = record.doses_taken.clone();

        record.record_dose("2026-08-02 09:00:00".to_string());

        assert_eq!(record.doses_taken.len(), before.len() + 1);
        assert_eq!(&record.doses_taken[..before.len()], &before[..]);
        assert_eq!(record.doses_taken.last().unwrap(), "2026-08-02 09:00:00");
    }
}
