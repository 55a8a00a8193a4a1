use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::utils::load_text_file_with_guess_encoding;

/// One record of the language code file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRecord {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "FLORES-200 code")]
    pub code: String,
}

/// Display name to FLORES-200 code map, in file order.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    entries: Vec<LanguageRecord>,
    index: HashMap<String, usize>,
}

/// `eng_Latn`, `zho_Hans`, `ace_Arab`, ...
pub fn is_flores_code(code: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z]{3}_[A-Z][a-z]{3}$").expect("valid FLORES-200 pattern"))
        .is_match(code)
}

impl LanguageTable {
    pub fn from_records(records: impl IntoIterator<Item = LanguageRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            if !is_flores_code(&record.code) {
                warn!(
                    "Skipping language {:?}: {:?} is not a FLORES-200 code",
                    record.language, record.code
                );
                continue;
            }
            // A repeated name keeps its position and takes the later code
            match table.index.get(&record.language) {
                Some(&i) => table.entries[i].code = record.code,
                None => {
                    table.index.insert(record.language.clone(), table.entries.len());
                    table.entries.push(record);
                }
            }
        }
        table
    }

    pub fn parse(content: &str) -> Result<Self> {
        let records: Vec<LanguageRecord> = serde_json::from_str(content)?;
        Ok(Self::from_records(records))
    }

    /// Load the table, degrading to an empty one if the file is missing or malformed
    pub fn load(path: &Path) -> Self {
        match load_text_file_with_guess_encoding(path).and_then(|content| Self::parse(&content)) {
            Ok(table) => {
                info!("Loaded {} languages from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                warn!("Error loading language codes from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn code(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.entries[i].code.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.language.as_str())
    }

    pub fn records(&self) -> &[LanguageRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"Language": "English", "FLORES-200 code": "eng_Latn"},
        {"Language": "French", "FLORES-200 code": "fra_Latn"},
        {"Language": "Chinese (Simplified)", "FLORES-200 code": "zho_Hans"}
    ]"#;

    #[test]
    fn lookup_by_display_name() {
        let table = LanguageTable::parse(SAMPLE).unwrap();
        assert_eq!(table.code("English"), Some("eng_Latn"));
        assert_eq!(table.code("Chinese (Simplified)"), Some("zho_Hans"));
        assert_eq!(table.code("english"), None);
        assert_eq!(table.code("Nonexistent"), None);
    }

    #[test]
    fn names_keep_file_order() {
        let table = LanguageTable::parse(SAMPLE).unwrap();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, ["English", "French", "Chinese (Simplified)"]);
    }

    #[test]
    fn duplicate_name_takes_last_code_in_first_position() {
        let table = LanguageTable::parse(
            r#"[
                {"Language": "Arabic", "FLORES-200 code": "arb_Arab"},
                {"Language": "English", "FLORES-200 code": "eng_Latn"},
                {"Language": "Arabic", "FLORES-200 code": "arb_Latn"}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().next(), Some("Arabic"));
        assert_eq!(table.code("Arabic"), Some("arb_Latn"));
    }

    #[test]
    fn invalid_codes_are_skipped() {
        let table = LanguageTable::parse(
            r#"[
                {"Language": "English", "FLORES-200 code": "eng_Latn"},
                {"Language": "Klingon", "FLORES-200 code": "tlh"},
                {"Language": "Blank", "FLORES-200 code": ""}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.code("Klingon").is_none());
        assert!(table.code("Blank").is_none());
    }

    #[test]
    fn records_missing_fields_fail_parsing() {
        assert!(LanguageTable::parse(r#"[{"Language": "English"}]"#).is_err());
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = LanguageTable::load(&dir.path().join("lang_code.json"));
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_file_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang_code.json");
        std::fs::write(&path, "{\"Language\": ").unwrap();
        assert!(LanguageTable::load(&path).is_empty());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang_code.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let table = LanguageTable::load(&path);
        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[1].code, "fra_Latn");
    }

    #[test]
    fn flores_code_shape() {
        assert!(is_flores_code("eng_Latn"));
        assert!(is_flores_code("ace_Arab"));
        assert!(!is_flores_code("en"));
        assert!(!is_flores_code("eng_latn"));
        assert!(!is_flores_code("eng-Latn"));
    }
}
