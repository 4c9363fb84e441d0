//! YAML persistence for report records.
//!
//! The input file doubles as the "last saved" record used to pre-fill the CLI
//! prompts and, when persistence is enabled, the web form. Concurrent writers
//! are not coordinated.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::report::ReportRecord;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads a record from a YAML file. An empty file yields an empty record.
pub fn load_record(path: &Path) -> Result<ReportRecord, RecordError> {
    if !path.exists() {
        return Err(RecordError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_record(&text).map_err(|source| RecordError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses YAML text. A document that is empty or `null` is an empty record.
pub fn parse_record(text: &str) -> Result<ReportRecord, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Ok(ReportRecord::default());
    }
    serde_yaml::from_value(value)
}

/// Writes the record as YAML, keeping schema key order.
pub fn save_record(path: &Path, record: &ReportRecord) -> Result<(), RecordError> {
    let io_err = |source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    };
    let yaml = serde_yaml::to_string(record).map_err(|source| RecordError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, yaml).map_err(io_err)?;
    debug!("Saved report record to {}", path.display());
    Ok(())
}

/// Loads the previously saved record for use as defaults.
/// A missing or unreadable file is not an error here: the user simply starts blank.
pub fn load_previous(path: &Path) -> ReportRecord {
    match load_record(path) {
        Ok(record) => record,
        Err(RecordError::NotFound(_)) => ReportRecord::default(),
        Err(e) => {
            warn!("Ignoring previous record: {e}");
            ReportRecord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AiTask, ExecutionItem, FrictionItem, SopItem, SopSection};

    fn sample_record() -> ReportRecord {
        let mut record = ReportRecord {
            name: "Dana Smith".to_string(),
            role: "Platform Engineer".to_string(),
            name_for_file: Some("DSmith".to_string()),
            week: "2026-10-12 → 2026-10-16".to_string(),
            weekly_objective: "Unblock the billing migration".to_string(),
            execution_output: vec![ExecutionItem {
                summary: "Billing - Cutover".to_string(),
                content: "Moved 3 services.\n- ledger\n- invoices".to_string(),
            }],
            sop_process_solidification: SopSection {
                items: vec![SopItem {
                    item: "Release checklist".to_string(),
                    impact: "- fewer rollbacks".to_string(),
                }],
            },
            friction_blockers_ask: vec![FrictionItem {
                friction: "Staging is shared".to_string(),
                action_mitigation: String::new(),
                ask_attention_needed: "A second env".to_string(),
            }],
            next_week_focus: vec!["Decommission v1".to_string(), "On-call".to_string()],
            ..Default::default()
        };
        record.transformation_log.ai_acceleration_tasks.push(AiTask {
            task: "Draft migration scripts".to_string(),
            tool_agent: "Cursor".to_string(),
            time_saved: "~1d".to_string(),
            insight_failure: "Good at boilerplate: - weak on edge cases".to_string(),
        });
        record
    }

    #[test]
    fn test_yaml_round_trip_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        let record = sample_record();

        save_record(&path, &record).unwrap();
        let loaded = load_record(&path).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_empty_record_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/report.yaml");

        save_record(&path, &ReportRecord::default()).unwrap();
        assert_eq!(load_record(&path).unwrap(), ReportRecord::default());
    }

    #[test]
    fn test_saved_yaml_keeps_schema_order() {
        let yaml = serde_yaml::to_string(&sample_record()).unwrap();
        let name_at = yaml.find("name:").unwrap();
        let focus_at = yaml.find("next_week_focus:").unwrap();
        assert!(name_at < focus_at);
        assert!(yaml.contains("ai_acceleration_tasks:"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_record(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "name: [unclosed").unwrap();
        assert!(matches!(load_record(&path), Err(RecordError::Yaml { .. })));
    }

    #[test]
    fn test_empty_file_is_empty_record() {
        assert_eq!(parse_record("").unwrap(), ReportRecord::default());
    }

    #[test]
    fn test_blank_scalar_values_are_empty() {
        let record = parse_record(
            "name: Dana\nrole: QA\nweek:\nweekly_objective:\ntransformation_log:\nsop_process_solidification:\n",
        )
        .unwrap();
        assert_eq!(record.name, "Dana");
        assert_eq!(record.role, "QA");
        assert!(record.week.is_empty());
        assert!(record.weekly_objective.is_empty());
        assert!(record.ai_tasks().is_empty());
        assert!(record.sop_process_solidification.items.is_empty());
    }

    #[test]
    fn test_load_previous_keeps_fields_next_to_blank_week() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.yaml");
        std::fs::write(&path, "name: Dana\nrole:\nweek:\nexecution_output:\n  - \n  - Shipped\n").unwrap();

        let record = load_previous(&path);
        assert_eq!(record.name, "Dana");
        assert!(record.role.is_empty());
        assert_eq!(record.execution_output[1].content, "Shipped");
    }

    #[test]
    fn test_load_previous_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "week: {unclosed").unwrap();
        assert_eq!(load_previous(&path), ReportRecord::default());
        assert_eq!(load_previous(&dir.path().join("missing.yaml")), ReportRecord::default());
    }
}
