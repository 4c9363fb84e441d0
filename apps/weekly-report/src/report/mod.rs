// Input Model: the Report Record and everything that produces one.
// YAML files, HTML form submissions and AI suggestions all converge on `ReportRecord`.

pub mod form;
pub mod handlers;
pub mod normalize;
pub mod store;
pub mod week;

use serde::{Deserialize, Deserializer, Serialize};

/// Default SOP item text when the user has nothing to report.
pub const SOP_DEFAULT_ITEM: &str = "None";
/// Empty-state rendering shared by every field.
pub const EMPTY_VALUE: &str = "N/A";

// ────────────────────────────────────────────────────────────────────────────
// Report Record
// ────────────────────────────────────────────────────────────────────────────

/// One week's status update.
///
/// Field names are the YAML / form schema and must not change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_for_file: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub week: String,
    #[serde(deserialize_with = "null_as_default")]
    pub weekly_objective: String,
    #[serde(deserialize_with = "blank_entries_as_default")]
    pub execution_output: Vec<ExecutionItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub transformation_log: TransformationLog,
    #[serde(deserialize_with = "null_as_default")]
    pub sop_process_solidification: SopSection,
    #[serde(deserialize_with = "blank_entries_as_default")]
    pub friction_blockers_ask: Vec<FrictionItem>,
    #[serde(deserialize_with = "blank_entries_as_default")]
    pub next_week_focus: Vec<String>,
}

impl ReportRecord {
    /// Name used for the download filename: `name_for_file` when set, otherwise `name`.
    pub fn file_name_stem(&self) -> &str {
        self.name_for_file
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.name.trim())
    }

    pub fn ai_tasks(&self) -> &[AiTask] {
        &self.transformation_log.ai_acceleration_tasks
    }
}

/// A bold one-line summary followed by free text.
/// Lines of `content` starting with `-` render as bullets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawExecutionItem")]
pub struct ExecutionItem {
    pub summary: String,
    pub content: String,
}

impl ExecutionItem {
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformationLog {
    #[serde(deserialize_with = "blank_entries_as_default")]
    pub ai_acceleration_tasks: Vec<AiTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTask {
    #[serde(deserialize_with = "null_as_default")]
    pub task: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tool_agent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time_saved: String,
    #[serde(deserialize_with = "null_as_default")]
    pub insight_failure: String,
}

impl AiTask {
    pub fn is_empty(&self) -> bool {
        [
            &self.task,
            &self.tool_agent,
            &self.time_saved,
            &self.insight_failure,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSopSection")]
pub struct SopSection {
    pub items: Vec<SopItem>,
}

impl SopSection {
    /// Items to render; an empty section renders a single `None` / `N/A` entry.
    pub fn items_or_default(&self) -> Vec<SopItem> {
        if self.items.is_empty() {
            vec![SopItem::default()]
        } else {
            self.items.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SopItem {
    #[serde(deserialize_with = "null_as_default")]
    pub item: String,
    #[serde(deserialize_with = "null_as_default")]
    pub impact: String,
}

impl Default for SopItem {
    fn default() -> Self {
        Self {
            item: SOP_DEFAULT_ITEM.to_string(),
            impact: EMPTY_VALUE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFrictionItem")]
pub struct FrictionItem {
    pub friction: String,
    pub action_mitigation: String,
    pub ask_attention_needed: String,
}

impl FrictionItem {
    pub fn is_empty(&self) -> bool {
        self.friction.trim().is_empty()
            && self.action_mitigation.trim().is_empty()
            && self.ask_attention_needed.trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blank YAML values
// ────────────────────────────────────────────────────────────────────────────

/// A key left blank (`week:`) parses as null; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// List whose blank entries (`- ` alone on a line) become empty items.
fn blank_entries_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let entries = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries.into_iter().map(Option::unwrap_or_default).collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Legacy input shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExecutionItem {
    Blank(()),
    Text(String),
    Structured(ExecutionFields),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExecutionFields {
    summary: Option<String>,
    content: Option<String>,
    description: Option<String>,
    bullets: Option<LegacyBullets>,
    order: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyBullets {
    List(Vec<String>),
    Lines(String),
}

impl From<RawExecutionItem> for ExecutionItem {
    fn from(raw: RawExecutionItem) -> Self {
        match raw {
            RawExecutionItem::Blank(()) => ExecutionItem::default(),
            RawExecutionItem::Text(content) => ExecutionItem {
                summary: String::new(),
                content,
            },
            RawExecutionItem::Structured(fields) => {
                let content = match fields.content {
                    Some(content) if !content.is_empty() => content,
                    _ => legacy_content(
                        fields.description.as_deref().unwrap_or_default(),
                        fields.bullets,
                        fields.order.as_deref(),
                    ),
                };
                ExecutionItem {
                    summary: fields.summary.unwrap_or_default(),
                    content,
                }
            }
        }
    }
}

/// Folds the old `description` + `bullets` + `order` layout into a single content block.
fn legacy_content(description: &str, bullets: Option<LegacyBullets>, order: Option<&str>) -> String {
    let description = description.trim();
    let bullets: Vec<String> = match bullets {
        Some(LegacyBullets::List(items)) => items,
        Some(LegacyBullets::Lines(text)) => text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    };

    let mut parts = Vec::with_capacity(bullets.len() + 1);
    let bullet_lines = bullets.iter().map(|b| format!("- {b}"));
    if order == Some("description_first") {
        if !description.is_empty() {
            parts.push(description.to_string());
        }
        parts.extend(bullet_lines);
    } else {
        parts.extend(bullet_lines);
        if !description.is_empty() {
            parts.push(description.to_string());
        }
    }
    parts.join("\n")
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawSopSection {
    #[serde(deserialize_with = "blank_entries_as_default")]
    items: Vec<SopItem>,
    item: Option<String>,
    impact: Option<String>,
}

impl From<RawSopSection> for SopSection {
    fn from(raw: RawSopSection) -> Self {
        if !raw.items.is_empty() {
            return SopSection { items: raw.items };
        }
        if raw.item.is_none() && raw.impact.is_none() {
            return SopSection::default();
        }
        SopSection {
            items: vec![SopItem {
                item: raw.item.unwrap_or_else(|| SOP_DEFAULT_ITEM.to_string()),
                impact: raw.impact.unwrap_or_else(|| EMPTY_VALUE.to_string()),
            }],
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrictionItem {
    Blank(()),
    Text(String),
    Structured(FrictionFields),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct FrictionFields {
    #[serde(deserialize_with = "null_as_default")]
    friction: String,
    #[serde(deserialize_with = "null_as_default")]
    action_mitigation: String,
    #[serde(deserialize_with = "null_as_default")]
    ask_attention_needed: String,
}

impl From<RawFrictionItem> for FrictionItem {
    fn from(raw: RawFrictionItem) -> Self {
        match raw {
            RawFrictionItem::Blank(()) => FrictionItem::default(),
            RawFrictionItem::Text(friction) => FrictionItem {
                friction,
                ..Default::default()
            },
            RawFrictionItem::Structured(f) => FrictionItem {
                friction: f.friction,
                action_mitigation: f.action_mitigation,
                ask_attention_needed: f.ask_attention_needed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_execution_item() {
        let record: ReportRecord =
            serde_yaml::from_str("execution_output:\n  - Shipped the importer\n").unwrap();
        assert_eq!(
            record.execution_output,
            vec![ExecutionItem {
                summary: String::new(),
                content: "Shipped the importer".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_list_entries_become_empty_items() {
        let yaml = "execution_output:\n  - \n  - Shipped\nfriction_blockers_ask:\n  - \nnext_week_focus:\n  - \n  - Rollout\ntransformation_log:\n  ai_acceleration_tasks:\n    - \n";
        let record: ReportRecord = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(record.execution_output.len(), 2);
        assert!(record.execution_output[0].is_empty());
        assert_eq!(record.execution_output[1].content, "Shipped");
        assert!(record.friction_blockers_ask[0].is_empty());
        assert_eq!(record.next_week_focus, vec!["".to_string(), "Rollout".to_string()]);
        assert!(record.ai_tasks()[0].is_empty());
    }

    #[test]
    fn test_blank_fields_inside_items() {
        let yaml = "friction_blockers_ask:\n  - friction: Access\n    action_mitigation:\nsop_process_solidification:\n  items:\n    - item: Runbook\n      impact:\n";
        let record: ReportRecord = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(record.friction_blockers_ask[0].friction, "Access");
        assert!(record.friction_blockers_ask[0].action_mitigation.is_empty());
        assert_eq!(record.sop_process_solidification.items[0].item, "Runbook");
        assert!(record.sop_process_solidification.items[0].impact.is_empty());
    }

    #[test]
    fn test_legacy_execution_bullets_first() {
        let yaml = "execution_output:\n  - summary: Importer\n    description: Done\n    bullets: [parse, load]\n";
        let record: ReportRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.execution_output[0].summary, "Importer");
        assert_eq!(record.execution_output[0].content, "- parse\n- load\nDone");
    }

    #[test]
    fn test_legacy_execution_description_first_with_string_bullets() {
        let yaml = "execution_output:\n  - description: Intro\n    bullets: \"a\\n\\n b \"\n    order: description_first\n";
        let record: ReportRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.execution_output[0].content, "Intro\n- a\n- b");
    }

    #[test]
    fn test_legacy_single_sop_item() {
        let yaml = "sop_process_solidification:\n  item: Release checklist\n";
        let record: ReportRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            record.sop_process_solidification.items,
            vec![SopItem {
                item: "Release checklist".to_string(),
                impact: "N/A".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_sop_renders_default_item() {
        let section = SopSection::default();
        assert_eq!(section.items_or_default(), vec![SopItem::default()]);
    }

    #[test]
    fn test_plain_string_friction_item() {
        let record: ReportRecord =
            serde_yaml::from_str("friction_blockers_ask:\n  - Waiting on access\n").unwrap();
        assert_eq!(record.friction_blockers_ask[0].friction, "Waiting on access");
        assert!(record.friction_blockers_ask[0].action_mitigation.is_empty());
    }

    #[test]
    fn test_missing_keys_default() {
        let record: ReportRecord = serde_yaml::from_str("name: Dana\n").unwrap();
        assert_eq!(record.name, "Dana");
        assert!(record.execution_output.is_empty());
        assert!(record.sop_process_solidification.items.is_empty());
    }

    #[test]
    fn test_file_name_stem_prefers_name_for_file() {
        let mut record = ReportRecord {
            name: "Dana Smith".to_string(),
            ..Default::default()
        };
        assert_eq!(record.file_name_stem(), "Dana Smith");
        record.name_for_file = Some("  ".to_string());
        assert_eq!(record.file_name_stem(), "Dana Smith");
        record.name_for_file = Some("DSmith".to_string());
        assert_eq!(record.file_name_stem(), "DSmith");
    }
}
