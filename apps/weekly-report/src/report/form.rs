//! HTML form → `ReportRecord`.
//!
//! The form posts repeated `key[]` fields for list sections and
//! `ai_task_{i}_{field}` keys for AI tasks, so it is decoded as ordered pairs
//! rather than into a struct.

use std::collections::BTreeSet;

use crate::report::{
    AiTask, ExecutionItem, FrictionItem, ReportRecord, SopItem, SopSection, TransformationLog,
    EMPTY_VALUE, SOP_DEFAULT_ITEM,
};

/// Ordered `(key, value)` pairs from an urlencoded body.
#[derive(Debug, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `key`, trimmed; empty when absent.
    pub fn get(&self, key: &str) -> String {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    /// All values for `key` in submission order, trimmed.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }
}

/// Builds a record from a form submission. Rows where every column is blank are dropped.
pub fn record_from_form(form: &FormFields) -> ReportRecord {
    let name_for_file = Some(form.get("name_for_file")).filter(|s| !s.is_empty());

    ReportRecord {
        name: form.get("name"),
        role: form.get("role"),
        name_for_file,
        week: form.get("week"),
        weekly_objective: form.get("weekly_objective"),
        execution_output: parse_execution(form),
        transformation_log: TransformationLog {
            ai_acceleration_tasks: parse_ai_tasks(form),
        },
        sop_process_solidification: SopSection {
            items: parse_sop(form),
        },
        friction_blockers_ask: parse_friction(form),
        next_week_focus: form
            .get_all("next_week_focus[]")
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

fn column(values: &[String], i: usize) -> String {
    values.get(i).cloned().unwrap_or_default()
}

fn parse_execution(form: &FormFields) -> Vec<ExecutionItem> {
    let summaries = form.get_all("execution_summary[]");
    let contents = form.get_all("execution_content[]");
    let rows = summaries.len().max(contents.len());

    (0..rows)
        .map(|i| ExecutionItem {
            summary: column(&summaries, i),
            content: column(&contents, i),
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_ai_tasks(form: &FormFields) -> Vec<AiTask> {
    let indices: BTreeSet<usize> = form
        .keys()
        .filter_map(|k| k.strip_prefix("ai_task_")?.strip_suffix("_task")?.parse().ok())
        .collect();

    indices
        .into_iter()
        .map(|i| AiTask {
            task: form.get(&format!("ai_task_{i}_task")),
            tool_agent: form.get(&format!("ai_task_{i}_tool_agent")),
            time_saved: form.get(&format!("ai_task_{i}_time_saved")),
            insight_failure: form.get(&format!("ai_task_{i}_insight_failure")),
        })
        .filter(|task| !task.is_empty())
        .collect()
}

/// SOP rows always exist: blank item → `None`, blank impact → `N/A`.
fn parse_sop(form: &FormFields) -> Vec<SopItem> {
    let items = form.get_all("sop_item[]");
    let impacts = form.get_all("sop_impact[]");
    let rows = items.len().max(impacts.len()).max(1);

    (0..rows)
        .map(|i| {
            let item = column(&items, i);
            let impact = column(&impacts, i);
            SopItem {
                item: if item.is_empty() { SOP_DEFAULT_ITEM.to_string() } else { item },
                impact: if impact.is_empty() { EMPTY_VALUE.to_string() } else { impact },
            }
        })
        .collect()
}

fn parse_friction(form: &FormFields) -> Vec<FrictionItem> {
    let frictions = form.get_all("friction_friction[]");
    let actions = form.get_all("friction_action_mitigation[]");
    let asks = form.get_all("friction_ask_attention[]");
    let rows = frictions.len().max(actions.len()).max(asks.len());

    (0..rows)
        .map(|i| FrictionItem {
            friction: column(&frictions, i),
            action_mitigation: column(&actions, i),
            ask_attention_needed: column(&asks, i),
        })
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_scalar_fields_are_trimmed() {
        let record = record_from_form(&form(&[
            ("name", "  Dana "),
            ("role", "Engineer"),
            ("week", "W42"),
            ("name_for_file", ""),
        ]));
        assert_eq!(record.name, "Dana");
        assert_eq!(record.role, "Engineer");
        assert_eq!(record.week, "W42");
        assert_eq!(record.name_for_file, None);
    }

    #[test]
    fn test_execution_rows_pair_by_position() {
        let record = record_from_form(&form(&[
            ("execution_summary[]", "Importer"),
            ("execution_content[]", "- parse"),
            ("execution_summary[]", ""),
            ("execution_content[]", ""),
            ("execution_summary[]", "Docs"),
        ]));
        assert_eq!(record.execution_output.len(), 2);
        assert_eq!(record.execution_output[0].content, "- parse");
        assert_eq!(record.execution_output[1].summary, "Docs");
        assert_eq!(record.execution_output[1].content, "");
    }

    #[test]
    fn test_ai_tasks_sorted_by_index_and_blank_dropped() {
        let record = record_from_form(&form(&[
            ("ai_task_2_task", "Second"),
            ("ai_task_2_tool_agent", "Cursor"),
            ("ai_task_0_task", "First"),
            ("ai_task_1_task", ""),
            ("ai_task_x_task", "ignored"),
        ]));
        let tasks = record.ai_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task, "First");
        assert_eq!(tasks[1].task, "Second");
        assert_eq!(tasks[1].tool_agent, "Cursor");
    }

    #[test]
    fn test_sop_defaults_when_blank() {
        let record = record_from_form(&form(&[]));
        assert_eq!(record.sop_process_solidification.items, vec![SopItem::default()]);

        let record = record_from_form(&form(&[("sop_item[]", "Runbook"), ("sop_impact[]", "")]));
        assert_eq!(record.sop_process_solidification.items[0].item, "Runbook");
        assert_eq!(record.sop_process_solidification.items[0].impact, "N/A");
    }

    #[test]
    fn test_friction_and_focus_skip_empty_rows() {
        let record = record_from_form(&form(&[
            ("friction_friction[]", ""),
            ("friction_action_mitigation[]", ""),
            ("friction_ask_attention[]", ""),
            ("friction_friction[]", "No staging"),
            ("next_week_focus[]", " Launch "),
            ("next_week_focus[]", "  "),
        ]));
        assert_eq!(record.friction_blockers_ask.len(), 1);
        assert_eq!(record.friction_blockers_ask[0].friction, "No staging");
        assert_eq!(record.next_week_focus, vec!["Launch".to_string()]);
    }
}
