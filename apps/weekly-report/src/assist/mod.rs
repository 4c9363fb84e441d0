//! AI Assist — proposes report fields from free-text notes.
//!
//! Only used to pre-fill the form (web) or the prompt defaults (CLI); the
//! generation path never depends on it. All calls go through `llm_client`.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assist::prompts::{
    IMPROVE_PROMPT, STYLE_CONCISE, STYLE_NARRATIVE, SUGGEST_PROMPT, SUGGEST_SYSTEM,
};
use crate::llm_client::prompts::{BULLET_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, Completion, CompletionBackend, LlmError};
use crate::report::normalize::normalize_inline_bullets;
use crate::report::{AiTask, ExecutionItem, FrictionItem, ReportRecord, SopItem};

/// How much prose the suggestion should contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SuggestStyle {
    #[default]
    Concise,
    Narrative,
}

impl SuggestStyle {
    fn instruction(self) -> &'static str {
        match self {
            SuggestStyle::Concise => STYLE_CONCISE,
            SuggestStyle::Narrative => STYLE_NARRATIVE,
        }
    }
}

/// Field values proposed by the model. Absent fields are left alone on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_output: Option<Vec<ExecutionItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_acceleration_tasks: Option<Vec<AiTask>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_week_focus: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_blockers_ask: Option<Vec<FrictionItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sop_items: Option<Vec<SopItem>>,
}

impl AiSuggestion {
    /// Splits inline `- bullets` in every multi-line field onto their own lines.
    pub fn normalize(&mut self) {
        for item in self.execution_output.iter_mut().flatten() {
            item.content = normalize_inline_bullets(&item.content);
        }
        for task in self.ai_acceleration_tasks.iter_mut().flatten() {
            task.insight_failure = normalize_inline_bullets(&task.insight_failure);
        }
        for sop in self.sop_items.iter_mut().flatten() {
            sop.impact = normalize_inline_bullets(&sop.impact);
        }
        for friction in self.friction_blockers_ask.iter_mut().flatten() {
            friction.action_mitigation = normalize_inline_bullets(&friction.action_mitigation);
            friction.ask_attention_needed = normalize_inline_bullets(&friction.ask_attention_needed);
        }
    }

    /// Overwrites exactly the fields present in the suggestion.
    pub fn merge_into(&self, record: &mut ReportRecord) {
        if let Some(objective) = &self.weekly_objective {
            record.weekly_objective = objective.clone();
        }
        if let Some(items) = &self.execution_output {
            record.execution_output = items.clone();
        }
        if let Some(tasks) = &self.ai_acceleration_tasks {
            record.transformation_log.ai_acceleration_tasks = tasks.clone();
        }
        if let Some(focus) = &self.next_week_focus {
            record.next_week_focus = focus.clone();
        }
        if let Some(frictions) = &self.friction_blockers_ask {
            record.friction_blockers_ask = frictions.clone();
        }
        if let Some(items) = &self.sop_items {
            record.sop_process_solidification.items = items.clone();
        }
    }

    /// Names of the fields carried by this suggestion, in schema order.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.weekly_objective.is_some() {
            fields.push("weekly_objective");
        }
        if self.execution_output.is_some() {
            fields.push("execution_output");
        }
        if self.ai_acceleration_tasks.is_some() {
            fields.push("ai_acceleration_tasks");
        }
        if self.next_week_focus.is_some() {
            fields.push("next_week_focus");
        }
        if self.friction_blockers_ask.is_some() {
            fields.push("friction_blockers_ask");
        }
        if self.sop_items.is_some() {
            fields.push("sop_items");
        }
        fields
    }
}

/// Asks the model to turn `notes` into report fields.
pub async fn suggest(
    backend: &dyn CompletionBackend,
    notes: &str,
    style: SuggestStyle,
    model: &str,
) -> Result<AiSuggestion, LlmError> {
    let system = format!(
        "{SUGGEST_SYSTEM}\n\n{}\n\n{BULLET_INSTRUCTION}\n{JSON_ONLY_INSTRUCTION}",
        style.instruction()
    );
    let prompt = SUGGEST_PROMPT.replace("{notes}", notes);

    let mut suggestion: AiSuggestion = complete_json(
        backend,
        Completion {
            system: Some(&system),
            prompt: &prompt,
            model,
        },
    )
    .await?;
    suggestion.normalize();

    info!(
        "AI suggestion produced fields: {}",
        suggestion.present_fields().join(", ")
    );
    Ok(suggestion)
}

/// Rewrites one field's text; bullets are kept and inline bullets split.
pub async fn improve(
    backend: &dyn CompletionBackend,
    text: &str,
    field: &str,
    model: &str,
) -> Result<String, LlmError> {
    let prompt = IMPROVE_PROMPT
        .replace("{field}", field)
        .replace("{text}", text);
    let improved = backend
        .complete(Completion {
            system: None,
            prompt: &prompt,
            model,
        })
        .await?;
    Ok(normalize_inline_bullets(improved.trim()))
}
