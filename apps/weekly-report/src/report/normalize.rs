//! Inline bullet normalization.
//!
//! The renderer only treats lines starting with `-` as bullets, so text like
//! `Done. - Next item` has to be split onto its own line before rendering.

use std::sync::OnceLock;

use regex::Regex;

use crate::report::ReportRecord;

fn inline_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([.!?:])\s+-\s+").expect("inline bullet pattern is valid"))
}

/// Converts `Sentence. - Bullet` into `Sentence.\n- Bullet`. CRLF becomes LF.
pub fn normalize_inline_bullets(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace("\r\n", "\n");
    inline_bullet_re().replace_all(&text, "$1\n- ").into_owned()
}

/// Applies [`normalize_inline_bullets`] to every multi-line field of the record.
pub fn normalize_record(record: &mut ReportRecord) {
    for item in &mut record.execution_output {
        item.content = normalize_inline_bullets(&item.content);
    }
    for task in &mut record.transformation_log.ai_acceleration_tasks {
        task.insight_failure = normalize_inline_bullets(&task.insight_failure);
    }
    for sop in &mut record.sop_process_solidification.items {
        sop.impact = normalize_inline_bullets(&sop.impact);
    }
    for friction in &mut record.friction_blockers_ask {
        friction.action_mitigation = normalize_inline_bullets(&friction.action_mitigation);
        friction.ask_attention_needed = normalize_inline_bullets(&friction.ask_attention_needed);
    }
}
