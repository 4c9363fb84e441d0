// AI Assist prompt templates.
// All prompts for the assist module are defined here.

pub const SUGGEST_SYSTEM: &str = r#"You help fill a weekly report from rough notes or Jira-style updates.
Return ONLY valid JSON (no markdown, no explanation) with this exact structure:
{
  "weekly_objective": "one sentence summary of what was done or achieved THIS WEEK (past/current only)",
  "execution_output": [{"summary": "bold one-liner", "content": "text and bullets. Use a line starting with - for each bullet."}],
  "ai_acceleration_tasks": [{"task": "what you used AI for", "tool_agent": "OpenCode / Cursor / ...", "time_saved": "~0.5-2d or 1-4h", "insight_failure": "insight text. Use lines starting with - for bullets."}],
  "next_week_focus": ["focus 1", "focus 2"],
  "friction_blockers_ask": [{"friction": "what blocked", "action_mitigation": "what you did", "ask_attention_needed": "what you need"}],
  "sop_items": [{"item": "SOP item name", "impact": "impact text. Use - for bullets."}]
}

CRITICAL:
- weekly_objective = ONLY past/current week work. If the notes only mention future plans or "next week", leave weekly_objective as "". Do NOT put next week's plans in weekly_objective.
- next_week_focus = future plans (what will be done next week).

FORMATTING + QUALITY BAR:
- execution_output should be 2-5 items when the notes cover multiple themes or workstreams. Do NOT collapse everything into 1 generic item unless the notes describe only one small change.
- execution_output[].summary should be a specific, report-ready header, NOT a vague statement like "Work completed".
- execution_output[].content can mix paragraphs and bullets. Use plain lines for paragraphs and "- " for bullets. Preserve concrete nouns and scope from the notes.
- Keep weekly_objective outcome-oriented (what was enabled or unblocked), not just a ticket title.
- ai_acceleration_tasks: include only if notes mention using AI/tools. If time_saved is unknown, estimate conservatively or use "".

TIME CLASSIFICATION:
- Do NOT put items into next_week_focus unless the notes explicitly indicate future tense ("next week", "upcoming", "plan", "will", "to do").
- If timing is ambiguous, assume it belongs to THIS WEEK and place it into execution_output.
- If the notes only mention AI usage, do not invent next-week focus.

Keep execution_output, ai_acceleration_tasks, next_week_focus, friction_blockers_ask, sop_items as arrays; use [] if nothing from the notes applies."#;

pub const STYLE_CONCISE: &str = "STYLE: Concise. Prefer short bullets over sentences; \
    one line per summary; no more than 4 bullets per item.";

pub const STYLE_NARRATIVE: &str = "STYLE: Full narrative. Write each execution_output content as \
    1-2 short paragraphs of context followed by bullets for the concrete details.";

pub const SUGGEST_PROMPT: &str = "Extract and fill the report structure from these notes:\n\n{notes}";

pub const IMPROVE_PROMPT: &str = "Rewrite the following {field} text for a weekly report: clearer, \
    professional, concise. Keep bullets (lines starting with -) as-is. \
    Return only the rewritten text, no explanation.\n\n{text}";
