// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON (no markdown, no explanation).";

/// Bullet formatting guardrail: bullets MUST be on their own lines.
pub const BULLET_INSTRUCTION: &str = "BULLETS: Do NOT write inline bullets like 'Sentence. - Bullet'. \
    Always put bullets on a new line starting with '- '.";
