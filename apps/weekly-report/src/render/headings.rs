// Template placeholders. Headings are matched against trimmed paragraph text.

pub const NAME: &str = "Name: ";
pub const ROLE: &str = "Role: ";
pub const WEEK: &str = "Week: ";

pub const OBJECTIVE: &str = "Weekly Objective (One Sentence)";
pub const EXECUTION: &str = "Execution & Output";
pub const TRANSFORMATION_LOG: &str = "The “2X” Transformation Log";
pub const AI_ACCELERATION: &str = "AI Acceleration";
pub const SOP: &str = "SOP & Process Solidification";
pub const FRICTION: &str = "Friction, Blockers & Ask";
pub const NEXT_WEEK: &str = "Next Week’s Focus (Preview Only)";

#[cfg(test)]
pub const ALL_SECTIONS: [&str; 7] = [
    OBJECTIVE,
    EXECUTION,
    TRANSFORMATION_LOG,
    AI_ACCELERATION,
    SOP,
    FRICTION,
    NEXT_WEEK,
];
