//! Interactive `fill` command: walks through every report field on the console,
//! saves the answers as YAML and renders the document.
//!
//! Prompts are written against `BufRead`/`Write` so the whole dialogue can be
//! driven from a byte buffer in tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::assist::{suggest, SuggestStyle};
use crate::config::Config;
use crate::llm_client::{LlmClient, DEFAULT_MODEL};
use crate::render::generate_report;
use crate::report::normalize::normalize_record;
use crate::report::store::{load_previous, save_record};
use crate::report::week::current_week_range;
use crate::report::{
    AiTask, ExecutionItem, FrictionItem, ReportRecord, SopItem, SopSection, TransformationLog,
};

pub const DEFAULT_OUTPUT_FILE: &str = "Weekly_Report_This_Week.docx";
const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone)]
pub struct FillOptions {
    pub template: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub notes: Option<PathBuf>,
    pub style: SuggestStyle,
}

/// Console prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.output, "{}", title.to_uppercase())?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))
    }

    /// Asks a question. An empty answer takes `default`; with no default a
    /// required question is asked again.
    pub fn ask(&mut self, question: &str, default: &str, required: bool) -> io::Result<String> {
        loop {
            if default.is_empty() {
                write!(self.output, "{question}: ")?;
            } else {
                write!(self.output, "{question} [{default}]: ")?;
            }
            self.output.flush()?;

            let answer = match self.read_line()? {
                Some(answer) => answer,
                None if default.is_empty() && required => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("input ended before '{question}' was answered"),
                    ))
                }
                None => String::new(),
            };
            if !answer.is_empty() {
                return Ok(answer);
            }
            if !default.is_empty() || !required {
                return Ok(default.to_string());
            }
            writeln!(self.output, "This field is required. Please enter a value.")?;
        }
    }

    /// Yes/no question; only `y` counts as yes unless `default_yes` and the answer is empty.
    pub fn confirm(&mut self, question: &str, default_yes: bool) -> io::Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/n" };
        write!(self.output, "{question} ({hint}): ")?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default().to_lowercase();
        Ok(match answer.as_str() {
            "" => default_yes,
            "y" | "yes" => true,
            _ => false,
        })
    }

    /// Collects items until an empty line.
    pub fn ask_list(&mut self, question: &str, label: &str) -> io::Result<Vec<String>> {
        writeln!(self.output, "\n{question}")?;
        writeln!(self.output, "(Press Enter on an empty line to finish)")?;
        let mut items = Vec::new();
        loop {
            write!(self.output, "{label} {} (or press Enter to finish): ", items.len() + 1)?;
            self.output.flush()?;
            match self.read_line()? {
                Some(item) if !item.is_empty() => items.push(item),
                _ => return Ok(items),
            }
        }
    }

    /// Shows pre-filled items and asks whether to keep them before collecting new ones.
    fn keep_existing<T: Clone>(
        &mut self,
        existing: &[T],
        describe: impl Fn(&T) -> String,
    ) -> io::Result<Vec<T>> {
        if existing.is_empty() {
            return Ok(Vec::new());
        }
        writeln!(self.output, "Suggested:")?;
        for (i, item) in existing.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, describe(item))?;
        }
        if self.confirm(&format!("Keep these {} item(s)?", existing.len()), true)? {
            Ok(existing.to_vec())
        } else {
            Ok(Vec::new())
        }
    }

    fn ask_ai_task(&mut self, number: usize) -> io::Result<AiTask> {
        writeln!(self.output, "\n--- AI Acceleration Task {number} ---")?;
        Ok(AiTask {
            task: self.ask("Task description", "", true)?,
            tool_agent: self.ask("Tool / Agent used", "", true)?,
            time_saved: self.ask("Time Saved (Est.)", "", true)?,
            insight_failure: self.ask("Insight / Limitation", "", true)?,
        })
    }

    /// Prompts for every field, offering values from `defaults`.
    pub fn collect_record(&mut self, defaults: &ReportRecord) -> io::Result<ReportRecord> {
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "WEEKLY REPORT FORM")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            self.output,
            "\nFill out the form below. Press Enter to use default values where shown."
        )?;

        self.section("Basic information")?;
        let name = self.ask("Name", &defaults.name, true)?;
        let role = self.ask("Role", &defaults.role, true)?;
        let week = self.ask("Week", &current_week_range(), true)?;

        self.section("Weekly objective")?;
        let weekly_objective = self.ask(
            "Weekly Objective (One Sentence)",
            &defaults.weekly_objective,
            false,
        )?;

        self.section("Execution & output")?;
        let mut execution_output =
            self.keep_existing(&defaults.execution_output, |item| item.summary.clone())?;
        writeln!(self.output, "\nEnter your execution & output items:")?;
        writeln!(self.output, "(Press Enter on an empty summary to finish)")?;
        loop {
            let label = format!("Item {} summary", execution_output.len() + 1);
            let summary = self.ask(&label, "", false)?;
            if summary.is_empty() {
                break;
            }
            let content = self.ask("  Details (use '- ' for bullets)", "", false)?;
            execution_output.push(ExecutionItem { summary, content });
        }

        self.section("AI acceleration tasks")?;
        let mut ai_tasks = self.keep_existing(defaults.ai_tasks(), |task| task.task.clone())?;
        while self.confirm(&format!("\nAdd AI task {}?", ai_tasks.len() + 1), false)? {
            let task = self.ask_ai_task(ai_tasks.len() + 1)?;
            ai_tasks.push(task);
        }

        self.section("SOP & process solidification")?;
        let sop_default = defaults
            .sop_process_solidification
            .items_or_default()
            .into_iter()
            .next()
            .unwrap_or_default();
        let sop_item = SopItem {
            item: self.ask("Item", &sop_default.item, false)?,
            impact: self.ask("Impact", &sop_default.impact, false)?,
        };

        self.section("Friction, blockers & ask")?;
        let mut friction_blockers_ask =
            self.keep_existing(&defaults.friction_blockers_ask, |f| f.friction.clone())?;
        friction_blockers_ask.extend(
            self.ask_list("Enter friction, blockers, or asks:", "Item")?
                .into_iter()
                .map(|friction| FrictionItem {
                    friction,
                    ..Default::default()
                }),
        );

        self.section("Next week's focus")?;
        let mut next_week_focus = self.keep_existing(&defaults.next_week_focus, String::clone)?;
        next_week_focus.extend(self.ask_list("Enter next week's focus items:", "Item")?);

        Ok(ReportRecord {
            name,
            role,
            name_for_file: defaults.name_for_file.clone(),
            week,
            weekly_objective,
            execution_output,
            transformation_log: TransformationLog {
                ai_acceleration_tasks: ai_tasks,
            },
            sop_process_solidification: SopSection {
                items: vec![sop_item],
            },
            friction_blockers_ask,
            next_week_focus,
        })
    }
}

/// Runs the interactive dialogue on stdin/stdout, saves the YAML, then renders.
pub async fn run_fill(config: &Config, options: FillOptions) -> Result<()> {
    let mut defaults = load_previous(&options.input);

    if let Some(notes_path) = &options.notes {
        let notes = std::fs::read_to_string(notes_path)
            .with_context(|| format!("Failed to read notes file {}", notes_path.display()))?;
        let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone());
        match suggest(&llm, &notes, options.style, DEFAULT_MODEL).await {
            Ok(suggestion) => {
                suggestion.merge_into(&mut defaults);
                println!(
                    "✓ AI pre-filled: {}",
                    suggestion.present_fields().join(", ")
                );
            }
            Err(e) => warn!("AI pre-fill skipped: {e}"),
        }
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let mut record = prompter
        .collect_record(&defaults)
        .context("Failed to read answers")?;
    normalize_record(&mut record);

    save_record(&options.input, &record)?;
    println!("\n✓ Saved YAML to: {}", options.input.display());

    println!("\nGenerating Word document...");
    let template = options.template.clone();
    let output = options.output.clone();
    tokio::task::spawn_blocking(move || generate_report(&template, &record, &output))
        .await
        .context("render task failed")??;

    println!("✓ Generated Word document: {}", options.output.display());
    Ok(())
}
