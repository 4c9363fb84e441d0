use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::assist::SuggestStyle;

#[derive(Parser, Debug)]
#[command(
    name = "weekly-report",
    version,
    about = "Fill in a weekly status report and render it into the Word template"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web form (default when no command is given).
    Serve,
    /// Answer prompts on the console, save the YAML and render the report.
    Fill(FillArgs),
    /// Render an existing YAML input file.
    Generate(GenerateArgs),
    /// Write a blank template with every section heading.
    InitTemplate(InitTemplateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Defaults to WEEKLY_REPORT_TEMPLATE.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Defaults to WEEKLY_REPORT_INPUT_FILE.
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, default_value = crate::fill::DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Free-text notes used to pre-fill the answers with AI Assist.
    #[arg(long)]
    pub notes: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SuggestStyle::Concise)]
    pub style: SuggestStyle,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long)]
    pub template: PathBuf,

    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct InitTemplateArgs {
    #[arg(long, default_value = crate::config::DEFAULT_TEMPLATE_FILE)]
    pub output: PathBuf,

    #[arg(long, default_value_t = false)]
    pub force: bool,
}
