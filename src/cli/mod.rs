pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AnalyzeArgs, CleanArgs, CliArgs, Commands, GenerateArgs, OverrideArgs};
pub use output::{GenerationSummary, OutputFormat, OutputFormatter};
