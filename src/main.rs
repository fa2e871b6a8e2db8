use dockerizer::cli::commands::{CliArgs, Commands};
use dockerizer::cli::handlers::{handle_analyze, handle_clean, handle_generate, EXIT_FAILURE};
use dockerizer::util::logging::{init_logging, LoggingConfig};
use dockerizer::{DockerizerConfig, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();

    let mut config = DockerizerConfig::default();
    if let Some(dir) = &args.catalog {
        config.catalog_dir = Some(dir.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    init_logging(LoggingConfig::from_flags(
        Some(config.log_level.as_str()),
        args.verbose,
        args.quiet,
    ));

    debug!("dockerizer v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args, &config),
        Commands::Generate(generate_args) => handle_generate(generate_args, &config),
        Commands::Clean(clean_args) => handle_clean(clean_args, &config),
    };

    std::process::exit(exit_code);
}
