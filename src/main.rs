use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use phiscore::config::TuningParams;
use phiscore::EngineBuilder;
use std::process;
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reference tables JSON (missing sections use the built-in tables)
    #[arg(global = true, long = "tables", value_name = "FILE")]
    tables_file: Option<String>,

    /// Tuning knobs JSON; explicit CLI flags win over the file
    #[arg(global = true, long = "tuning", value_name = "FILE")]
    tuning_file: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Evaluate(cmd::evaluate::EvaluateArgs),
    Batch(cmd::batch::BatchArgs),
    Explain(cmd::explain::ExplainArgs),
    Tables(cmd::tables::TablesArgs),
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // stdout is reserved for reports and JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fatal(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}:", context);
    eprintln!("   {}", e);
    process::exit(1);
}

fn main() {
    // 1. Parse raw matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(cli.debug);

    // 2. Tuning flags live inside the subcommand's matches, not the root
    let sub_matches = matches.subcommand().map_or(&matches, |(_, m)| m);
    let mut config = match &cli.command {
        Commands::Evaluate(args) => args.config.clone(),
        Commands::Batch(args) => args.config.clone(),
        Commands::Explain(args) => args.config.clone(),
        Commands::Tables(args) => args.config.clone(),
    };

    // 3. Tuning file as the base, explicit CLI flags on top
    if let Some(path) = &cli.tuning_file {
        let mut file_tuning = TuningParams::load_from_file(path)
            .unwrap_or_else(|e| fatal("FAILED TO LOAD TUNING FILE", e));
        file_tuning.merge_from_cli(&config.tuning, sub_matches);
        config.tuning = file_tuning;
    }

    // 4. Build the engine
    let mut builder = EngineBuilder::new().with_config(&config);
    if let Some(path) = &cli.tables_file {
        builder = builder
            .with_tables_from_file(path)
            .unwrap_or_else(|e| fatal("FAILED TO LOAD REFERENCE TABLES", e));
    }
    let engine = builder
        .build()
        .unwrap_or_else(|e| fatal("FATAL ERROR INITIALIZING ENGINE", e));

    // 5. Execute
    let result = match &cli.command {
        Commands::Evaluate(args) => cmd::evaluate::run(args, &engine),
        Commands::Batch(args) => cmd::batch::run(args, &engine),
        Commands::Explain(args) => cmd::explain::run(args, &engine),
        Commands::Tables(args) => cmd::tables::run(args, &engine),
    };

    if let Err(e) = result {
        fatal("ERROR", e);
    }
}
