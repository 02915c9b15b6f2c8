use clap::Args;
use phiscore::config::Config;
use phiscore::{Engine, PhiResult};

#[derive(Args, Debug, Clone)]
pub struct TablesArgs {
    #[command(flatten)]
    pub config: Config,
}

/// Dumps the effective reference tables. The output is a valid `--tables` file.
pub fn run(_args: &TablesArgs, engine: &Engine) -> PhiResult<()> {
    println!("{}", serde_json::to_string_pretty(engine.tables())?);
    Ok(())
}
