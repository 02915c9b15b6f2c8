use crate::reports;
use chrono::Utc;
use clap::Args;
use phiscore::config::Config;
use phiscore::loader;
use phiscore::{Engine, PhiResult};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV with `site,metric,value[,observed_at,ecosystem,region,previous_score]`
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &BatchArgs, engine: &Engine) -> PhiResult<()> {
    let mut sites = loader::load_batch_file(&args.input)?;

    // Sites without their own context take the CLI defaults
    for site in &mut sites {
        if site.ecosystem.is_none() {
            site.ecosystem = args.config.site.ecosystem.clone();
        }
        if site.region.is_none() {
            site.region = args.config.site.region.clone();
        }
    }

    let start = Instant::now();
    let assessments = engine.evaluate_batch(&sites, Utc::now());
    tracing::debug!(
        "Evaluated {} sites in {:.2?}",
        assessments.len(),
        start.elapsed()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessments)?);
    } else {
        reports::print_batch_summary(&assessments);
    }
    Ok(())
}
