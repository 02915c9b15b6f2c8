use crate::reports;
use chrono::Utc;
use clap::Args;
use phiscore::config::Config;
use phiscore::loader;
use phiscore::{Engine, PhiResult};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub config: Config,

    /// Site readings JSON (one object or an array of sites)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print the full assessment as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &EvaluateArgs, engine: &Engine) -> PhiResult<()> {
    let mut sites = loader::load_site_file(&args.input)?;

    // Explicit flags win over what the file says
    for site in &mut sites {
        if let Some(eco) = &args.config.site.ecosystem {
            site.ecosystem = Some(eco.clone());
        }
        if let Some(region) = &args.config.site.region {
            site.region = Some(region.clone());
        }
    }

    let assessments = engine.evaluate_batch(&sites, Utc::now());

    if args.json {
        let out = match assessments.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        println!("{}", out);
        return Ok(());
    }

    for assessment in &assessments {
        reports::print_assessment(assessment);
    }
    Ok(())
}
