use crate::reports;
use clap::Args;
use phiscore::config::Config;
use phiscore::loader::parse_metric;
use phiscore::{Engine, PhiResult};

#[derive(Args, Debug, Clone)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub metric: String,

    #[arg(short, long, allow_negative_numbers = true)]
    pub value: f64,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &ExplainArgs, engine: &Engine) -> PhiResult<()> {
    let metric = parse_metric(&args.metric)?;
    let breakdown = engine.scorer().explain(metric, args.value);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        reports::print_breakdown(&breakdown);
    }
    Ok(())
}
