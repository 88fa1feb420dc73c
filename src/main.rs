use clap::Parser;
use env_logger::Env;

use dbscan_filter::app;
use dbscan_filter::config::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_filter())).init();

    app::run(&args)?;
    Ok(())
}
