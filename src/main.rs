// src/main.rs

use tiledash::logging::{LogTarget, init_logging};
use tiledash::{cli, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("tiledash error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let target = LogTarget::select(args.log_file.as_deref(), args.uses_dashboard());
    init_logging(args.log_level, target)?;
    run(args).await
}
