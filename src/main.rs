use clap::Parser;
use njar::app_constants::log::{DEFAULT_LOG_LEVEL, LOG_ENV_VAR};
use njar::cli::{Cli, CommandHandler};
use njar::utils::paths::NjarPaths;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // RUST_LOG 优先，其次 NJAR_LOG，默认只输出警告
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV_VAR))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let paths = match NjarPaths::from_env() {
        Ok(paths) => paths,
        Err(e) => {
            eprint!("{}", e.with_context("定位 njar 数据目录").user_message());
            process::exit(1);
        }
    };

    let mut handler = match CommandHandler::new(paths) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("{}", e.trim_end());
            process::exit(1);
        }
    };

    if let Err(e) = handler.handle_command(cli.command).await {
        eprintln!("{}", e.trim_end());
        process::exit(1);
    }
}
