use std::process::ExitCode;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use clap::Parser;

mod cli;
mod config;
mod handler;
mod http;
mod logger;
mod server;

use cli::Cli;
use config::{AppState, Config, RootContext};
use server::Shutdown;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dirserve: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load(cli)?;
    let root = RootContext::from_config(&cfg.server)?;
    logger::init(&cfg)?;

    // Worker thread count follows `server.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, root))
}

async fn async_main(cfg: Config, root: RootContext) -> Result<(), Box<dyn std::error::Error>> {
    let listener = server::create_listener(root.socket_addr())?;
    logger::log_server_start(&root, &cfg);

    let shutdown = Arc::new(Shutdown::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let state = Arc::new(AppState::new(root, &cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    // Connections run as spawn_local tasks
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server_loop(
            listener,
            state,
            active_connections,
            shutdown,
        ))
        .await?;

    logger::log_info("Server stopped");
    Ok(())
}
