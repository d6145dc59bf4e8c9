use std::{net::SocketAddr, path::PathBuf};

use axum_server::Handle;
use clap::Parser;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use ledger_rs::{
    BirthdayState, add_tracing_layer, build_birthday_router, graceful_shutdown, init_tracing,
    open_connection,
};

/// The birthday tracker web app.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the birthday SQLite database.
    #[arg(long, default_value = "birthdays.db")]
    db_path: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    /// File path that debug logs are appended to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(&args.log_path).expect("Could not create log file");

    let connection = open_connection(&args.db_path).expect("Could not open database");
    let state = BirthdayState::new(connection).expect("Could not initialize database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_birthday_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}
