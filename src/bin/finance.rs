use std::{env, net::SocketAddr, path::PathBuf, process::exit, sync::Arc};

use axum_server::Handle;
use clap::Parser;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use ledger_rs::{
    AlphaVantageQuotes, DEFAULT_STARTING_CASH, FinanceState, FixedQuotes, QuoteProvider,
    add_tracing_layer, build_finance_router, graceful_shutdown, init_tracing, open_connection,
};

/// The finance web app: register, look up quotes and trade shares with virtual cash.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the finance SQLite database.
    #[arg(long, default_value = "finance.db")]
    db_path: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The cash balance given to newly registered users.
    #[arg(long, default_value_t = DEFAULT_STARTING_CASH)]
    starting_cash: f64,

    /// A JSON file mapping symbols to prices, e.g. {"NFLX": 500.0}.
    ///
    /// When set, quotes come from this file instead of Alpha Vantage.
    #[arg(long)]
    quotes_file: Option<PathBuf>,

    /// File path that debug logs are appended to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(&args.log_path).expect("Could not create log file");

    if !args.starting_cash.is_finite() || args.starting_cash < 0.0 {
        eprintln!("The starting cash must be a non-negative number.");
        exit(1);
    }

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");
    let quotes = select_quote_provider(&args);
    tracing::info!("Using {} for quotes", quotes.name());

    let connection = open_connection(&args.db_path).expect("Could not open database");
    let state = FinanceState::new(connection, &secret, args.starting_cash, quotes)
        .expect("Could not initialize database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_finance_router(state));

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

fn select_quote_provider(args: &Args) -> Arc<dyn QuoteProvider> {
    if let Some(quotes_file) = &args.quotes_file {
        let quotes = FixedQuotes::from_json_file(quotes_file).unwrap_or_else(|error| {
            eprintln!("{error}");
            exit(1);
        });

        return Arc::new(quotes);
    }

    match env::var("ALPHAVANTAGE_API_KEY") {
        Ok(api_key) => Arc::new(
            AlphaVantageQuotes::new(api_key).expect("Could not create the Alpha Vantage client"),
        ),
        Err(_) => {
            tracing::warn!(
                "Neither ALPHAVANTAGE_API_KEY nor --quotes-file is set, every quote lookup will fail."
            );
            Arc::new(FixedQuotes::default())
        }
    }
}
