use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;

use ledger_rs::{
    DEFAULT_STARTING_CASH, PasswordHash, create_user, initialize_finance_db, open_connection,
};

/// A utility for creating a test database for the finance app.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create a finance database with the user "test" whose password is "test".
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'finance.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'finance.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = open_connection(output_path)?;

    initialize_finance_db(&connection)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;
    create_user("test", password_hash, DEFAULT_STARTING_CASH, &connection)?;

    println!("Success!");

    Ok(())
}
