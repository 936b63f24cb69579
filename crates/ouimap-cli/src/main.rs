//! OUImap CLI
//!
//! Resolves MAC addresses and prefixes to vendors, and vendor names to their
//! assigned prefixes, from a local copy of the Wireshark manuf table.

mod database;
mod input;
mod output;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ouimap_core::{Matcher, RecordStore, MAC_BITS};

#[derive(Parser)]
#[command(name = "ouimap")]
#[command(about = "MAC address prefix and vendor lookup")]
struct Cli {
    /// Database file (gzip or plain manuf format)
    #[arg(long, global = true, env = "OUIMAP_DB")]
    db: Option<PathBuf>,

    /// Days after which the database is reported stale
    #[arg(long, global = true, env = "OUIMAP_MAX_AGE_DAYS", default_value_t = 7)]
    max_age_days: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up OUIs, MAC addresses or vendor names
    Lookup {
        /// Queries; reads batches from stdin when none are given
        queries: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database statistics
    Info,

    /// Verify that the database decompresses and parses
    Check,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let db = cli.db.unwrap_or_else(database::default_db_path);

    let result = match cli.command {
        Commands::Lookup { queries, json } => cmd_lookup(&db, cli.max_age_days, &queries, json),
        Commands::Info => cmd_info(&db, cli.max_age_days),
        Commands::Check => cmd_check(&db),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_store(db: &Path, max_age_days: u64) -> Result<RecordStore, String> {
    let (store, _) =
        database::load(db).map_err(|e| format!("Failed to load OUI data: {}", e))?;
    database::warn_if_stale(db, max_age_days);
    Ok(store)
}

fn cmd_lookup(db: &Path, max_age_days: u64, queries: &[String], json: bool) -> Result<(), String> {
    let store = load_store(db, max_age_days)?;
    let matcher = Matcher::new(&store);

    if !queries.is_empty() {
        return run_batch(&matcher, queries, json);
    }

    print!("\n{}\n\n", input::PROMPT_HELP);
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    while let Some(batch) =
        input::read_batch(&mut reader).map_err(|e| format!("Failed to read input: {}", e))?
    {
        run_batch(&matcher, &batch, json)?;
    }

    Ok(())
}

fn run_batch(matcher: &Matcher<'_>, queries: &[String], json: bool) -> Result<(), String> {
    let start = Instant::now();
    let results = matcher.lookup(queries);
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if json {
        output::write_json(&mut out, &results)
    } else {
        output::write_text(&mut out, &results, elapsed)
    };
    written
        .and_then(|_| out.flush())
        .map_err(|e| format!("Failed to write results: {}", e))
}

fn cmd_info(db: &Path, max_age_days: u64) -> Result<(), String> {
    let (store, report) =
        database::load(db).map_err(|e| format!("Failed to load OUI data: {}", e))?;
    let age = database::age(db)
        .map_err(|e| format!("Failed to stat '{}': {}", db.display(), e))?;
    let stale = database::is_stale(age, max_age_days);

    println!("Database: {}", db.display());
    println!(
        "  Age:         {} day(s){}",
        database::days(age),
        if stale { " (stale)" } else { "" }
    );
    println!("  Lines:       {}", report.lines);
    println!("  Records:     {}", store.len());
    println!("  Vendors:     {}", store.vendor_count());
    println!("  Dropped:     {} malformed line(s)", report.dropped.len());
    println!();

    println!("Prefix lengths:");
    for (len, count) in store.length_histogram().iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let label = if len == MAC_BITS as usize {
            "full".to_string()
        } else {
            format!("/{}", len)
        };
        println!("  {:<6} {}", label, count);
    }

    Ok(())
}

fn cmd_check(db: &Path) -> Result<(), String> {
    let decoded = database::check(db)?;
    let (store, report) = database::load(db)?;

    println!("Database '{}' is valid", db.display());
    println!("  Decoded:     {} bytes ({:.1} KB)", decoded, decoded as f64 / 1024.0);
    println!("  Records:     {}", store.len());
    println!("  Dropped:     {} malformed line(s)", report.dropped.len());

    for diagnostic in report.dropped.iter().take(10) {
        println!("    line {}: {}", diagnostic.line, diagnostic.reason);
    }
    if report.dropped.len() > 10 {
        println!("    ... {} more", report.dropped.len() - 10);
    }

    Ok(())
}
