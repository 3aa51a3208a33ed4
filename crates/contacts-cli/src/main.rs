//! Contacts CLI
//!
//! Command-line tool for importing vCard files into a contact store and
//! exporting the store as delimited text.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use contacts_core::{
    comparator, find_cards, import_contact, parse_card_file, to_csv, ContactList,
    ImportOutcome, SortKey, SortOrder, Store, Strategy, DEFAULT_SEPARATOR,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contacts")]
#[command(about = "vCard contact importer", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the JSON contact store
    #[arg(long, global = true, env = "CONTACTS_DB", default_value = "users.json")]
    db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import card files (or directories of .vcf files) into the store
    Import {
        /// Card files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// How to resolve duplicates: keep-a, keep-b, merge or both
        #[arg(short, long, default_value = "merge")]
        strategy: Strategy,
    },

    /// Export the store as delimited text
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Field separator (single character)
        #[arg(long, default_value = DEFAULT_SEPARATOR)]
        separator: String,

        /// Sort key: last-name, first-name or organization
        #[arg(long, default_value = "last-name")]
        sort: SortKey,

        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },

    /// List stored contacts
    List,

    /// Parse a single card and print it as JSON
    Parse {
        /// Path to card file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { paths, strategy } => cmd_import(&cli.db, &paths, strategy),
        Commands::Export {
            output,
            separator,
            sort,
            order,
        } => cmd_export(&cli.db, &output, &separator, sort, order),
        Commands::List => cmd_list(&cli.db),
        Commands::Parse { file } => cmd_parse(&file),
    }
}

fn open_store(db: &Path) -> Result<Store> {
    Store::open(db).with_context(|| format!("failed to open store '{}'", db.display()))
}

fn cmd_import(db: &Path, paths: &[PathBuf], strategy: Strategy) -> Result<()> {
    let mut store = open_store(db)?;
    let mut list = ContactList::from_store(&mut store);
    let cards = find_cards(paths)?;
    info!(cards = cards.len(), %strategy, "importing cards");

    let mut failed = 0;
    for path in &cards {
        let contact = match parse_card_file(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{}", e);
                failed += 1;
                continue;
            }
        };

        let name = contact.full_name();
        let outcome = import_contact(&mut list, contact, |existing, incoming| {
            debug!(existing = %existing, incoming = %incoming, "duplicate found");
            strategy
        })?;

        match outcome {
            ImportOutcome::Inserted => println!("Added {}", name),
            ImportOutcome::Merged { strategy, existing } => {
                println!("Merged {} with {} stored record(s) ({})", name, existing, strategy)
            }
        }
    }

    list.write_to_store(&mut store);
    store.save()?;
    println!(
        "Imported {} of {} card(s); store holds {} contact(s)",
        cards.len() - failed,
        cards.len(),
        list.len()
    );

    if failed > 0 {
        bail!("{} card(s) could not be parsed", failed);
    }

    Ok(())
}

fn cmd_export(
    db: &Path,
    output: &Path,
    separator: &str,
    sort: SortKey,
    order: SortOrder,
) -> Result<()> {
    let mut store = open_store(db)?;
    let mut list = ContactList::from_store(&mut store);
    list.sort_by(comparator(sort, order));

    let csv = to_csv(&list, separator)?;
    fs::write(output, csv)
        .with_context(|| format!("failed to write '{}'", output.display()))?;

    println!("Exported {} contacts to {}", list.len(), output.display());

    Ok(())
}

fn cmd_list(db: &Path) -> Result<()> {
    let mut store = open_store(db)?;
    let list = ContactList::from_store(&mut store);

    println!("Contacts ({}):", list.len());
    for contact in &list {
        let revision = contact
            .revision
            .map(|r| r.to_rfc3339())
            .unwrap_or_else(|| "no revision".to_string());
        println!("  {} [{}] {} phone(s)", contact, revision, contact.phones.len());
    }

    Ok(())
}

fn cmd_parse(file: &Path) -> Result<()> {
    let contact = parse_card_file(file)?;
    println!("{}", serde_json::to_string_pretty(&contact)?);

    Ok(())
}
