//! Command line entry point.
//!
//! # Responsibility
//! - Inspect and normalize `DisplayItems` documents.
//! - Drive a scripted session through the collection command surface.

use clap::{Parser, Subcommand};
use grouped_items_core::{
    core_version, default_log_level, init_logging, DisplayCollection, DisplayRepository,
    EntitySnapshot, XmlFileRepository,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "grouped-items")]
#[command(about = "Inspect and edit grouped display item documents", long_about = None)]
#[command(version)]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the core version.
    Version,
    /// Print a document as an outline.
    Show {
        file: PathBuf,
        /// Print snapshots as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Read a document and write it back in canonical form.
    Normalize { input: PathBuf, output: PathBuf },
    /// Build a sample collection through the command surface.
    Demo {
        /// Also write the result as a document.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    match cli.command {
        Commands::Version => println!("grouped_items_core version={}", core_version()),
        Commands::Show { file, json } => {
            let snapshots = XmlFileRepository::new(file).read()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else {
                print_outline(&snapshots, 0);
            }
        }
        Commands::Normalize { input, output } => {
            let snapshots = XmlFileRepository::new(input).read()?;
            let mut collection = DisplayCollection::new();
            collection.load(&snapshots)?;
            XmlFileRepository::new(&output).write(&collection.snapshot()?)?;
            println!("wrote {}", output.display());
        }
        Commands::Demo { output } => {
            let snapshots = demo_session()?;
            print_outline(&snapshots, 0);
            if let Some(output) = output {
                XmlFileRepository::new(&output).write(&snapshots)?;
                println!("wrote {}", output.display());
            }
        }
    }
    Ok(())
}

fn demo_session() -> Result<Vec<EntitySnapshot>, Box<dyn Error>> {
    let mut collection = DisplayCollection::new();
    let mut items = Vec::new();
    for _ in 0..3 {
        items.extend(collection.add_new_item()?);
    }
    if items.len() != 3 {
        return Err("demo items were not placed at the top level".into());
    }

    collection.set_selection(items[1..].iter().copied())?;
    let group = collection.group_with_generated_name()?;

    collection.set_selection([items[2]])?;
    collection.add_new_item()?;

    collection.set_selection([items[0]])?;
    collection.duplicate()?;

    collection.set_selection([items[2]])?;
    collection.move_items_out_of_group()?;

    info!(
        "event=cli_demo module=cli status=ok group={:?} top_level={}",
        group,
        collection.len()
    );
    Ok(collection.snapshot()?)
}

fn print_outline(snapshots: &[EntitySnapshot], depth: usize) {
    for snapshot in snapshots {
        println!(
            "{}{} [{}] {}",
            "  ".repeat(depth),
            snapshot.name,
            snapshot.level,
            snapshot.uid
        );
        print_outline(&snapshot.children, depth + 1);
    }
}
