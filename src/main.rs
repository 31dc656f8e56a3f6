use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mongoframe::export::csv::write_csv;
use mongoframe::{CollectionExporter, SettingsStore};

#[derive(Parser)]
#[command(
    name = "mongoframe",
    version,
    about = "Export a MongoDB collection as a cleansed CSV table",
    long_about = "Reads every document of a collection, unifies their fields into columns, \
                  drops an `id` column, turns \"na\" values into empty cells and writes CSV.\n\
                  The connection URL is read from MONGODB_URL unless the settings say otherwise."
)]
struct Cli {
    #[arg(long, help = "Settings file (default: <config dir>/mongoframe/settings.json)")]
    config: Option<PathBuf>,
    #[arg(long, help = "Database to read from")]
    database: Option<String>,
    #[arg(long, help = "Collection to export")]
    collection: Option<String>,
    #[arg(short, long, default_value = "-", help = "Output CSV path, or - for stdout")]
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => SettingsStore::load_from(path)?,
        None => SettingsStore::new()?.load()?,
    };
    if let Some(database) = cli.database {
        settings.database = database;
    }
    if let Some(collection) = cli.collection {
        settings.collection = collection;
    }

    let exporter = CollectionExporter::from_settings(&settings)?;
    let records = exporter.export(&settings.collection, None).with_context(|| {
        format!("Failed to export {}.{}", settings.database, settings.collection)
    })?;

    let writer: Box<dyn Write> = if cli.output == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(&cli.output)
            .with_context(|| format!("Failed to create {}", cli.output))?;
        Box::new(BufWriter::new(file))
    };
    let written = write_csv(&records, writer)?;

    log::info!(
        "Exported {} rows x {} columns ({written} CSV rows)",
        records.num_rows(),
        records.num_columns()
    );
    Ok(())
}
