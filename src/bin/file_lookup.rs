use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use landing_files::{
    config::{Config, DocumentBackend},
    documents,
    logging::{self, LogTarget},
    lookup::{self, Verbosity},
    storage::{Database, UploadedFileRecord},
};

/// Inspect uploaded file records by slug.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Overrides DOCUMENT_BACKEND
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every file uploaded under a slug
    Query {
        slug: String,

        /// Also print each file's storage path
        #[arg(long)]
        detailed: bool,
    },
    /// Load a JSON array of uploaded file records into the local mirror
    Import { path: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Firestore,
    Local,
}

impl From<Backend> for DocumentBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Firestore => DocumentBackend::Firestore,
            Backend::Local => DocumentBackend::Local,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init("warn", LogTarget::Stderr);

    let args = Args::parse();
    let mut config = Config::load()?;
    if let Some(backend) = args.backend {
        config.documents.backend = backend.into();
    }

    match args.command {
        Command::Query { slug, detailed } => {
            let store = documents::from_config(&config)?;
            let records = lookup::lookup(store.as_ref(), &slug).await?;

            let verbosity = if detailed {
                Verbosity::Detailed
            } else {
                Verbosity::Brief
            };
            let stdout = std::io::stdout();
            lookup::write_report(&mut stdout.lock(), &slug, &records, verbosity)?;
        }
        Command::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let records: Vec<UploadedFileRecord> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?;

            let db = Database::open(&config.documents.local_data_dir)?;
            for record in &records {
                db.put_file(record)?;
            }

            info!(
                imported = records.len(),
                total = db.get_all_files()?.len(),
                "Imported uploaded file records"
            );
            println!(
                "Imported {} records into {}",
                records.len(),
                config.documents.local_data_dir
            );
        }
    }

    Ok(())
}
