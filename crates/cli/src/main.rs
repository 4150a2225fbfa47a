use clap::{Parser, Subcommand};
use filestore_core::constants::{MAX_UPLOAD_BYTES_ENV, REST_ADDR_ENV, STORAGE_DIR_ENV};
use filestore_core::{initialise_storage, CoreConfig, FilesService, DEFAULT_PAGE_SIZE};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "filestore")]
#[command(about = "Sharded file storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a local file (an existing file with the same name is kept)
    Upload {
        /// Local file to upload
        path: PathBuf,
        /// Stored name (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace the content of a stored file
    Update {
        /// Stored file name
        name: String,
        /// Local file with the new content
        path: PathBuf,
    },
    /// Copy a stored file out of the store
    Download {
        /// Stored file name
        name: String,
        /// Destination (defaults to the stored name in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a stored file
    Delete {
        /// Stored file name
        name: String,
    },
    /// List stored files whose name fully matches a regex
    Search {
        /// Pattern matched against the whole file name
        regex: String,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: i64,
        /// Page size
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: i64,
    },
    /// Count every stored file
    Count,
}

fn local_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn open_service() -> Result<FilesService, Box<dyn std::error::Error>> {
    let cfg = CoreConfig::from_env_values(
        std::env::var(STORAGE_DIR_ENV).ok(),
        std::env::var(REST_ADDR_ENV).ok(),
        std::env::var(MAX_UPLOAD_BYTES_ENV).ok(),
    )?;
    Ok(initialise_storage(&cfg)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'filestore --help' for commands");
        return Ok(());
    };
    let files = open_service()?;
    run(command, &files)
}

fn run(command: Commands, files: &FilesService) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Upload { path, name } => {
            let name = name.unwrap_or_else(|| local_file_name(&path));
            let stored = File::open(&path)
                .map_err(Into::into)
                .and_then(|f| files.save(&name, f))
                .map_err(|e| format!("Error uploading {}: {}", name, e))?;
            println!("Stored: {}", stored);
        }
        Commands::Update { name, path } => {
            let stored = File::open(&path)
                .map_err(Into::into)
                .and_then(|f| files.update(&name, f, None))
                .map_err(|e| format!("Error updating {}: {}", name, e))?;
            println!("Updated: {}", stored);
        }
        Commands::Download { name, out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&name));
            let bytes = files
                .retrieve(&name)
                .and_then(|src| fs::copy(src, &out).map_err(Into::into))
                .map_err(|e| format!("Error downloading {}: {}", name, e))?;
            println!("Wrote {} bytes to {}", bytes, out.display());
        }
        Commands::Delete { name } => {
            files
                .delete(&name)
                .map_err(|e| format!("Error deleting {}: {}", name, e))?;
            println!("File deleted: {}", name);
        }
        Commands::Search { regex, page, size } => {
            let listing = files
                .list_matching(&regex, page, size)
                .map_err(|e| format!("Error searching: {}", e))?;
            for file in &listing.files {
                println!("{}", file.name);
            }
            println!(
                "-- {} matching, page {} (size {})",
                listing.total_matching, listing.page, listing.size
            );
        }
        Commands::Count => {
            let count = files
                .count_all()
                .map_err(|e| format!("Error counting files: {}", e))?;
            println!("{}", count);
        }
    }

    Ok(())
}
