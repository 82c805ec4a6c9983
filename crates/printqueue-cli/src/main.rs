//! Print queue CLI — command-line client for the makerspace print queue.
//!
//! Set PRINTQUEUE_API_URL, PRINTQUEUE_ACCESS_TOKEN, and (for uploads)
//! PRINTQUEUE_EMAIL, or pass the matching flags.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use printqueue_client::{
    AccessController, AccessState, AccessToken, ApiClient, CatalogState, FileCatalog, LocalFile,
    ReqwestTransport, UploadQueue, UploadStatus, View,
};
use printqueue_cli::{init_tracing, relative_age};
use printqueue_core::ClientConfig;

#[derive(Parser)]
#[command(name = "printqueue", about = "Makerspace print queue client")]
struct Cli {
    /// API base URL (overrides PRINTQUEUE_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Access token (overrides PRINTQUEUE_ACCESS_TOKEN)
    #[arg(long)]
    access_token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the access token and show the resolved view
    Whoami {
        /// Resolve against the lab view instead of the upload view
        #[arg(long)]
        lab: bool,
    },
    /// List the queued files (lab access)
    List {
        /// Print the raw JSON entries instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Upload one or more STL files to the queue
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
        /// Uploader email shown in the lab listing (overrides PRINTQUEUE_EMAIL)
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(token) = cli.access_token {
        config.token = AccessToken::new(token);
    }

    let transport = ReqwestTransport::new().context("Failed to create HTTP client")?;
    let api = ApiClient::from_config(transport, &config);

    match cli.command {
        Commands::Whoami { lab } => {
            let view = if lab { View::Lab } else { View::Upload };
            let mut controller = AccessController::new();
            match controller.verify(&api, view).await {
                AccessState::Authorized(route) => println!("authorized: {route:?} view"),
                AccessState::Unauthorized(Some(reason)) => {
                    println!("unauthorized: {reason}");
                    std::process::exit(1);
                }
                AccessState::Unauthorized(None) => {
                    println!("unauthorized");
                    std::process::exit(1);
                }
                AccessState::Loading => unreachable!("verify always resolves"),
            }
        }
        Commands::List { json } => {
            let mut catalog = FileCatalog::new();
            match catalog.fetch(&api).await {
                CatalogState::Loaded(files) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(files)?);
                    } else {
                        println!("found {} files", files.len());
                        let now = Utc::now();
                        for file in files {
                            println!(
                                "{}\t{}\t{}\n\t{}",
                                file.name,
                                relative_age(file.created, now),
                                file.uploader,
                                file.download_link
                            );
                        }
                    }
                }
                CatalogState::Forbidden => {
                    println!("Sorry, the listing isn't available without a lab access token.");
                    std::process::exit(1);
                }
                CatalogState::Error(message) => {
                    println!("Error loading files: {message}");
                    std::process::exit(1);
                }
                CatalogState::Loading => unreachable!("fetch always resolves"),
            }
        }
        Commands::Upload { files, email } => {
            let email = email
                .or(config.email)
                .context("No uploader email. Pass --email or set PRINTQUEUE_EMAIL")?;

            let mut local = Vec::with_capacity(files.len());
            for path in &files {
                let file = LocalFile::from_path(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                local.push(file);
            }

            let mut queue = UploadQueue::new();
            queue.add_files(local);
            queue.drive(&api, &email).await;

            let mut failures = 0;
            for unit in queue.units() {
                match unit.status() {
                    UploadStatus::Succeeded => {
                        println!("✅ upload {} succeeded", unit.file_name())
                    }
                    status => {
                        failures += 1;
                        println!("❌ upload {} {status}", unit.file_name());
                    }
                }
            }

            if failures > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
