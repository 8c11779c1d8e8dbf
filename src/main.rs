//! CLI entry point for blog-collection

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-collection")]
#[command(version)]
#[command(about = "Load and validate a static site's blog content collection", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Use this config file instead of collection.yml / collection.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every document in the collection
    #[command(alias = "c")]
    Check {
        /// Re-check when files change
        #[arg(short, long)]
        watch: bool,
    },

    /// List collection content
    List {
        /// Type of content to list (post, draft, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a validated entry as JSON
    Show {
        /// Entry id
        id: String,

        /// Include the document body
        #[arg(long)]
        body: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Create the post as a draft
        #[arg(long)]
        draft: bool,

        /// File name (without extension) relative to the collection directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_collection=debug,info"
    } else {
        "blog_collection=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let config = cli.config;
    let load_site = || -> Result<blog_collection::Site> {
        let site = match &config {
            Some(path) => blog_collection::Site::from_config_file(&base_dir, path)?,
            None => blog_collection::Site::new(&base_dir)?,
        };
        tracing::debug!("Collection '{}' at {:?}", site.config.name, site.collection_dir);
        Ok(site)
    };

    match cli.command {
        Commands::Check { watch } => {
            let site = load_site()?;
            let ok = blog_collection::commands::check::run(&site)?;

            if watch {
                blog_collection::commands::check::watch(&site).await?;
            } else if !ok {
                std::process::exit(1);
            }
        }

        Commands::List { r#type } => {
            let site = load_site()?;
            blog_collection::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { id, body } => {
            let site = load_site()?;
            blog_collection::commands::show::run(&site, &id, body)?;
        }

        Commands::New { title, draft, path } => {
            let site = load_site()?;
            tracing::info!("Creating new post with title: {}", title);
            blog_collection::commands::new::run(&site, &title, draft, path.as_deref())?;
        }

        Commands::Version => {
            println!("blog-collection version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
