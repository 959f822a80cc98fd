//! CLI entry point for newsletter-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "newsletter-rs")]
#[command(version)]
#[command(about = "Builds a club website's newsletter page from Markdown", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new newsletter site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a newsletter file and add it to the manifest
    New {
        /// Title of the newsletter
        title: String,

        /// Publication date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate the newsletter page
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Exit with an error when the newsletters cannot be loaded
        #[arg(long)]
        strict: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// List newsletters in page order
    List {
        /// Also list Markdown files missing from the manifest
        #[arg(long)]
        orphans: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "newsletter_rs=debug,info"
    } else {
        "newsletter_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing newsletter site in {:?}", target_dir);
            newsletter_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized newsletter site in {:?}", target_dir);
        }

        Commands::New { title, date } => {
            let site = newsletter_rs::Site::new(&base_dir)?;
            tracing::info!("Creating newsletter: {}", title);
            newsletter_rs::commands::new::create_newsletter(&site, &title, date.as_deref())?;
        }

        Commands::Generate { watch, strict } => {
            let site = newsletter_rs::Site::new(&base_dir)?;
            newsletter_rs::commands::generate::run(&site, strict).await?;
            println!("Generated successfully!");

            if watch {
                newsletter_rs::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = newsletter_rs::Site::new(&base_dir)?;
            site.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            newsletter_rs::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::List { orphans } => {
            let site = newsletter_rs::Site::new(&base_dir)?;
            newsletter_rs::commands::list::run(&site, orphans).await?;
        }

        Commands::Clean => {
            let site = newsletter_rs::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("newsletter-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
