use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::modules::books::BooksPageRenderer;
use shelf_kernel::settings::Settings;

/// Serve and inspect the SHELF books page.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// SQLite store to read, overriding `database.path`
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve {
        /// Interface to bind, overriding `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overriding `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the books page once to stdout
    Render,
    /// Report whether the store is readable and how many rows it holds
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load SHELF settings")?;
    if let Some(path) = cli.database {
        settings.database.path = path;
    }
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            tokio::runtime::Runtime::new()
                .context("failed to start async runtime")?
                .block_on(shelf_app::run(settings))
        }
        Command::Render => {
            let renderer = BooksPageRenderer::new(settings.database);
            let page = renderer
                .render_blocking()
                .context("failed to render books page")?;
            print!("{page}");
            Ok(())
        }
        Command::Check => {
            let renderer = BooksPageRenderer::new(settings.database);
            let counts = renderer
                .counts_blocking()
                .context("store check failed")?;

            tracing::info!(
                books = counts.books,
                categories = counts.categories,
                "store readable"
            );
            println!(
                "{}: {} books, {} categories",
                renderer.database().path.display(),
                counts.books,
                counts.categories
            );
            Ok(())
        }
    }
}
