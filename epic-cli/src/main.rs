//! epic CLI
//!
//! Serve a site while writing it, or export it for static hosting.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use epic_site::config::DEFAULT_SITE_ROOT;
use epic_site::generate::DEFAULT_OUT_DIR;
use epic_site::server::{DEFAULT_PORT, bind};
use epic_site::{Site, SiteConfig, generate, serve};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Make a website epically
#[derive(Parser, Debug)]
#[command(name = "epic")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Serve ./site on http://localhost:4000
    epic serve

    # Serve another site on another port
    epic --site ../blog serve --port 8080

    # Export ./site into ./dist
    epic generate
"#)]
struct Cli {
    /// Site root containing document.html, pages/ and static/
    #[arg(long, global = true, value_name = "DIR", default_value = DEFAULT_SITE_ROOT)]
    site: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Epically serve your site
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Epically generate your site for static deployment
    Generate {
        /// Directory to write the exported site to
        #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let site = Site::new(SiteConfig::new(&cli.site));
    match cli.command {
        Command::Serve { port } => {
            let listener = bind(port).await?;
            println!(
                "{} {}",
                "Listening on".green().bold(),
                format!("http://localhost:{port}").underline()
            );
            serve(Arc::new(site), listener).await?;
        }
        Command::Generate { out } => {
            let exported = tokio::task::spawn_blocking(move || {
                generate(&site, &out).map(|report| (report, out))
            })
            .await
            .context("export task panicked")?;
            let (report, out) =
                exported.with_context(|| format!("failed to export {}", cli.site.display()))?;
            println!(
                "{} {} pages and {} static files into {}",
                "Generated".green().bold(),
                report.pages,
                report.static_files,
                out.display().bold()
            );
        }
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
