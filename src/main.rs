use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xlink::config::Config;
use xlink::models::Source;

mod commands;

#[derive(Parser)]
#[command(
    name = "xlink",
    version,
    about = "Entity-linked corpus builder for encyclopedia dumps",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (defaults to XLINK_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve raw corpus pages to entities and clean their bodies
    Refine {
        /// Corpus source (primary, wiki)
        #[arg(short, long)]
        source: Source,

        /// Raw corpus file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Refined corpus file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-resolve refined corpus annotations into [[id|mention]] spans
    Annotate {
        /// Corpus source (primary, wiki)
        #[arg(short, long)]
        source: Source,

        /// Refined corpus file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Annotation-refined corpus file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mention-anchor statistics
    Anchors {
        #[command(subcommand)]
        command: AnchorCommands,
    },
}

#[derive(Subcommand)]
enum AnchorCommands {
    /// Count mention anchors and out-links, merging all inputs
    Extract {
        /// Corpus source used for default paths
        #[arg(short, long)]
        source: Source,

        /// Annotation-refined corpus files
        #[arg(short, long, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Merged mention-anchor table
        #[arg(long)]
        anchors_out: Option<PathBuf>,

        /// Merged out-link table
        #[arg(long)]
        out_links_out: Option<PathBuf>,
    },

    /// Inject dictionary entities into a mention-anchor table
    Expand {
        /// Corpus source (primary, wiki)
        #[arg(short, long)]
        source: Source,

        /// Mention-anchor table to expand
        #[arg(long)]
        anchors: Option<PathBuf>,

        /// Expanded table (defaults to overwriting the input)
        #[arg(long)]
        anchors_out: Option<PathBuf>,

        /// Title-entity fallback table
        #[arg(long)]
        title_entities_out: Option<PathBuf>,
    },

    /// Drop rare and low link-probability mentions
    Filter {
        /// Mention-anchor table
        #[arg(long)]
        anchors: PathBuf,

        /// Link-count table
        #[arg(long)]
        link_counts: PathBuf,

        /// Plain-text frequency table
        #[arg(long)]
        freq_counts: PathBuf,

        /// Minimum link probability (defaults to the configured value)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Filtered mention-anchor table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Derive the link-count table from a mention-anchor table
    LinkCounts {
        /// Mention-anchor table
        #[arg(long)]
        anchors: PathBuf,

        /// Link-count table
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    // Initialize tracing/logging
    let log_format = cli
        .log_format
        .as_deref()
        .unwrap_or(config.logging.format.as_str());
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(data_root = %config.data.root.display(), "xlink starting");

    match cli.command {
        Commands::Refine {
            source,
            input,
            output,
        } => {
            tracing::info!(
                source = %source,
                input = ?input,
                output = ?output,
                "Starting refine command"
            );
            commands::refine(&config, source, input, output)?;
        }

        Commands::Annotate {
            source,
            input,
            output,
        } => {
            tracing::info!(
                source = %source,
                input = ?input,
                output = ?output,
                "Starting annotate command"
            );
            commands::annotate(&config, source, input, output)?;
        }

        Commands::Anchors { command } => match command {
            AnchorCommands::Extract {
                source,
                input,
                anchors_out,
                out_links_out,
            } => {
                tracing::info!(source = %source, inputs = input.len(), "Starting anchors extract command");
                commands::anchors_extract(&config, source, input, anchors_out, out_links_out)?;
            }

            AnchorCommands::Expand {
                source,
                anchors,
                anchors_out,
                title_entities_out,
            } => {
                tracing::info!(source = %source, anchors = ?anchors, "Starting anchors expand command");
                commands::anchors_expand(&config, source, anchors, anchors_out, title_entities_out)?;
            }

            AnchorCommands::Filter {
                anchors,
                link_counts,
                freq_counts,
                threshold,
                output,
            } => {
                tracing::info!(
                    anchors = %anchors.display(),
                    threshold = ?threshold,
                    "Starting anchors filter command"
                );
                commands::anchors_filter(
                    &config,
                    anchors,
                    link_counts,
                    freq_counts,
                    threshold,
                    output,
                )?;
            }

            AnchorCommands::LinkCounts { anchors, output } => {
                tracing::info!(anchors = %anchors.display(), "Starting anchors link-counts command");
                commands::anchors_link_counts(anchors, output)?;
            }
        },
    }

    tracing::info!("xlink completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("xlink=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("xlink={level},warn"))?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
