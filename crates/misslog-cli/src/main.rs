//! misslog CLI: log missed exam questions and review weak spots.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "misslog",
    version,
    about = "Track missed questions, reinforce rules, and surface weak tags"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the miss log (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a missed question
    Add {
        /// Subject area (e.g. "Renal")
        #[arg(long)]
        topic: String,

        /// The specific concept that was missed
        #[arg(long)]
        concept: String,

        /// Rule or takeaway to remember
        #[arg(long)]
        rule: String,

        /// Date of the miss, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Why it was missed: knowledge-gap, misread, changed-answer,
        /// time-pressure, calculation, other
        #[arg(long)]
        why: Option<String>,

        /// What specifically happened
        #[arg(long)]
        why_notes: Option<String>,

        /// Comma-separated tags (e.g. "renal, acid-base")
        #[arg(long)]
        tags: Option<String>,
    },

    /// Edit an existing miss; omitted fields keep their value
    Edit {
        /// Entry id
        id: String,

        #[arg(long)]
        topic: Option<String>,

        #[arg(long)]
        concept: Option<String>,

        #[arg(long)]
        rule: Option<String>,

        /// Date of the miss, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        why: Option<String>,

        #[arg(long)]
        why_notes: Option<String>,

        /// Comma-separated tags; replaces all tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a miss
    Delete {
        /// Entry id
        id: String,
    },

    /// List misses, newest first
    List {
        /// Only this topic (exact match)
        #[arg(long)]
        topic: Option<String>,

        /// Only misses carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only misses with this reason
        #[arg(long)]
        why: Option<String>,

        /// Search topic, concept, rule, and tags
        #[arg(long)]
        search: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List topics in use
    Topics,

    /// List tags in use
    Tags,

    /// Rank tags by how many misses carry them
    WeakTags {
        /// How many tags to show (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show miss counts per reason
    Stats,

    /// Export all misses as JSON
    Export {
        /// Output file or directory ("-" for stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace all misses with a JSON export
    Import {
        /// JSON file to import
        file: PathBuf,
    },

    /// Delete every miss
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Create a starter config file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("misslog_core=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init = cli.command {
        return commands::init::execute();
    }

    let ctx = commands::Context::load(cli.config, cli.data_dir)?;

    match cli.command {
        Commands::Add {
            topic,
            concept,
            rule,
            date,
            why,
            why_notes,
            tags,
        } => commands::add::execute(
            &ctx,
            commands::EntryFields {
                topic: Some(topic),
                concept: Some(concept),
                rule: Some(rule),
                date,
                why,
                why_notes,
                tags,
            },
        ),
        Commands::Edit {
            id,
            topic,
            concept,
            rule,
            date,
            why,
            why_notes,
            tags,
        } => commands::edit::execute(
            &ctx,
            id,
            commands::EntryFields {
                topic,
                concept,
                rule,
                date,
                why,
                why_notes,
                tags,
            },
        ),
        Commands::Delete { id } => commands::delete::execute(&ctx, id),
        Commands::List {
            topic,
            tag,
            why,
            search,
            format,
        } => commands::list::execute(&ctx, topic, tag, why, search, format),
        Commands::Topics => commands::review::topics(&ctx),
        Commands::Tags => commands::review::tags(&ctx),
        Commands::WeakTags { limit } => commands::review::weak_tags(&ctx, limit),
        Commands::Stats => commands::review::stats(&ctx),
        Commands::Export { output } => commands::transfer::export(&ctx, output),
        Commands::Import { file } => commands::transfer::import(&ctx, file),
        Commands::Clear { yes } => commands::clear::execute(&ctx, yes),
        Commands::Init => commands::init::execute(),
    }
}
