// Command-line entry point for Calltrail.

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calltrail::application::{untrack, TrackUsecase};
use calltrail::domain::store::SledStateStore;
use calltrail::domain::symbol::Position;
use calltrail::domain::tracker::FunctionTracker;
use calltrail::infrastructure::{
    init_scan_pool, Config, FileDocumentSource, FunctionIndex, ProjectLoader,
    SubstringEdgeResolver, SynOutlineProvider,
};
use calltrail::ports::dot::DotExporter;
use calltrail::ports::outline::render_outline;
use calltrail::ports::tree_view::render_tree;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace root the tracked functions belong to
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// State directory override (default: .calltrail under the workspace)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start tracking the function at a position, or one picked by name
    Track {
        /// Source file containing the function
        #[arg(long, requires = "line")]
        file: Option<PathBuf>,

        /// Line the caret is on (0-based)
        #[arg(long, requires = "file")]
        line: Option<usize>,

        /// Column the caret is on (0-based)
        #[arg(long, default_value_t = 0)]
        column: usize,

        /// Bare function name, resolved through the workspace index
        #[arg(long, conflicts_with_all = ["file", "line"])]
        name: Option<String>,
    },

    /// Stop tracking a function; the most recent one when no name is given
    Untrack { name: Option<String> },

    /// Forget all tracked functions
    Clear,

    /// List tracked functions with their call edges
    List,

    /// Render the call tree expanded from the root functions
    Tree,

    /// Render the indented caller-first outline
    Outline,

    /// Export the call graph as Graphviz DOT
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.workspace)?;
    let state_dir = cli
        .state_dir
        .clone()
        .unwrap_or_else(|| config.state_dir(&cli.workspace));

    let resolver = SubstringEdgeResolver;
    let store = SledStateStore::open(&state_dir)?;
    let mut tracker = FunctionTracker::restore(Box::new(store), &resolver);

    match cli.command {
        Command::Track {
            file,
            line,
            column,
            name,
        } => {
            let symbols = SynOutlineProvider;
            let documents = match config.mmap_threshold {
                Some(threshold) => FileDocumentSource::with_mmap_threshold(threshold),
                None => FileDocumentSource::new(),
            };
            let usecase = TrackUsecase {
                symbols: &symbols,
                documents: &documents,
                resolver: &resolver,
            };

            let tracked = match (file, line, name) {
                (Some(file), Some(line), None) => {
                    usecase.track_at(&mut tracker, &file, Position::new(line, column))?
                }
                (None, None, Some(name)) => {
                    if let Err(err) = init_scan_pool(config.scan_workers) {
                        debug!("scan pool already initialized: {err}");
                    }
                    let index = FunctionIndex::build(&load_sources(&cli.workspace)?);
                    usecase.track_by_name(&mut tracker, &index, &name)?
                }
                _ => bail!("provide either --file and --line, or --name"),
            };
            println!("tracking {tracked} ({} functions)", tracker.len());
        }
        Command::Untrack { name } => {
            if untrack(&mut tracker, name.as_deref()) {
                println!("{} functions remain", tracker.len());
            } else {
                println!("nothing to untrack");
            }
        }
        Command::Clear => {
            tracker.clear();
            println!("cleared");
        }
        Command::List => {
            for node in tracker.nodes() {
                let marker = if node.highlight { " *" } else { "" };
                println!(
                    "{}{marker}  [{} callers, {} callees]",
                    node.display_name(),
                    node.incoming.len(),
                    node.outgoing.len()
                );
            }
            let partition = tracker.recursion_groups();
            for cycle in partition.cycles() {
                let members: Vec<String> = cycle
                    .iter()
                    .map(|&i| tracker.nodes()[i].display_name())
                    .collect();
                println!("recursion: {}", members.join(" <-> "));
            }
        }
        Command::Tree => print!("{}", render_tree(&mut tracker)),
        Command::Outline => print!("{}", render_outline(&mut tracker)),
        Command::Export { output } => {
            DotExporter::export(&tracker, &output)?;
            println!("wrote {}", output.display());
        }
    }

    Ok(())
}

fn load_sources(
    workspace: &std::path::Path,
) -> anyhow::Result<Vec<calltrail::infrastructure::SourceFile>> {
    let manifest = workspace.join("Cargo.toml");
    let sources = if manifest.exists() {
        ProjectLoader::load_workspace(&manifest)?
    } else {
        ProjectLoader::load_folder(workspace)?
    };
    Ok(sources)
}
