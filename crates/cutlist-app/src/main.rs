//! cutlist - text-file video editing with ffmpeg
//!
//! Entry point. The playlist file is the project: mark trims here or in a text
//! editor, then plan or render.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cutlist_core::{format_seconds, parse_position, ConfigOverrides, ProjectConfig};
use cutlist_media::{
    build_render_plan, ExecuteOptions, PlanExecutor, RenderCancel, RenderProgress,
};
use cutlist_timeline::{ClipEntry, EditSession, Playlist, PlaylistStore};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cutlist")]
#[command(about = "Trim and concatenate clips from a plain-text playlist")]
#[command(version)]
struct Cli {
    /// Project directory containing the clips and the playlist
    #[arg(short, long, default_value = ".", env = "CUTLIST_PROJECT")]
    project: PathBuf,

    #[command(flatten)]
    overrides: OverrideArgs,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct OverrideArgs {
    /// Playlist file (relative to the project directory)
    #[arg(long, global = true)]
    playlist: Option<PathBuf>,

    /// Directory for trimmed clips
    #[arg(long, global = true)]
    trimmed_dir: Option<PathBuf>,

    /// Final output file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, global = true, env = "CUTLIST_FFMPEG")]
    ffmpeg: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a playlist with one unmarked entry per file
    Init {
        /// Source files, relative to the project directory
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Print the playlist
    List {
        /// Entry to mark as current
        #[arg(long)]
        current: Option<usize>,
    },
    /// Print one entry
    Show { index: usize },
    /// Print the entry after an index, wrapping at the end
    Next {
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Print the entry before an index, wrapping at the start
    Prev {
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Set an entry's in point (e.g. 1.5, 1500ms, 01:02.5)
    SetIn { index: usize, position: String },
    /// Set an entry's out point
    SetOut { index: usize, position: String },
    /// Build the render plan
    Plan {
        /// Write the manifest and render script
        #[arg(long)]
        write: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the render plan and run it with ffmpeg
    Render {
        /// Step to start from, to resume a failed render
        #[arg(long, default_value_t = 0)]
        resume_from: usize,
        /// Skip trims whose output already exists
        #[arg(long)]
        skip_existing: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ProjectConfig::load(&cli.project)
        .with_context(|| format!("Failed to load config for {}", cli.project.display()))?;
    config.apply(ConfigOverrides {
        playlist_file: cli.overrides.playlist,
        trimmed_dir: cli.overrides.trimmed_dir,
        output_file: cli.overrides.output,
        ffmpeg_binary: cli.overrides.ffmpeg,
        ..Default::default()
    });
    info!(project = %config.media_dir.display(), "cutlist starting");

    match cli.command {
        Commands::Init { files } => init(&config, files),
        Commands::List { current } => {
            let session = EditSession::from_config(&config)?;
            print!("{}", session.playlist().listing(current));
            Ok(())
        }
        Commands::Show { index } => {
            let mut session = EditSession::from_config(&config)?;
            print_entry(index, &session.entry(index)?);
            println!("{}", session.source_path(index)?.display());
            Ok(())
        }
        Commands::Next { from } => navigate(&config, from, true),
        Commands::Prev { from } => navigate(&config, from, false),
        Commands::SetIn { index, position } => {
            let ns = parse_position(&position)?;
            EditSession::from_config(&config)?.set_in_point(index, ns)?;
            println!("IN  {index} {}", format_seconds(ns));
            Ok(())
        }
        Commands::SetOut { index, position } => {
            let ns = parse_position(&position)?;
            EditSession::from_config(&config)?.set_out_point(index, ns)?;
            println!("OUT {index} {}", format_seconds(ns));
            Ok(())
        }
        Commands::Plan { write, json } => plan(&config, write, json),
        Commands::Render {
            resume_from,
            skip_existing,
        } => render(&config, resume_from, skip_existing),
    }
}

fn init(config: &ProjectConfig, files: Vec<String>) -> Result<()> {
    let entries = files
        .into_iter()
        .map(ClipEntry::unmarked)
        .collect::<cutlist_core::Result<Vec<_>>>()?;
    let playlist = Playlist::from_entries(entries);
    let store = PlaylistStore::new(config.playlist_path());
    store
        .create(&playlist)
        .with_context(|| format!("Failed to create {}", store.path().display()))?;
    println!("Created {} with {} entries", store.path().display(), playlist.len());
    Ok(())
}

fn navigate(config: &ProjectConfig, from: usize, forward: bool) -> Result<()> {
    let mut session = EditSession::from_config(config)?;
    session.seek_to(from)?;
    let entry = if forward {
        session.next()?
    } else {
        session.prev()?
    };
    print_entry(session.current_index(), &entry);
    Ok(())
}

fn plan(config: &ProjectConfig, write: bool, json: bool) -> Result<()> {
    let mut session = EditSession::from_config(config)?;
    let plan = build_render_plan(&mut session, config).context("Failed to build render plan")?;

    if json {
        println!("{}", plan.to_json()?);
    } else {
        print!(
            "{}",
            cutlist_media::ffmpeg::render_script(&plan, &config.ffmpeg_binary)
        );
    }

    if write {
        plan.write_files(&config.script_path(), &config.ffmpeg_binary)?;
        info!(
            script = %config.script_path().display(),
            manifest = %config.manifest_path().display(),
            "Render files written"
        );
    }
    Ok(())
}

fn render(config: &ProjectConfig, resume_from: usize, skip_existing: bool) -> Result<()> {
    let mut session = EditSession::from_config(config)?;
    let plan = build_render_plan(&mut session, config).context("Failed to build render plan")?;

    let executor = PlanExecutor::new(&config.ffmpeg_binary).with_options(ExecuteOptions {
        resume_from,
        skip_existing,
    });
    let summary = executor.execute(&plan, report_progress, &RenderCancel::new())?;

    println!(
        "Rendered {} ({} steps run, {} skipped, {}s total)",
        plan.concat.output_path.display(),
        summary.ran,
        summary.skipped,
        format_seconds(plan.total_duration_ns())
    );
    Ok(())
}

fn report_progress(progress: RenderProgress) {
    info!(
        step = progress.step + 1,
        of = progress.total_steps,
        skipped = progress.skipped,
        output = %progress.output.display(),
        "{:.0}%",
        progress.fraction() * 100.0
    );
}

fn print_entry(index: usize, entry: &ClipEntry) {
    println!(
        "{index}  in {}  out {}  {}",
        format_seconds(entry.in_point),
        format_seconds(entry.out_point),
        entry.source_path
    );
}
