//! Headless tilescope driver.
//!
//! Usage examples:
//!   tilescope-app --image atlas.png export --output atlas_export.png
//!   tilescope-app --image atlas.png snapshot --output view.png --search 2304
//!   tilescope-app lookup 512
//!   tilescope-app --config settings.json replay events.json

mod store;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tilescope::export::{ChannelObserver, ExportOutcome, ExportSignal};
use tilescope::traits::ImageStore;
use tilescope::{Action, InputEvent, InputHandler, TileCoord, TileScope, TileScopeConfig};

use crate::store::FileImageStore;

#[derive(Parser, Debug)]
#[command(name = "tilescope-app", about = "Inspect and export a tile atlas without a window")]
struct CliArgs {
    /// Atlas image; the placeholder gradient is used when omitted
    #[arg(short, long, value_name = "FILE")]
    image: Option<PathBuf>,

    /// Viewer settings as JSON; missing fields take their defaults
    #[arg(short, long, value_name = "FILE.json")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full atlas with overlay, grid and numbers
    Export {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long)]
        no_grid: bool,
        #[arg(long)]
        no_numbers: bool,
        #[arg(long)]
        no_overlay: bool,
    },
    /// Render one frame of the viewer
    Snapshot {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long)]
        zoom: Option<f64>,
        /// Select and center a tile ID first
        #[arg(long)]
        search: Option<i64>,
        #[arg(long, default_value_t = 1000.0)]
        width: f64,
        #[arg(long, default_value_t = 700.0)]
        height: f64,
    },
    /// Print the position of a tile ID
    Lookup { id: i64 },
    /// Replay a JSON array of input events, then print the selection
    Replay {
        #[arg(value_name = "EVENTS.json")]
        events: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TileScopeConfig::default(),
    };
    let mut scope = open_scope(config, args.image.as_deref(), &FileImageStore);

    match args.command {
        Command::Export {
            output,
            no_grid,
            no_numbers,
            no_overlay,
        } => {
            if no_grid {
                scope.toggle_grid();
            }
            if no_numbers {
                scope.toggle_numbers();
            }
            if no_overlay {
                scope.toggle_overlay();
            }
            run_export(scope, output).await
        }
        Command::Snapshot {
            output,
            zoom,
            search,
            width,
            height,
        } => {
            scope.resize(width, height);
            if let Some(zoom) = zoom {
                scope.viewport_mut().set_zoom(zoom);
            }
            if let Some(id) = search {
                scope.search_and_select(id)?;
            }
            let frame = scope.render_frame();
            frame
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            log::info!(
                "snapshot {}x{} at zoom {:.3} written to {}",
                frame.width(),
                frame.height(),
                scope.effective_zoom(),
                output.display()
            );
            Ok(())
        }
        Command::Lookup { id } => {
            let Some(coord) = scope.grid().tile_from_id(id) else {
                bail!("tile ID {} not found", id);
            };
            print_tile(&scope, coord);
            Ok(())
        }
        Command::Replay { events } => replay(&mut scope, &events),
    }
}

/// Builds the session; an unreadable atlas leaves the placeholder in place
fn open_scope(config: TileScopeConfig, image: Option<&Path>, store: &dyn ImageStore) -> TileScope {
    let mut scope = TileScope::new(config);
    if let Some(path) = image {
        if let Err(err) = scope.load_image_from(path, store) {
            log::error!("loading {}: {}, continuing with the placeholder", path.display(), err);
        }
    }
    scope
}

fn load_config(path: &Path) -> Result<TileScopeConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn print_tile(scope: &TileScope, coord: TileCoord) {
    let (x, y) = scope.grid().tile_origin(coord);
    println!(
        "ID: {}\tPos: {}\tPixel: ({}, {})",
        scope.grid().tile_id(coord),
        coord,
        x,
        y
    );
}

/// Runs the export on a blocking thread; Ctrl+C cancels it between tiles
async fn run_export(mut scope: TileScope, output: PathBuf) -> Result<()> {
    let (mut observer, progress, cancel) = ChannelObserver::new();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, cancelling export");
            let _ = cancel.send(ExportSignal::Cancel);
        }
    });

    let reporter = tokio::task::spawn_blocking(move || {
        // ends once the observer is dropped
        for update in progress.iter() {
            log::info!("export {:>5.1}%", update.fraction() * 100.0);
        }
    });

    let outcome = tokio::task::spawn_blocking(move || {
        let outcome = scope.export_to(&output, &FileImageStore, &mut observer);
        drop(observer);
        outcome.map(|outcome| (outcome, output))
    })
    .await??;
    reporter.await?;

    match outcome {
        (ExportOutcome::Completed(image), path) => {
            println!(
                "exported {}x{} atlas to {}",
                image.width(),
                image.height(),
                path.display()
            );
        }
        (ExportOutcome::Cancelled { processed }, _) => {
            println!("export cancelled after {} tiles, nothing written", processed);
        }
    }
    Ok(())
}

fn replay(scope: &mut TileScope, events: &Path) -> Result<()> {
    let text = std::fs::read_to_string(events)
        .with_context(|| format!("reading {}", events.display()))?;
    let events: Vec<InputEvent> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", events.display()))?;

    let mut handler = InputHandler::new();
    for event in events {
        handler.queue_event(event);
    }

    for action in handler.process_queued_events(scope) {
        match action {
            Action::CopyIds => {
                if let Some(ids) = scope.copy_ids_text() {
                    println!("{}", ids);
                }
            }
            Action::Quit => break,
            other => log::warn!("{:?} needs an interactive session, skipped", other),
        }
    }

    let mut ids = scope.selection().sorted_ids(scope.grid());
    ids.dedup();
    for id in ids {
        if let Some(coord) = scope.grid().tile_from_id(id as i64) {
            print_tile(scope, coord);
        }
    }
    if let Some(message) = scope.status().latest() {
        println!("status: {}", message.text);
    }
    Ok(())
}
