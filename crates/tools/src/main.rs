use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cavegen::{
    FillPercent, GeneratedRoom, GeneratedWorld, MarkerKind, RoomGenerator, SeedSource, Settings,
    WorldGenerator,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single room and print it as ASCII
    Room {
        #[command(flatten)]
        common: CommonArgs,
        /// Skip printing the ASCII map
        #[arg(long)]
        no_map: bool,
    },
    /// Generate a lattice of connected rooms
    World {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        world_width: Option<usize>,
        #[arg(long)]
        world_height: Option<usize>,
    },
}

#[derive(ClapArgs)]
struct CommonArgs {
    /// Line-oriented settings file (`key value` per line)
    #[arg(short = 'c', long)]
    settings: Option<PathBuf>,
    /// Seed string; overrides the settings file
    #[arg(short, long)]
    seed: Option<String>,
    /// Room width in tiles
    #[arg(long)]
    width: Option<usize>,
    /// Room height in tiles
    #[arg(long)]
    height: Option<usize>,
    /// Fill percentage, clamped into the configured band
    #[arg(long)]
    fill: Option<u8>,
    /// Write the full result as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

impl CommonArgs {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let loaded = Settings::load(path)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
                for warning in &loaded.warnings {
                    eprintln!("warning: {}:{}: {}", path.display(), warning.line, warning.message);
                }
                loaded.settings
            }
            None => Settings::default(),
        };
        if let Some(seed) = &self.seed {
            settings.room.seed = SeedSource::Explicit(seed.clone());
        }
        if let Some(width) = self.width {
            settings.room.width = width;
        }
        if let Some(height) = self.height {
            settings.room.height = height;
        }
        if let Some(fill) = self.fill {
            settings.room.fill = FillPercent::Explicit(fill);
        }
        Ok(settings)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    log::debug!("writing {} bytes of JSON to {}", json.len(), path.display());
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn print_room(room: &GeneratedRoom) {
    println!("Seed: {:?}", room.seed);
    println!("Fill: {}%", room.fill_percent);
    println!(
        "Pruned: {} wall regions ({} tiles), {} floor regions ({} tiles)",
        room.pruning.wall_regions,
        room.pruning.wall_tiles,
        room.pruning.floor_regions,
        room.pruning.floor_tiles
    );
    println!("Rooms: {}  Corridors: {}", room.graph.len(), room.passages.len());
    println!(
        "Mesh: {} vertices, {} triangles, {} outlines",
        room.mesh.vertices.len(),
        room.mesh.triangles.len(),
        room.mesh.outlines.len()
    );
    for marker in &room.markers {
        let label = match marker.kind {
            MarkerKind::Spawn => "spawn".to_string(),
            MarkerKind::Goal { value } => format!("goal {value}"),
        };
        println!("  {label} at ({}, {})", marker.tile.x, marker.tile.y);
    }
    println!("Fingerprint: {:016x}", room.fingerprint());
}

fn print_world(world: &GeneratedWorld) {
    println!("Seed: {:?}", world.seed);
    println!("World: {}x{} rooms, {} links", world.width, world.height, world.links.len());
    println!("End goal room: ({}, {})", world.end_goal.x, world.end_goal.z);
    for room in &world.rooms {
        println!(
            "  ({}, {}) rooms={} doorways={} markers={} fingerprint={:016x}",
            room.cell.x,
            room.cell.z,
            room.room.graph.len(),
            room.doorways.len(),
            room.room.markers.len(),
            room.room.fingerprint()
        );
    }
    println!("Fingerprint: {:016x}", world.fingerprint());
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Room { common, no_map } => {
            let settings = common.settings()?;
            let room = RoomGenerator::new(settings.room)
                .and_then(|generator| generator.generate())
                .context("Room generation failed")?;
            if !no_map {
                print!("{}", room.grid.to_ascii());
            }
            print_room(&room);
            if let Some(path) = &common.json {
                write_json(path, &room)?;
            }
        }
        Command::World { common, world_width, world_height } => {
            let mut settings = common.settings()?;
            if let Some(width) = world_width {
                settings.world_width = width;
            }
            if let Some(height) = world_height {
                settings.world_height = height;
            }
            let world = WorldGenerator::new(settings)
                .and_then(|generator| generator.generate())
                .context("World generation failed")?;
            print_world(&world);
            if let Some(path) = &common.json {
                write_json(path, &world)?;
            }
        }
    }

    Ok(())
}
