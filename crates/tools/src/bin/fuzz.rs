use anyhow::{Result, bail};
use cavegen::{
    FillPercent, GeneratedRoom, GenerationConfig, GenerationError, RoomGenerator, SeedSource,
    TileKind,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn check_invariants(room: &GeneratedRoom) -> Result<(), String> {
    let grid = &room.grid;
    let (width, height) = (grid.width(), grid.height());
    for x in 0..width {
        for y in [0, height - 1] {
            if grid.tile(x, y) != TileKind::Wall {
                return Err(format!("border opened at ({x}, {y})"));
            }
        }
    }
    for y in 0..height {
        for x in [0, width - 1] {
            if grid.tile(x, y) != TileKind::Wall {
                return Err(format!("border opened at ({x}, {y})"));
            }
        }
    }
    if !room.graph.all_accessible() || !room.graph.is_single_component() {
        return Err(format!("{} rooms unreachable from main", room.graph.inaccessible_count()));
    }
    for outline in &room.mesh.outlines {
        for (a, b) in outline.segments() {
            let shared = room.mesh.edge_share_count(a, b);
            if shared != 1 {
                return Err(format!("outline edge {a}-{b} shared by {shared} triangles"));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut skipped = 0;

    for run in 0..args.runs {
        let config = GenerationConfig {
            width: 30 + (rng.next_u32() % 90) as usize,
            height: 30 + (rng.next_u32() % 90) as usize,
            smooth_iterations: 1 + (rng.next_u32() % 6) as usize,
            hall_radius: rng.next_u32() % 3,
            fill: FillPercent::Random,
            seed: SeedSource::Explicit(format!("fuzz-{}", rng.next_u64())),
            ..Default::default()
        };
        let label = format!("run {run} ({}x{}, seed {:?})", config.width, config.height, config.seed);

        let room = match RoomGenerator::new(config)?.generate() {
            Ok(room) => room,
            Err(GenerationError::NoRooms { .. }) => {
                skipped += 1;
                continue;
            }
            Err(error) => bail!("{label}: generation failed: {error}"),
        };
        if let Err(message) = check_invariants(&room) {
            bail!("Invariant failed on {label}: {message}");
        }
    }

    println!("All {} runs passed ({skipped} produced no rooms).", args.runs);
    Ok(())
}
