//! anemone - infinite gallery world generation and asset resolution
//!
//! Command-line host for the chunk, locate, zone and resolve queries.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anemone_resolve::{
    MemoryOverrideStore, ResolveResponse, Resolver, SystemClock, TelegramProvider,
};
use anemone_world::{survey_zones, ChunkGenerator, ChunkQuery, LocateQuery};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{AnemoneConfig, DEFAULT_CONFIG_PATH};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Infinite gallery world generation and asset resolution", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one chunk and print its items
    Chunk {
        /// World seed (usually the collection id)
        #[arg(long)]
        seed: String,
        #[arg(long, allow_hyphen_values = true)]
        x: i64,
        #[arg(long, allow_hyphen_values = true)]
        y: i64,
        #[arg(long, allow_hyphen_values = true)]
        z: i64,
        /// Content pool size
        #[arg(long)]
        max_id: Option<i64>,
    },
    /// Find the world position of a content id near an observer
    Locate {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        post_id: i64,
        /// Observer position as `x,y,z` in world units
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true, default_value = "0,0,0")]
        observer: [f64; 3],
        #[arg(long)]
        max_id: Option<i64>,
        /// Shell budget
        #[arg(long)]
        radius: Option<i64>,
    },
    /// Print the core/periphery classification per distance ring
    Zones {
        #[arg(long)]
        max_id: Option<u32>,
        #[arg(long, default_value_t = 24)]
        radius: u32,
    },
    /// Resolve a content id into a renderable image
    Resolve {
        /// Source collection, `@username` or `-100…` id
        #[arg(long, allow_hyphen_values = true)]
        collection: String,
        #[arg(long)]
        post_id: u32,
        /// JSON override records for persistent collections
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn parse_point(raw: &str) -> Result<[f64; 3], String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid coordinate in {raw:?}: {err}"))?;
    <[f64; 3]>::try_from(parts).map_err(|_| format!("expected x,y,z, got {raw:?}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting anemone v{}", env!("CARGO_PKG_VERSION"));
    let config = AnemoneConfig::load_from_path(&cli.config);

    match cli.command {
        Command::Chunk {
            seed,
            x,
            y,
            z,
            max_id,
        } => {
            let generator = ChunkGenerator::new(config.world)?;
            print_json(&generator.handle_chunk_query(&ChunkQuery {
                world_seed: seed,
                cx: x,
                cy: y,
                cz: z,
                max_content_id: max_id,
            }))
        }
        Command::Locate {
            seed,
            post_id,
            observer: [x, y, z],
            max_id,
            radius,
        } => {
            let generator = ChunkGenerator::new(config.world)?;
            print_json(&generator.handle_locate_query(&LocateQuery {
                world_seed: seed,
                post_id,
                x,
                y,
                z,
                max_content_id: max_id,
                radius,
            }))
        }
        Command::Zones { max_id, radius } => {
            let pool = max_id.unwrap_or(config.world.default_max_content_id);
            let rings = survey_zones(pool, radius, config.world.density_factor)?;
            println!("{:>8}  {:<9}  ids", "distance", "zone");
            for ring in rings {
                let zone = if ring.zone.is_core { "core" } else { "periphery" };
                println!(
                    "{:>8}  {:<9}  {}..={}",
                    ring.distance, zone, ring.zone.id_lower, ring.zone.id_upper
                );
            }
            Ok(())
        }
        Command::Resolve {
            collection,
            post_id,
            store,
        } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(resolve(config, collection, post_id, store))
        }
    }
}

async fn resolve(
    config: AnemoneConfig,
    collection: String,
    post_id: u32,
    store: Option<PathBuf>,
) -> Result<()> {
    let provider = TelegramProvider::new(&config.telegram, config.resolver.call_timeout())
        .context("telegram provider is not configured")?;
    let mut resolver = Resolver::new(config.resolver, Arc::new(provider), Arc::new(SystemClock));
    if let Some(path) = store {
        let store = MemoryOverrideStore::load_json(&path)
            .with_context(|| format!("failed to load override store {}", path.display()))?;
        info!(records = store.len(), "loaded override store");
        resolver = resolver.with_store(Arc::new(store));
    }

    let resolution = resolver.resolve(&collection, post_id).await;
    print_json(&ResolveResponse::from_resolution(post_id, resolution))
}
