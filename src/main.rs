//! # Warren Main Entry Point
//!
//! Parses the command line, builds the level and its inhabitants, and runs the
//! macroquad window loop.

use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;
use warren::{
    Camera, Game, GameConfig, GenerationConfig, Generator, GlyphRenderer, InputSource, Key,
    MacroquadInput, PlayState, PlayerController, RenderKind, RoomCorridorGenerator,
    TileMapRenderer, WarrenResult, World,
};
#[cfg(feature = "dev-tools")]
use tracing::Level;

/// Command line arguments for Warren.
#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "A small turn-based roguelike in a burrow full of animals")]
#[command(version)]
struct Args {
    /// Random seed for level generation and animal behaviour
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of animals to place
    #[arg(long)]
    animals: Option<u32>,

    /// Minimum delay between turn changes, in milliseconds
    #[arg(long)]
    turn_delay_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Warren")]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Warren v{}", warren::VERSION);

    if let Err(e) = run(&args).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp_millis()
            .init();
    }
}

/// Merges the configuration file and command line overrides.
fn load_config(args: &Args) -> WarrenResult<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(animals) = args.animals {
        config.animal_count = animals;
    }
    if let Some(delay) = args.turn_delay_ms {
        config.turn_delay_ms = delay;
    }

    config.validate()?;
    Ok(config)
}

/// Builds the world for a session: level, player and animals.
fn build_world(config: &GameConfig) -> WarrenResult<(World, warren::ObjectId)> {
    info!("Generating level with seed: {}", config.seed);
    let generation = GenerationConfig::from_game_config(config);
    let mut rng = warren::generation::utils::create_rng(&generation);
    let level = RoomCorridorGenerator::new().generate(&generation, &mut rng)?;

    let mut world = World::new(level, config.turn_delay())?;
    let mut animal_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let player = world.populate(
        PlayerController::new(Box::new(MacroquadInput::new())),
        config,
        &mut animal_rng,
    )?;

    let objects = world.manager_mut().objects_mut();
    objects.assign_renderer(RenderKind::Player, Box::new(GlyphRenderer::player()));
    objects.assign_renderer(RenderKind::Animal, Box::new(GlyphRenderer::animal()));
    objects.assign_renderer(RenderKind::Prop, Box::new(GlyphRenderer::prop()));

    Ok((world, player))
}

/// Main game loop implementation.
async fn run(args: &Args) -> WarrenResult<()> {
    let config = load_config(args)?;
    let (world, player) = build_world(&config)?;

    let columns = (screen_width() / config.tile_size) as i32;
    let rows = (screen_height() / config.tile_size) as i32;
    let camera = Camera::new(columns.max(1), rows.max(1), config.tile_size);

    let state = PlayState::new(world, player, camera)
        .with_level_renderer(Box::new(TileMapRenderer::default()));
    let mut game = Game::new(state);
    game.init()?;

    let keyboard = MacroquadInput::new();
    while game.is_running() {
        if keyboard.is_key_down(Key::Quit) {
            info!("Player quit the game");
            game.stop();
            break;
        }

        clear_background(BLACK);
        game.tick(Instant::now())?;
        next_frame().await;
    }

    game.destroy()?;
    info!("Game loop ended");
    Ok(())
}
