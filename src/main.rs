//! # Delvegen Command Line
//!
//! Generates a single weapon, armour piece, enemy, player, room or map and
//! prints it as text or JSON.

use clap::{Parser, Subcommand};
use delvegen::{
    create_rng, fantasy_name, ArmourGenerator, ArmourMaterial, ArmourType, CombatClass,
    DelveResult, EnemyGenerator, EnemyType, GenerationConfig, Generator, Item, MapGenerator,
    PhonemePool, PlayerGenerator, RoomGenerator, SaveData, Size, WeaponGenerator, WeaponType,
};
use log::{error, info};
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for Delvegen.
#[derive(Parser, Debug)]
#[command(name = "delvegen")]
#[command(about = "Procedural weapons, armour, enemies, rooms and dungeon maps")]
#[command(version)]
struct Args {
    /// Random seed, overrides the seed in the config file
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// JSON file with generation settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forge a weapon
    Weapon {
        #[arg(short, long)]
        rarity: Option<f64>,
        #[arg(short = 't', long = "type")]
        weapon_type: Option<WeaponType>,
    },
    /// Forge a piece of armour
    Armour {
        #[arg(short, long)]
        rarity: Option<f64>,
        #[arg(short = 't', long = "type")]
        armour_type: Option<ArmourType>,
        #[arg(short, long)]
        material: Option<ArmourMaterial>,
    },
    /// Spawn an enemy
    Enemy {
        #[arg(short, long)]
        level: Option<f64>,
        #[arg(short = 't', long = "type")]
        enemy_type: Option<EnemyType>,
        #[arg(long = "class")]
        enemy_class: Option<CombatClass>,
    },
    /// Create a level one player
    Player {
        #[arg(long = "class")]
        player_class: CombatClass,
        /// Random name when omitted
        #[arg(short, long)]
        name: Option<String>,
        /// Add the player to this save file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Generate a single room
    Room {
        #[arg(short, long)]
        level: Option<f64>,
        #[arg(long, requires = "height")]
        width: Option<i32>,
        #[arg(long, requires = "width")]
        height: Option<i32>,
        #[arg(long)]
        enemy_budget: Option<f64>,
        #[arg(long)]
        loot_budget: Option<f64>,
    },
    /// Grow a map of connected rooms
    Map {
        #[arg(short, long, default_value_t = 10)]
        rooms: usize,
        #[arg(long)]
        connectivity: Option<f64>,
        #[arg(long)]
        start_level: Option<u32>,
        #[arg(long)]
        level_step: Option<u32>,
        /// Also print a text preview of the layout
        #[arg(long)]
        ascii: bool,
        /// Store the rooms in this save file
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Sets the default log filter. `RUST_LOG` takes precedence.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

fn load_config(args: &Args) -> DelveResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn emit<T: Display + Serialize>(value: &T, json: bool) -> DelveResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn run(args: &Args) -> DelveResult<()> {
    let config = load_config(args)?;
    let mut rng = create_rng(config.seed);
    info!("Starting Delvegen v{} with seed {}", delvegen::VERSION, config.seed);

    match &args.command {
        Command::Weapon { rarity, weapon_type } => {
            let mut generator = WeaponGenerator::new();
            generator.rarity = *rarity;
            generator.weapon_type = *weapon_type;
            let weapon = generate_checked(&generator, &config, &mut rng)?;
            emit(&Item::from(weapon), args.json)
        }
        Command::Armour {
            rarity,
            armour_type,
            material,
        } => {
            let mut generator = ArmourGenerator::new();
            generator.rarity = *rarity;
            generator.armour_type = *armour_type;
            generator.material = *material;
            let armour = generate_checked(&generator, &config, &mut rng)?;
            emit(&Item::from(armour), args.json)
        }
        Command::Enemy {
            level,
            enemy_type,
            enemy_class,
        } => {
            let generator = EnemyGenerator {
                level: *level,
                enemy_type: *enemy_type,
                enemy_class: *enemy_class,
            };
            emit(&generate_checked(&generator, &config, &mut rng)?, args.json)
        }
        Command::Player {
            player_class,
            name,
            save,
        } => {
            let name = match name {
                Some(name) => name.clone(),
                None => {
                    let pool = match player_class {
                        CombatClass::Samurai => PhonemePool::JAPANESE,
                        _ => PhonemePool::DEFAULT,
                    };
                    fantasy_name(&mut rng, 2, &pool)
                }
            };
            let generator = PlayerGenerator::new(name, *player_class);
            let player = generate_checked(&generator, &config, &mut rng)?;
            emit(&player, args.json)?;

            if let Some(path) = save {
                let mut data = SaveData::load(path)?;
                data.add_player(player)?;
                data.save(path)?;
            }
            Ok(())
        }
        Command::Room {
            level,
            width,
            height,
            enemy_budget,
            loot_budget,
        } => {
            let generator = RoomGenerator {
                level: *level,
                size: width.zip(*height).map(|(w, h)| Size::new(w, h)),
                enemy_budget: *enemy_budget,
                loot_budget: *loot_budget,
                ..RoomGenerator::default()
            };
            emit(&generate_checked(&generator, &config, &mut rng)?, args.json)
        }
        Command::Map {
            rooms,
            connectivity,
            start_level,
            level_step,
            ascii,
            save,
        } => {
            let generator = MapGenerator {
                room_count: *rooms,
                connectivity: *connectivity,
                biome: None,
                start_level: *start_level,
                level_step: *level_step,
            };
            let map = generate_checked(&generator, &config, &mut rng)?;
            emit(&map, args.json)?;
            if *ascii {
                println!("{}", map.to_ascii());
            }

            if let Some(path) = save {
                let mut data = SaveData::load(path)?;
                data.rooms = map.rooms;
                data.save(path)?;
            }
            Ok(())
        }
    }
}

/// Runs a generator and its validation.
fn generate_checked<T, G: Generator<T>>(
    generator: &G,
    config: &GenerationConfig,
    rng: &mut StdRng,
) -> DelveResult<T> {
    let value = generator.generate(config, rng)?;
    generator.validate(&value, config)?;
    info!("{} finished", generator.generator_type());
    Ok(value)
}
