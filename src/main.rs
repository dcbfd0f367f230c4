//! Squares Battle launcher
//!
//! Loads a map, runs the simulation thread, feeds it stdin commands and draws
//! frames with the headless renderer.

use std::error::Error as _;
use std::io::BufRead;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use squares_battle::cli::{self, Command, LaunchOptions, MapSource};
use squares_battle::engine::{FrameSlot, LoopConfig, render_until_closed, spawn_simulation};
use squares_battle::input::{InputEvent, InputSender, input_channel};
use squares_battle::renderer::LogRenderer;
use squares_battle::sim::GameState;
use squares_battle::{LaunchError, Settings, maps, persistence};

/// Picked up from the working directory when `--settings` is not given
const DEFAULT_SETTINGS_FILE: &str = "squares-battle.json";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match cli::parse_args(&args) {
        Ok(Command::Version) => {
            println!("squares-battle {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(options)) => options,
        Err(e) => {
            init_logging(false);
            eprintln!("{}", cli::USAGE);
            return exit_with_error(&e, false);
        }
    };

    init_logging(options.debug);
    log::info!("Squares Battle {} starting...", env!("CARGO_PKG_VERSION"));

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_with_error(&e, options.debug),
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn exit_with_error(error: &LaunchError, debug: bool) -> ExitCode {
    eprintln!("{}", error.user_message());
    if debug {
        eprintln!("{}: {}", error.kind_name(), error);
        let mut source = error.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
    }
    ExitCode::FAILURE
}

fn run(options: &LaunchOptions) -> Result<(), LaunchError> {
    let settings = match &options.settings {
        Some(path) => Settings::load(path)?,
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            Settings::load_or_default(default_path.exists().then_some(default_path))
        }
    };
    settings.validate()?;

    let world = match &options.map {
        MapSource::Raw(name) => maps::raw_map(name)?,
        MapSource::File(path) => persistence::load_world(path)?,
    };
    log::info!(
        "World {}x{}: {} immovable, {} movable objects",
        world.field_size.x,
        world.field_size.y,
        world.immovable_objects.len(),
        world.movable_objects.len()
    );

    let state = GameState::new(world, settings.controls, settings.rng_seed);
    let (input_tx, input_rx) = input_channel(settings.input_queue_capacity);
    let slot = FrameSlot::new();

    spawn_stdin_reader(input_tx, Arc::clone(&slot), options.ticks.is_none());

    let config = LoopConfig::from_settings(&settings, options.ticks);
    let handle = spawn_simulation(state, input_rx, Arc::clone(&slot), config)
        .map_err(LaunchError::ThreadSpawn)?;

    let mut renderer = LogRenderer::default();
    let frames = render_until_closed(&slot, &mut renderer);

    let state = match handle.join() {
        Ok(result) => result?,
        Err(_) => return Err(LaunchError::SimulationPanicked),
    };
    log::info!(
        "Stopped after {} ticks, {} frames drawn",
        state.time_ticks(),
        frames
    );

    if let Some(path) = &options.save {
        persistence::save_world(&state.world, path)?;
    }

    Ok(())
}

/// Forward stdin commands to the simulation. Without a tick limit the end of
/// input also ends the game.
fn spawn_stdin_reader(tx: InputSender, slot: Arc<FrameSlot>, stop_at_eof: bool) {
    let spawned = thread::Builder::new()
        .name("stdin-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match InputEvent::parse(&line) {
                    Some(event) => {
                        if !tx.send(event) {
                            return;
                        }
                    }
                    None => log::warn!("Ignoring unknown input command: {}", line.trim()),
                }
            }
            log::debug!("End of input");
            if stop_at_eof {
                slot.close();
            }
        });

    // The game still runs without input
    if let Err(e) = spawned {
        log::warn!("Failed to start the input reader: {}", e);
    }
}
