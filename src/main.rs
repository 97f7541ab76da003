//! Plutoplay command line.
//!
//! Runs levels headless through the reference loop and inspects behavior and
//! animation data.
//!
//! # Running
//!
//! ```sh
//! plutoplay run level.json --script input.json --ticks 600
//! plutoplay behaviors
//! plutoplay transitions hero.json --state idle --horizontal 1
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use plutoplay::animation::export::AnimationExport;
use plutoplay::animation::transitions::{PhysicalState, TransitionInput};
use plutoplay::behaviors::registry::BehaviorRegistry;
use plutoplay::game::{HostSimulation, InputScript};
use plutoplay::level::Level;
use plutoplay::resources::gameconfig::GameConfig;

/// Plutoplay behavior runtime
#[derive(Parser)]
#[command(version, about = "Headless runner for 2D game builder levels and behaviors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a level headless and print a JSON summary.
    Run {
        level: PathBuf,
        /// JSON input script: `[{ "from": 1, "to": 30, "keys": ["ArrowRight"] }]`.
        #[arg(long)]
        script: Option<PathBuf>,
        #[arg(long, default_value_t = 600)]
        ticks: u64,
        /// Tick length in seconds; overrides the config file.
        #[arg(long)]
        dt: Option<f32>,
        /// INI file with physics, level and session settings.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the level with the final behavior records here.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the behavior catalog as JSON.
    Behaviors,
    /// Print the transitions currently true out of one state of an animation set.
    Transitions {
        animation: PathBuf,
        #[arg(long)]
        state: String,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        horizontal: f32,
        #[arg(long)]
        jump: bool,
        #[arg(long)]
        airborne: bool,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        velocity_y: f32,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run {
            level,
            script,
            ticks,
            dt,
            config,
            save,
        } => run(level, script, ticks, dt, config, save),
        Command::Behaviors => behaviors(),
        Command::Transitions {
            animation,
            state,
            horizontal,
            jump,
            airborne,
            velocity_y,
        } => transitions(
            animation,
            &state,
            TransitionInput {
                horizontal,
                jump_pressed: jump,
            },
            PhysicalState {
                grounded: !airborne,
                velocity_y,
            },
        ),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn run(
    level_path: PathBuf,
    script: Option<PathBuf>,
    ticks: u64,
    dt: Option<f32>,
    config_path: Option<PathBuf>,
    save: Option<PathBuf>,
) -> Result<(), String> {
    let mut config = match config_path {
        Some(path) => {
            let mut config = GameConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => GameConfig::new(),
    };
    if let Some(dt) = dt {
        config.dt = dt;
    }
    let level = Level::load(&level_path)?;
    let script = match script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };

    let mut sim = HostSimulation::new(level, config, Arc::new(BehaviorRegistry::with_builtin()));
    let ran = sim.run(&script, ticks);
    info!("Ran {} ticks, outcome {:?}", ran, sim.session().outcome);
    if let Some(path) = save {
        sim.save_level(path)?;
    }
    print_json(&sim.summary())
}

fn behaviors() -> Result<(), String> {
    let registry = BehaviorRegistry::with_builtin();
    print_json(&registry.all())
}

fn transitions(
    path: PathBuf,
    state: &str,
    input: TransitionInput,
    physical: PhysicalState,
) -> Result<(), String> {
    let export = AnimationExport::load(&path)?;
    for problem in export.validate() {
        warn!("{}", problem);
    }
    if export.state(state).is_none() {
        return Err(format!("animation set has no state '{}'", state));
    }
    let active = export.active_transitions(state, &input, &physical);
    print_json(&active.as_slice())
}
