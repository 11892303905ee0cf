//! Armature arm model CLI.
//!
//! Provides three modes of operation:
//! - `headless`: drive the rig from scripted tracking and print the pose
//! - `config`: print the default rig config, or validate a rig file
//! - `info`: print workspace crate versions
//!
//! # Usage
//!
//! ```bash
//! # Alternate between postures every 1.5 s for 10 s at 72 Hz
//! armature headless --frames 720 --switch-every 1.5
//!
//! # Custom rig, left hand, verbose logging
//! armature --log-level debug headless --config rig.toml --left-handed
//!
//! # Write out the default rig, then check an edited copy
//! armature config > rig.toml
//! armature config --check rig.toml
//! ```

use std::path::PathBuf;

use bevy::prelude::*;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use armature_core::prelude::*;
use armature_model::{ArmModelPlugin, ArmRegistry, LimbConfig, LimbLayout};
use armature_tracking::prelude::*;
use armature_transition::{
    ArmTransitionPlugin, BlendedArmPose, TransitionRequests, install_rig,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Arm model and posture crossfading for tracked controllers.
#[derive(Parser, Debug)]
#[command(name = "armature")]
#[command(version, about)]
struct Cli {
    /// Logging verbosity level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the rig against scripted tracking and print poses.
    Headless {
        /// Number of frames to run.
        #[arg(short = 'n', long, default_value_t = 360)]
        frames: u32,

        /// Fixed frame step in seconds.
        #[arg(long, default_value_t = 1.0 / 72.0)]
        dt: f32,

        /// Rig file (TOML). Uses the built-in point/throw rig when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seconds between posture switches; 0 disables switching.
        #[arg(short, long, default_value_t = 1.5)]
        switch_every: f32,

        /// Print the pose every N frames.
        #[arg(short, long, default_value_t = 36)]
        report_every: u32,

        /// Solve for the left hand.
        #[arg(long)]
        left_handed: bool,
    },

    /// Print the default rig config, or validate a rig file.
    Config {
        /// Rig file to validate instead of printing the default.
        #[arg(long)]
        check: Option<PathBuf>,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

struct HeadlessRun {
    frames: u32,
    dt: f32,
    config: Option<PathBuf>,
    switch_every: f32,
    report_every: u32,
    left_handed: bool,
}

impl Default for HeadlessRun {
    fn default() -> Self {
        Self {
            frames: 360,
            dt: 1.0 / 72.0,
            config: None,
            switch_every: 1.5,
            report_every: 36,
            left_handed: false,
        }
    }
}

fn build_app(rig: &RigConfig, dt: f32, left_handed: bool) -> anyhow::Result<App> {
    let mut app = App::new();
    app.add_plugins(ArmatureCorePlugin)
        .add_plugins(ArmatureTrackingPlugin)
        .add_plugins(ArmModelPlugin)
        .add_plugins(ArmTransitionPlugin)
        .insert_resource(FrameClock::fixed(dt))
        .insert_resource(HandednessSwitch {
            is_left_handed: left_handed,
        })
        .insert_resource(ActiveTrackingSource::new(ScriptedTracking::default()));
    install_rig(app.world_mut(), rig)?;
    app.finish();
    app.cleanup();
    Ok(app)
}

fn arm_names(registry: &ArmRegistry) -> Vec<String> {
    registry
        .ids()
        .into_iter()
        .filter_map(|id| registry.name(id).map(str::to_owned))
        .collect()
}

fn fmt_vec(v: &nalgebra::Vector3<f32>) -> String {
    format!("({:+.3}, {:+.3}, {:+.3})", v.x, v.y, v.z)
}

fn report(frame: u32, app: &App) {
    let registry = app.world().resource::<ArmRegistry>();
    let blended = app.world().resource::<BlendedArmPose>();
    let name = blended
        .current
        .and_then(|id| registry.name(id))
        .unwrap_or("-");
    println!(
        "frame {frame:>5}  arm={name:<8} blending={:<5} elbow={} wrist={} controller={}",
        blended.transitioning,
        fmt_vec(&blended.pose.elbow.position),
        fmt_vec(&blended.pose.wrist.position),
        fmt_vec(&blended.pose.controller.position),
    );
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run_headless(run: &HeadlessRun) -> anyhow::Result<()> {
    anyhow::ensure!(run.dt > 0.0, "frame step must be positive, got {}", run.dt);

    let rig = match &run.config {
        Some(path) => RigConfig::from_file(path)?,
        None => RigConfig::default(),
    };
    let mut app = build_app(&rig, run.dt, run.left_handed)?;

    let names = arm_names(app.world().resource::<ArmRegistry>());
    let switch_frames = if run.switch_every > 0.0 && names.len() > 1 {
        Some(((run.switch_every / run.dt).round() as u32).max(1))
    } else {
        None
    };
    info!(
        arms = ?names,
        frames = run.frames,
        dt = run.dt,
        left_handed = run.left_handed,
        "starting headless run"
    );

    let mut next = 1;
    for frame in 1..=run.frames {
        if let Some(every) = switch_frames {
            if frame % every == 0 {
                let name = &names[next % names.len()];
                info!(frame, arm = %name, "switching posture");
                app.world_mut()
                    .resource_mut::<TransitionRequests>()
                    .push(name.clone());
                next += 1;
            }
        }

        app.update();

        if run.report_every > 0 && frame % run.report_every == 0 {
            report(frame, &app);
        }
    }

    let blended = app.world().resource::<BlendedArmPose>();
    let limbs = LimbLayout::from_pose(&blended.pose, &LimbConfig::default());
    println!(
        "\nfinal: bicep={:.3} m forearm={:.3} m",
        limbs.bicep.length, limbs.forearm.length
    );
    Ok(())
}

fn run_config(check: Option<&PathBuf>) -> anyhow::Result<()> {
    match check {
        Some(path) => {
            let rig = RigConfig::from_file(path)?;
            let names: Vec<&str> = rig.arms.iter().map(|a| a.name.as_str()).collect();
            println!(
                "{}: ok ({} arms: {}; initial={})",
                path.display(),
                names.len(),
                names.join(", "),
                rig.initial_name().unwrap_or("-"),
            );
        }
        None => print!("{}", toml::to_string(&RigConfig::default())?),
    }
    Ok(())
}

fn run_info() {
    println!("armature v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  armature-core        {}", env!("CARGO_PKG_VERSION"));
    println!("  armature-model       {}", env!("CARGO_PKG_VERSION"));
    println!("  armature-transition  {}", env!("CARGO_PKG_VERSION"));
    println!("  armature-tracking    {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("edition: 2024");
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Headless {
            frames,
            dt,
            config,
            switch_every,
            report_every,
            left_handed,
        }) => run_headless(&HeadlessRun {
            frames,
            dt,
            config,
            switch_every,
            report_every,
            left_handed,
        }),
        Some(Commands::Config { check }) => run_config(check.as_ref()),
        Some(Commands::Info) => {
            run_info();
            Ok(())
        }
        // Default: headless with defaults
        None => run_headless(&HeadlessRun::default()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
