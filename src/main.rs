use bevy::prelude::*;

use bastion::game::simulation::{BattleSummary, SimPhase, SimTick};
use bastion::game::BattlePlugin;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "bastion";
const LOGS_KEPT: usize = 25;

fn setup_file_logging() -> String {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir).expect("Failed to create logs directory");
    }

    // Keep only the newest runs
    cleanup_old_logs(&log_dir, LOGS_KEPT);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    // One file per run, no rotation mid-run
    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,bastion=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn main() {
    let log_file = setup_file_logging();
    println!("Bastion battle simulation, logging to {}", log_file);

    let mut app = App::new();
    // Headless: no window, no renderer. Bevy's LogPlugin is left out since logging is set up above.
    app.add_plugins(MinimalPlugins).add_plugins(BattlePlugin);

    // Startup: config, terrain, roster
    app.update();

    // Step ticks back to back instead of waiting on the fixed clock.
    let started = Instant::now();
    while *app.world().resource::<SimPhase>() == SimPhase::Running {
        app.world_mut().run_schedule(FixedUpdate);
    }
    let elapsed = started.elapsed();

    let ticks = app.world().resource::<SimTick>().0;
    let summary = app.world().resource::<BattleSummary>().clone();
    info!(
        "[MAIN] {} ticks in {:.3}s ({:.2} ms/tick)",
        ticks,
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64() * 1000.0 / ticks.max(1) as f64
    );
    info!(
        "[MAIN] Survivors: blue {} / red {}, {} projectiles in flight",
        summary.blue_alive, summary.red_alive, summary.projectiles
    );
}
