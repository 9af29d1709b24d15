mod attendance;
mod calc;
mod config;
mod fees;
mod format;
mod ipc;
mod model;

use std::io::{self, BufRead, Write};

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    // stdout carries responses, so logs go to stderr.
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_state() -> anyhow::Result<ipc::AppState> {
    let path = config::config_path_from(
        std::env::args().skip(1),
        std::env::var(config::CONFIG_ENV).ok(),
    );
    let Some(path) = path else {
        info!("no config file given, using built-in grading and fee defaults");
        return Ok(ipc::AppState {
            config: config::SchoolConfig::default(),
            config_source: None,
        });
    };
    let cfg = config::SchoolConfig::from_file(&path)?;
    info!(path = %path.display(), "loaded config");
    Ok(ipc::AppState {
        config: cfg,
        config_source: Some(path.to_string_lossy().to_string()),
    })
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let mut state = load_state().map_err(|e| {
        error!("{e:#}");
        e
    })?;
    info!(version = env!("CARGO_PKG_VERSION"), "schoold ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back, so the error carries an empty one.
                let resp = ipc::err("", "bad_json", e.to_string(), None);
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    info!("stdin closed, shutting down");
    Ok(())
}
