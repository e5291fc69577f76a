use std::process::ExitCode;

use clip_capture::autostart::{self, AutostartInstaller, PlatformBackend};
use clip_capture::clipboard::{self, ArboardSource};
use clip_capture::config::AgentConfig;
use clip_capture::event_loop::IntervalTicker;
use clip_capture::reporter::{ErrorReporter, FileReporter};
use clip_capture::runner::Agent;
use clip_capture::state::AgentState;
use clip_capture::tracing_sub;
use clip_capture::visibility::PlatformVisibility;

fn main() -> ExitCode {
    tracing_sub::init_default();

    let config = match AgentConfig::resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("clip-capture: {err}");
            return ExitCode::FAILURE;
        }
    };
    let reporter = FileReporter::new(&config.error_log_path);

    install_autostart(&config, &reporter);

    if !clipboard::available() {
        tracing::warn!("clipboard not available yet; will keep retrying");
    }

    let mut agent = Agent::new(
        &config,
        ArboardSource::new(),
        PlatformVisibility::default(),
        &reporter,
    );
    let state = AgentState::new(&config.log_path);
    agent.hide_existing_log(&state);
    agent.run(IntervalTicker::new(config.tick_interval), state);

    ExitCode::SUCCESS
}

fn install_autostart(config: &AgentConfig, reporter: &FileReporter) {
    let executable = match std::env::current_exe() {
        Ok(path) => path,
        Err(err) => {
            reporter.report("cannot locate running executable", &err);
            return;
        }
    };
    let mut backend = PlatformBackend::default();
    let registrations = AutostartInstaller::new(&mut backend, reporter)
        .with_task_name(config.task_name.as_str())
        .install(&executable);
    if !registrations.is_empty() && !autostart::any_installed(&registrations) {
        tracing::warn!("no autostart mechanism could be installed");
    }
}
