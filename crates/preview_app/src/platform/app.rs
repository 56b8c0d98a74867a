use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use preview_core::{update, AppState, Msg, ProgressScript};
use preview_logging::{preview_info, preview_warn};

use super::config::{self, Args};
use super::effects::EffectRunner;
use super::input::{parse_line, InputCommand};
use super::{logging, ui};

/// Everything the main loop reacts to.
pub(crate) enum AppEvent {
    Core(Msg),
    /// Frame error for whichever submission is current when it is handled.
    FrameError {
        message: String,
        stack: Option<String>,
    },
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let loaded = config::load_config(&args.config);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    args.apply_to(&mut config);

    logging::initialize(&config, args.verbose);
    if let Err(err) = &loaded {
        preview_warn!("Ignoring config {:?}: {}", args.config, err);
    }
    preview_info!(
        "Starting preview_app base_url={} features={:?}",
        config.base_url,
        config.features()
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.client_settings(), event_tx.clone())
        .context("failed to start engine")?;
    spawn_input_reader(event_tx).context("failed to start input reader")?;

    let mut state = AppState::with_features(config.features())
        .with_script(ProgressScript::default().with_interval(config.progress_interval()));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", ui::constants::INPUT_HINT)?;

    while let Ok(event) = event_rx.recv() {
        let msg = match event {
            AppEvent::Core(msg) => msg,
            AppEvent::FrameError { message, stack } => match state.view().submission_id {
                Some(submission_id) => Msg::FrameError {
                    submission_id,
                    message,
                    stack,
                },
                None => {
                    preview_warn!("Frame error with no preview: {}", message);
                    continue;
                }
            },
            AppEvent::Quit => break,
        };

        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        if state.consume_dirty() {
            for line in ui::render::render(&state.view()) {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
        }
    }

    preview_info!("preview_app exiting");
    Ok(())
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("preview-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let events = match parse_line(&line) {
                    InputCommand::Prompt(text) => vec![
                        AppEvent::Core(Msg::InputChanged(text)),
                        AppEvent::Core(Msg::Submitted),
                    ],
                    InputCommand::FrameError { message, stack } => {
                        vec![AppEvent::FrameError { message, stack }]
                    }
                    InputCommand::Quit => vec![AppEvent::Quit],
                };
                for event in events {
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
            }
            let _ = event_tx.send(AppEvent::Quit);
        })?;
    Ok(())
}
