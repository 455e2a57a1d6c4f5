//! Main application entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use dp_core::{BridgeEvent, MemorySlot, StateSlot, ViewState, WebviewController};

mod channels;
mod cli;
mod config;
mod file_slot;

use channels::{DriverCommand, InputLine, QueuedRenderer, StdoutHost};
use cli::Cli;
use config::AppConfig;
use file_slot::FileSlot;

fn init_tracing(config: &AppConfig, explicit: bool) {
    let filter = if explicit {
        EnvFilter::new(&config.log_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    // stdout carries the host protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_command(controller: &WebviewController, command: DriverCommand) {
    let state = controller.state();
    match command {
        DriverCommand::Navigate { path } => state.history().navigate_to(&path),
        DriverCommand::ToggleExpanded { path } => match state.navigator().find_by_path(&path) {
            Some(node) => node.toggle_expanded(),
            None => warn!("No navigator node at {}", path),
        },
        DriverCommand::ToggleNavigator => state.navigator().toggle_visibility(),
        DriverCommand::ResizeNavigator { width } => state.navigator().update_width(width),
        DriverCommand::Scroll { x, y } => controller.record_scroll_position(x, y),
    }
}

fn handle_line(controller: &WebviewController, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<InputLine>(line) {
        Ok(InputLine::Host(message)) => controller.handle_host_message(message),
        Ok(InputLine::Driver(command)) => apply_command(controller, command),
        Err(err) => warn!("Ignoring unrecognized input line: {}", err),
    }
}

fn handle_renderer_event(controller: &WebviewController, event: BridgeEvent) {
    match event {
        // The headless renderer navigates instantly and confirms right away
        BridgeEvent::Navigation { .. } => controller.handle_bridge_event(event),
        BridgeEvent::ContentUpdate { data } => {
            let route = controller.state().history().current_route();
            info!(
                "Rendered content for {}: {} bytes",
                route.as_deref().unwrap_or("<no route>"),
                data.to_string().len()
            );
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli)?;
    init_tracing(&config, cli.log_level.is_some());

    info!("Starting documentation preview");

    let slot: Arc<dyn StateSlot> = match &config.state_file {
        Some(path) => {
            info!("Persisting view state to {}", path.display());
            Arc::new(FileSlot::new(path.clone()))
        }
        None => {
            info!("No state file configured, keeping view state in memory");
            Arc::new(MemorySlot::new())
        }
    };

    let (renderer_tx, mut renderer_rx) = mpsc::unbounded_channel();
    let state = ViewState::new(slot, config.view.clone());
    let controller = WebviewController::new(
        state,
        Arc::new(StdoutHost),
        Arc::new(QueuedRenderer::new(renderer_tx)),
    );
    controller.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&controller, &line),
                None => {
                    debug!("stdin closed");
                    break;
                }
            },
            Some(event) = renderer_rx.recv() => handle_renderer_event(&controller, event),
        }
    }

    while let Ok(event) = renderer_rx.try_recv() {
        handle_renderer_event(&controller, event);
    }

    controller.dispose();
    info!("Documentation preview stopped");
    Ok(())
}
