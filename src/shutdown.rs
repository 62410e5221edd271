use crate::tui::AppMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Turn a termination signal into a shutdown message for the event loop
pub async fn forward_signals(tx: mpsc::Sender<AppMessage>, cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        result = wait_for_signal() => {
            match result {
                Ok(()) => {
                    let _ = tx.send(AppMessage::Shutdown).await;
                }
                Err(e) => error!("Failed to install signal handlers: {}", e),
            }
        }
    }
}

/// Platform-specific signal handling implementation
#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    // Raw mode turns Ctrl+C into a key press, this only fires for external SIGINT
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, shutting down");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, shutting down");
        }
        _ = sighup.recv() => {
            info!("Received SIGHUP signal, shutting down");
        }
    }
    Ok(())
}

/// Platform-specific signal handling implementation
#[cfg(windows)]
async fn wait_for_signal() -> std::io::Result<()> {
    let mut ctrlc = ctrl_c()?;
    let mut ctrlbreak = ctrl_break()?;

    tokio::select! {
        _ = ctrlc.recv() => {
            info!("Received Ctrl+C signal, shutting down");
        }
        _ = ctrlbreak.recv() => {
            info!("Received Ctrl+Break signal, shutting down");
        }
    }
    Ok(())
}
