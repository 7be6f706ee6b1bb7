/// Which signal ended the serve loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    CtrlC,
    Terminate,
}

/// Resolves once Ctrl+C or SIGTERM is received.
///
/// # Panics
///
/// Panics if the Ctrl+C or SIGTERM signal handler cannot be installed.
pub async fn wait_for_signal() -> ShutdownReason {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => ShutdownReason::CtrlC,
        () = terminate => ShutdownReason::Terminate,
    }
}

/// Graceful shutdown future for `axum::serve`, logging the triggering signal.
pub async fn shutdown_signal(service_name: &'static str) {
    match wait_for_signal().await {
        ShutdownReason::CtrlC => {
            tracing::info!(service = service_name, "Ctrl+C pressed, starting graceful shutdown");
        }
        ShutdownReason::Terminate => {
            tracing::info!(service = service_name, "Received SIGTERM, starting graceful shutdown");
        }
    }
}
