use thiserror::Error;

/// Failures while bringing up the native window.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    CreateWindow(#[source] winit::error::OsError),
}
