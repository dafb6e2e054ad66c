//! Error type for fallible tab operations.
//!
//! Most pager behaviour degrades silently (missing layout, detached scroll
//! handle). These variants cover the calls that report instead.

/// Errors returned by the pager and its terminal driver.
#[derive(Debug, thiserror::Error)]
pub enum TabsError {
    #[error("tab {index} is out of range for {count} tabs")]
    TabOutOfRange { index: usize, count: usize },

    #[error("viewport width must be positive, got {0}")]
    InvalidViewport(i32),

    #[error("scroll handle is not attached to a surface")]
    Detached,

    #[error("label layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TabsError>;
