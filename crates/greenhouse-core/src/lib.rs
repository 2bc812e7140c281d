pub mod config;
pub mod debounce;
pub mod desktop;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod logging;
pub mod manager;
pub mod matcher;
pub mod overlay;
pub mod rect;
pub mod restore;
pub mod store;
pub mod topology;

#[cfg(test)]
mod testing;

/// Opaque OS window handle. Not stable across process restarts.
pub type WindowHandle = usize;
/// Opaque OS monitor handle.
pub type MonitorHandle = usize;

pub use config::Config;
pub use desktop::{Desktop, MonitorCounter, OverlayBackend, OverlaySurface, ProcessInfo};
pub use error::{Error, Resolved, Result};
pub use geometry::NormalizedGeometry;
pub use identity::WindowIdentity;
pub use manager::{SavedWindow, StartupReport, WindowManager};
pub use matcher::{TieBreak, WindowSummary};
pub use rect::Rect;
pub use restore::{RestoreOutcome, RestoreReport};
pub use store::{PositionStore, WindowRecord};
pub use topology::TopologyEvent;
