pub mod autostart;
pub mod forget;
pub mod highlight;
pub mod list;
pub mod restore;
pub mod restore_all;
pub mod save;
pub mod saved;
pub mod watch;

use std::fmt::Display;

use greenhouse_core::store::PositionStore;
use greenhouse_core::{NormalizedGeometry, WindowManager, config};
use greenhouse_windows::{Win32Desktop, Win32OverlayBackend};

pub type Manager = WindowManager<Win32Desktop, Win32OverlayBackend>;

/// Loads config, installs logging and opens the saved positions.
///
/// Saved records keep the handles they were saved under; see
/// [`open_linked`] for a manager whose records point at live windows.
pub fn open() -> Manager {
    let config = config::load();
    greenhouse_core::logging::init(&config.logging);
    greenhouse_windows::dpi::enable_dpi_awareness();

    let path = config::positions_path().unwrap_or_else(|e| fail(e));
    let store = PositionStore::open(path);
    let backend = Win32OverlayBackend::from_config(&config.highlight);
    WindowManager::new(Win32Desktop, backend, store, config)
}

/// Like [`open`], with saved records relinked to the windows running now.
pub fn open_linked() -> Manager {
    let mut wm = open();
    wm.relink_saved_windows();
    wm
}

/// Prints the error and exits with status 1.
pub fn fail(e: impl Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

pub fn describe(position: &NormalizedGeometry) -> String {
    format!(
        "({}, {}) {}x{} @ {:.2}",
        position.left, position.top, position.width, position.height, position.dpi_scale
    )
}
