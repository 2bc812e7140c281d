/// Manages starting with Windows.
///
/// The Run key entry and the saved `start_with_windows` setting are
/// toggled together, so a logon start also restores saved windows.
pub fn enable() {
    if let Err(e) = greenhouse_windows::autostart::enable() {
        super::fail(e);
    }
    let mut wm = super::open();
    match wm.set_start_with_windows(true) {
        Ok(()) => println!("Autostart enabled."),
        Err(e) => super::fail(e),
    }
}

pub fn disable() {
    if let Err(e) = greenhouse_windows::autostart::disable() {
        super::fail(e);
    }
    let mut wm = super::open();
    match wm.set_start_with_windows(false) {
        Ok(()) => println!("Autostart disabled."),
        Err(e) => super::fail(e),
    }
}

pub fn status() {
    let registered = greenhouse_windows::autostart::is_enabled();
    let wm = super::open();
    let restore = wm.store().settings().start_with_windows;
    match (registered, restore) {
        (true, true) => println!("Autostart is currently enabled."),
        (false, false) => println!("Autostart is currently disabled."),
        (true, false) => println!("Autostart is registered, but restore on startup is off."),
        (false, true) => println!("Restore on startup is on, but autostart is not registered."),
    }
}
