use greenhouse_core::WindowHandle;

pub fn execute(hwnd: WindowHandle) {
    let mut wm = super::open_linked();
    match wm.save_window_position(hwnd) {
        Ok(position) => println!("Saved 0x{hwnd:X} at {}", super::describe(&position)),
        Err(e) => super::fail(e),
    }
}
