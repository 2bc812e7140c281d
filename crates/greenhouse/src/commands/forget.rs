use greenhouse_core::WindowHandle;

pub fn execute(hwnd: WindowHandle) {
    let mut wm = super::open_linked();
    match wm.forget_window(hwnd) {
        Ok(true) => println!("Forgot 0x{hwnd:X}."),
        Ok(false) => println!("0x{hwnd:X} was not saved."),
        Err(e) => super::fail(e),
    }
}
