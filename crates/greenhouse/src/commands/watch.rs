use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use greenhouse_windows::{Win32MonitorCounter, ctrl_c};

/// Runs until Ctrl+C or stdin closes, restoring saved windows whenever a
/// second monitor is connected.
pub fn execute() {
    let mut wm = super::open();

    let startup = wm.startup();
    println!("Relinked {} saved windows.", startup.relinked.len());
    if let Some(report) = &startup.restored {
        super::restore_all::print_report(report);
    }

    let (stop_tx, stop_rx) = mpsc::channel();
    if let Err(e) = ctrl_c::set_handler(stop_tx.clone()) {
        log::warn!("no Ctrl+C handler: {e}");
    }
    thread::spawn(move || {
        let _ = io::copy(&mut io::stdin().lock(), &mut io::sink());
        let _ = stop_tx.send(());
    });

    let events = wm.start_topology_monitor(Win32MonitorCounter);
    let tick = wm.config().topology.poll_interval();
    println!("Watching monitors. Press Ctrl+C to stop.");

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }
        match events.recv_timeout(tick) {
            Ok(event) => {
                println!("Second monitor connected, restoring saved windows.");
                let report = wm.handle_topology_event(event);
                super::restore_all::print_report(&report);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                eprintln!("Monitor polling stopped.");
                break;
            }
        }

        for hwnd in wm.scan_for_returning_windows() {
            println!("Saved window is back as 0x{hwnd:X}.");
        }
    }

    wm.shutdown();
    println!("Stopped.");
}
