use greenhouse_core::RestoreReport;

pub fn execute() {
    let mut wm = super::open_linked();
    if wm.store().is_empty() {
        println!("No saved windows.");
        return;
    }
    let report = wm.restore_all();
    print_report(&report);
}

pub fn print_report(report: &RestoreReport) {
    for (hwnd, outcome) in &report.restored {
        println!("  0x{hwnd:X}: {}", super::restore::describe(outcome));
    }
    for (hwnd, reason) in &report.skipped {
        println!("  0x{hwnd:X}: skipped ({reason})");
    }
    println!(
        "Restored {} windows, skipped {}.",
        report.restored.len(),
        report.skipped.len()
    );
}
