use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use greenhouse_core::store::parse_handle;

pub fn execute() {
    let wm = super::open_linked();
    let saved = wm.saved_windows();
    if saved.is_empty() {
        println!("No saved windows.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("Process"),
            Cell::new("Position"),
            Cell::new("Running"),
        ]);

    for window in &saved {
        let hwnd = parse_handle(&window.key)
            .map(|h| format!("0x{h:X}"))
            .unwrap_or_else(|_| window.key.clone());
        table.add_row(vec![
            Cell::new(hwnd),
            Cell::new(&window.record.info.title),
            Cell::new(&window.record.info.process_name),
            Cell::new(super::describe(&window.record.position)),
            Cell::new(if window.running { "yes" } else { "no" }),
        ]);
    }

    let running = saved.iter().filter(|w| w.running).count();
    println!("{table}");
    println!("\n{} saved windows, {running} running", saved.len());
}
