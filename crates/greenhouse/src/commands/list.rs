use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

pub fn execute() {
    let wm = super::open_linked();
    let windows = wm.enumerate_interesting_windows();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("Process"),
            Cell::new("Saved"),
        ]);

    for window in &windows {
        let saved = wm.store().get(window.hwnd).map(|r| super::describe(&r.position));
        table.add_row(vec![
            Cell::new(format!("0x{:X}", window.hwnd)),
            Cell::new(&window.title),
            Cell::new(&window.process_name),
            Cell::new(saved.unwrap_or_default()),
        ]);
    }

    println!("{table}");
    println!("\n{} windows found", windows.len());
}
