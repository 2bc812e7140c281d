#[cfg(windows)]
mod commands;

use clap::{Parser, Subcommand};

use greenhouse_core::WindowHandle;

#[derive(Parser)]
#[command(
    name = "greenhouse",
    version,
    about = "Save window positions and restore them when monitors come back"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(not(windows), allow(dead_code))]
enum Commands {
    /// List visible windows that can be saved
    List,
    /// List saved windows and whether they are running
    Saved,
    /// Save the current position of a window
    Save {
        /// Window handle (decimal or hex with 0x prefix)
        #[arg(value_parser = parse_hwnd)]
        hwnd: WindowHandle,
    },
    /// Forget the saved position of a window
    Forget {
        /// Window handle (decimal or hex with 0x prefix)
        #[arg(value_parser = parse_hwnd)]
        hwnd: WindowHandle,
    },
    /// Move a window back to its saved position
    Restore {
        /// Window handle (decimal or hex with 0x prefix)
        #[arg(value_parser = parse_hwnd)]
        hwnd: WindowHandle,
    },
    /// Move every saved window back to its saved position
    RestoreAll,
    /// Draw a highlight over a window for a few seconds
    Highlight {
        /// Window handle (decimal or hex with 0x prefix)
        #[arg(value_parser = parse_hwnd)]
        hwnd: WindowHandle,
        /// How long to keep the highlight visible
        #[arg(long, default_value_t = 3)]
        seconds: u64,
    },
    /// Watch for a second monitor and restore saved windows when it returns
    Watch,
    /// Manage starting with Windows
    Autostart {
        #[command(subcommand)]
        action: AutostartCommands,
    },
}

#[derive(Subcommand)]
#[cfg_attr(not(windows), allow(dead_code))]
enum AutostartCommands {
    /// Start watching at logon and restore saved windows on startup
    Enable,
    /// Stop starting at logon
    Disable,
    /// Show whether autostart is enabled
    Status,
}

fn parse_hwnd(s: &str) -> Result<WindowHandle, String> {
    greenhouse_core::store::parse_handle(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    run(cli.command);
}

#[cfg(windows)]
fn run(command: Commands) {
    match command {
        Commands::List => commands::list::execute(),
        Commands::Saved => commands::saved::execute(),
        Commands::Save { hwnd } => commands::save::execute(hwnd),
        Commands::Forget { hwnd } => commands::forget::execute(hwnd),
        Commands::Restore { hwnd } => commands::restore::execute(hwnd),
        Commands::RestoreAll => commands::restore_all::execute(),
        Commands::Highlight { hwnd, seconds } => commands::highlight::execute(hwnd, seconds),
        Commands::Watch => commands::watch::execute(),
        Commands::Autostart { action } => match action {
            AutostartCommands::Enable => commands::autostart::enable(),
            AutostartCommands::Disable => commands::autostart::disable(),
            AutostartCommands::Status => commands::autostart::status(),
        },
    }
}

#[cfg(not(windows))]
fn run(_command: Commands) {
    eprintln!("Error: unsupported platform, greenhouse only runs on Windows");
    std::process::exit(1);
}
