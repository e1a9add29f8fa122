// Entry point: terminal setup/teardown around the app event loop.

mod ai;
mod app;
mod error;
mod gallery;
mod media;
mod state;
mod ui;

use std::io;
use std::path::PathBuf;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use ai::AiClient;
use app::App;

#[tokio::main]
async fn main() -> io::Result<()> {
    // Missing key is not fatal: the app runs and surfaces key errors per
    // workflow when generation is attempted.
    let client = AiClient::from_env().ok();
    let gallery_path = gallery::paths::gallery_path()
        .unwrap_or_else(|| PathBuf::from("gallery.json"));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, gallery_path);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
