use anyhow::Result;
use tracing::info;

mod app;
mod bible;
mod commands;
mod config;
mod favorites;
mod handler;
mod logging;
mod render;
mod tui;
mod ui;

use app::App;
use config::Config;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::load_or_default();
    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    // An unfinished lookup is dropped with the runtime.
    if app.is_loading() {
        info!("exiting with a lookup in flight");
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    info!("quit");
    Ok(())
}
