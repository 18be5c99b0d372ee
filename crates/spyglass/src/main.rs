//! Spyglass - annotated candlestick dashboard with an AI assistant.

mod app;
mod assistant;
mod chat;
mod playback;

use anyhow::Result;
use spyglass_config::Config;

use app::App;

fn run() -> Result<()> {
    env_logger::init();

    let config = Config::load_default();
    let mut app = App::new(config)?;
    app.run()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
    }
}
