use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use chat_widget::app::App;
use chat_widget::tui::{self, EventHandler, Tui, TICK_RATE};
use chat_widget::{handler, logging, ui, Config, HttpEndpoint};

#[derive(Parser)]
#[command(name = "chat-widget")]
#[command(about = "Terminal chat that forwards the conversation to a /chat endpoint")]
struct Cli {
    /// Base URL of the chat endpoint (overrides config and CHAT_WIDGET_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Model to select at startup
    #[arg(short, long)]
    model: Option<String>,

    /// System prompt sent ahead of the conversation
    #[arg(long)]
    system_prompt: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; the UI still works without a log file
    let log_path = logging::init().ok();

    let mut config = Config::load().unwrap_or_else(|_| Config::new());
    config.apply_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint_url = Some(endpoint);
    }
    if let Some(model) = cli.model {
        config.default_model = Some(model);
    }
    if let Some(prompt) = cli.system_prompt {
        config.system_prompt = Some(prompt);
    }

    let endpoint = match config.request_timeout_secs {
        Some(secs) => HttpEndpoint::with_timeout(config.endpoint_url(), Duration::from_secs(secs))?,
        None => HttpEndpoint::new(config.endpoint_url()),
    };
    info!(endpoint = %config.endpoint_url(), log = ?log_path, "starting chat widget");

    let mut app = App::new(&config, Arc::new(endpoint));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(TICK_RATE);

    let result = run(&mut terminal, &mut app, &mut events).await;

    app.shutdown();
    tui::restore()?;

    if let Err(err) = &result {
        error!(error = %err, "chat widget exited with an error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
