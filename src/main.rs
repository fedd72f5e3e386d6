use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;
use tokio::sync::mpsc;

use ragdesk::app::{App, AppMessage};
use ragdesk::cli::{handle_check_command, parse_args, run_cli_command, CliCommand};
use ragdesk::client::RagClient;
use ragdesk::startup::{init_logging, ClientConfig};
use ragdesk::terminal::{setup_panic_hook, TerminalManager};
use ragdesk::ui;

/// Redraw tick for the busy spinner
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let command = parse_args(std::env::args());
    if let Some(result) = run_cli_command(command.clone()) {
        return result;
    }

    color_eyre::install()?;
    init_logging(None);

    let runtime = tokio::runtime::Runtime::new()?;
    match command {
        CliCommand::Check(options) => {
            let config = options.apply(ClientConfig::from_env());
            runtime.block_on(handle_check_command(&config))
        }
        CliCommand::RunTui(options) => {
            let config = options.apply(ClientConfig::from_env());
            tracing::info!(
                "Starting against {} in session {}",
                config.base_url,
                config.session_id
            );
            setup_panic_hook();
            runtime.block_on(run_tui(config))
        }
        CliCommand::Version | CliCommand::Help | CliCommand::Invalid(_) => Ok(()),
    }
}

async fn run_tui(config: ClientConfig) -> Result<()> {
    let client = RagClient::with_reqwest(&config);
    let mut app = App::new(client, config.session_id.clone());
    app.initialize();

    let mut manager = TerminalManager::new()?;
    let result = run_app(manager.terminal(), &mut app).await;
    manager.restore()?;

    if let Err(err) = &result {
        tracing::error!("Event loop failed: {}", err);
    }
    tracing::info!("Exiting");
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();
    let mut ticker = tokio::time::interval(TICK);

    loop {
        if app.needs_redraw {
            terminal.draw(|f| ui::render(f, app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            _ = ticker.tick() => app.tick(),

            event = event_stream.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Some(Ok(Event::Paste(text))) => app.handle_paste(&text),
                Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => app.quit(),
            },

            msg = async {
                match &mut message_rx {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(msg) = msg {
                    app.handle_message(msg);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
