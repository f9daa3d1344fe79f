use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use deck_draw::config::Config;
use deck_draw::session::DeckSession;
use deck_draw::tui::{app::AppState, app::InputAction, controller};
use ratatui::prelude::*;
use std::error::Error;
use std::io::{self, IsTerminal, Stdout};

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.validate()?;
    if !io::stdout().is_terminal() {
        println!(
            "deck-draw TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            deck_draw::VERSION
        );
        return Ok(());
    }
    deck_draw::logging::init(&config.log_file, config.log_level)?;
    log::info!("deck-draw {} starting, offline={}", deck_draw::VERSION, config.offline);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let session = DeckSession::new(config.client()?, runtime.handle().clone(), config.session_options());
    let mut app = AppState::new(session);
    // deal straight away so the table starts with a deck
    let _ = app.handle_input(InputAction::NewDeck);

    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, config.tick_rate());

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    log::info!("deck-draw exiting");
    res?;
    Ok(())
}
