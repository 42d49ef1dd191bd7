use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

use tasklist::{logging, ui, App, Config, TaskStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    logging::init(&config.log_file)?;

    // Load before touching the terminal so errors print normally.
    let store = match TaskStore::open(&config.data_file) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "could not load tasks");
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };
    let mut app = App::new(store, Local::now().date_naive());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal error");
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            return Ok(());
        }
        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
    }
}
