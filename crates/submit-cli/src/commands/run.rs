use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{debug, info};

use submit_core::AppConfig;
use submit_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{ButtonWidget, StatusBarWidget},
    App,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Submit Transition"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn main_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: Arc<AppConfig>) -> Result<()> {
    let mut events = EventHandler::new(config.ui.tick_rate_ms);
    let mut app = App::new(config);
    info!("Interactive demo started");

    loop {
        app.tick(events.frame());

        let snapshot = app.snapshot();
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            frame.render_widget(
                ButtonWidget::new(&snapshot, &app.theme, app.config.ui.points_per_cell),
                layout[0],
            );
            StatusBarWidget::render(frame, layout[1], &app, &snapshot);
        })?;

        for event in events.input()? {
            match event {
                AppEvent::Key(key) => app.handle_action(handle_key_event(key)),
                AppEvent::Resize(w, h) => debug!("Terminal resized to {}x{}", w, h),
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Interactive demo closed");
    Ok(())
}
