use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use submit_core::sim::StageSnapshot;
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, snapshot: &StageSnapshot) {
        let theme = &app.theme;
        let phase = snapshot.phase.to_string().to_uppercase();

        let status_text = format!(
            " {} | {:>7.0}ms | w {:.0} r {:.1} x{:.2} | done: {} cancelled: {}",
            phase,
            snapshot.at_ms,
            snapshot.width,
            snapshot.corner_radius,
            snapshot.scale,
            app.finished_count(),
            app.settled_count(),
        );
        let message = app
            .status_message
            .as_ref()
            .map(|msg| format!(" | {}", msg))
            .unwrap_or_default();
        let message_fg = if app.status_is_warning {
            theme.warning
        } else {
            theme.fg0
        };

        let help_hint = " l:load c:cancel s:success f:full r:reset q:quit ";
        let padding_len = usize::from(area.width)
            .saturating_sub(status_text.width() + message.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(message, Style::default().fg(message_fg).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};
    use submit_core::AppConfig;

    use super::*;
    use crate::input::Action;

    fn render(app: &App) -> ratatui::buffer::Buffer {
        let mut terminal = Terminal::new(TestBackend::new(200, 1)).unwrap();
        let snapshot = app.snapshot();
        terminal
            .draw(|frame| StatusBarWidget::render(frame, frame.area(), app, &snapshot))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Foreground of the first cell of `needle` on the single status line
    fn fg_of(buffer: &ratatui::buffer::Buffer, needle: &str) -> Option<ratatui::style::Color> {
        let line: String = (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, 0)).map(|cell| cell.symbol().to_string()))
            .collect();
        let x = line.find(needle)?;
        buffer.cell((x as u16, 0)).map(|cell| cell.fg)
    }

    #[test]
    fn test_rejected_action_is_drawn_in_warning_color() {
        let mut app = App::new(Arc::new(AppConfig::default()));
        app.handle_action(Action::CancelLoading);

        let buffer = render(&app);
        assert_eq!(fg_of(&buffer, "Ignored"), Some(app.theme.warning));
        assert_eq!(fg_of(&buffer, "IDLE"), Some(app.theme.fg0));
    }

    #[test]
    fn test_accepted_action_uses_normal_color() {
        let mut app = App::new(Arc::new(AppConfig::default()));
        app.handle_action(Action::BeginLoading);

        let buffer = render(&app);
        assert_eq!(fg_of(&buffer, "begin_loading"), Some(app.theme.fg0));
    }
}
