use std::f64::consts::TAU;

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use submit_core::sim::StageSnapshot;
use submit_core::SpinnerGeometry;
use unicode_width::UnicodeWidthStr;

use crate::theme::{to_terminal, Theme};

const ARC_SYMBOL: &str = "•";

/// Whether a point, relative to the spinner center, lies on the stroked arc
/// after rotating by `angle`. `band` is how far off the radius still counts.
pub fn on_spinner_arc(x: f64, y: f64, geometry: &SpinnerGeometry, angle: f64, band: f64) -> bool {
    if (x.hypot(y) - geometry.radius).abs() > band {
        return false;
    }
    // y grows downward, so atan2 turns clockwise like the rotation
    let offset = (y.atan2(x) - geometry.start_angle - angle).rem_euclid(TAU);
    offset <= geometry.stroke_end * TAU
}

/// Whether a point lies in a rounded rectangle centered on the origin
fn inside_rounded_rect(x: f64, y: f64, width: f64, height: f64, radius: f64) -> bool {
    let (half_w, half_h) = (width / 2.0, height / 2.0);
    if x.abs() > half_w || y.abs() > half_h {
        return false;
    }
    let dx = x.abs() - (half_w - radius);
    let dy = y.abs() - (half_h - radius);
    if dx <= 0.0 || dy <= 0.0 {
        return true;
    }
    dx * dx + dy * dy <= radius * radius
}

/// Draws the presented button centered in its area.
///
/// Geometry is in points. One cell spans `points_per_cell` points across and
/// twice that down, so a circle stays round on a typical terminal font.
pub struct ButtonWidget<'a> {
    snapshot: &'a StageSnapshot,
    theme: &'a Theme,
    points_per_cell: f64,
}

impl<'a> ButtonWidget<'a> {
    pub fn new(snapshot: &'a StageSnapshot, theme: &'a Theme, points_per_cell: f64) -> Self {
        Self {
            snapshot,
            theme,
            points_per_cell: points_per_cell.max(0.5),
        }
    }
}

impl Widget for ButtonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.theme.bg0));
        if area.is_empty() {
            return;
        }

        let snapshot = self.snapshot;
        let col_points = self.points_per_cell;
        let row_points = self.points_per_cell * 2.0;
        let width = snapshot.width * snapshot.scale;
        let height = snapshot.height * snapshot.scale;
        let radius = (snapshot.corner_radius * snapshot.scale)
            .min(width / 2.0)
            .min(height / 2.0)
            .max(0.0);
        let center_x = f64::from(area.width) * col_points / 2.0;
        let center_y = f64::from(area.height) * row_points / 2.0;

        for row in 0..area.height {
            for col in 0..area.width {
                let x = (f64::from(col) + 0.5) * col_points - center_x;
                let y = (f64::from(row) + 0.5) * row_points - center_y;
                if inside_rounded_rect(x, y, width, height, radius) {
                    if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                        cell.set_bg(self.theme.accent);
                    }
                }
            }
        }

        let middle_row = area.y + area.height / 2;

        let label_width = snapshot.title.width() as u16;
        let button_cols = (width / col_points) as u16;
        if label_width > 0 && label_width <= button_cols.min(area.width) {
            let x = area.x + (area.width - label_width) / 2;
            buf.set_string(
                x,
                middle_row,
                &snapshot.title,
                Style::default().fg(self.theme.bg0).bg(self.theme.accent),
            );
        }

        if !snapshot.spinner.visible {
            return;
        }
        let geometry = SpinnerGeometry::for_height(snapshot.height);
        let color = to_terminal(snapshot.spinner.color, submit_core::Color::BLACK);
        let band = row_points / 2.0;
        for row in 0..area.height {
            for col in 0..area.width {
                let x = (f64::from(col) + 0.5) * col_points - center_x;
                let y = (f64::from(row) + 0.5) * row_points - center_y;
                if on_spinner_arc(x, y, &geometry, snapshot.spinner.angle, band) {
                    if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                        cell.set_symbol(ARC_SYMBOL);
                        cell.set_fg(color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::style::Color;
    use submit_core::sim::Stage;
    use submit_core::{Size, TimingProfile};

    use super::*;

    fn stage() -> Stage {
        Stage::new(Size::new(200.0, 44.0), 4.0, "Submit", TimingProfile::default())
    }

    fn render(snapshot: &StageSnapshot) -> Buffer {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 9);
        let mut buf = Buffer::empty(area);
        ButtonWidget::new(snapshot, &theme, 4.0).render(area, &mut buf);
        buf
    }

    fn filled_columns(buf: &Buffer, row: u16) -> usize {
        let accent = Theme::default().accent;
        (0..buf.area.width)
            .filter(|&col| buf.cell((col, row)).is_some_and(|cell| cell.bg == accent))
            .count()
    }

    fn row_text(buf: &Buffer, row: u16) -> String {
        (0..buf.area.width)
            .filter_map(|col| buf.cell((col, row)).map(|cell| cell.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_idle_button_shows_label() {
        let buf = render(&stage().snapshot());
        assert_eq!(filled_columns(&buf, 4), 50);
        assert!(row_text(&buf, 4).contains("Submit"));
        assert_eq!(filled_columns(&buf, 0), 0);
    }

    fn arc_cells(buf: &Buffer) -> Vec<(u16, u16)> {
        let mut cells = Vec::new();
        for row in 0..buf.area.height {
            for col in 0..buf.area.width {
                if buf.cell((col, row)).is_some_and(|cell| cell.symbol() == ARC_SYMBOL) {
                    cells.push((col, row));
                }
            }
        }
        cells
    }

    #[test]
    fn test_spinning_button_is_a_small_circle() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(250));

        let buf = render(&stage.snapshot());
        assert_eq!(filled_columns(&buf, 4), 12);
        assert!(!row_text(&buf, 4).contains("Submit"));

        // Part of a ring inside the circle, in the spinner color
        let arc = arc_cells(&buf);
        assert!(!arc.is_empty());
        assert!(arc.len() < 16);
        for &(col, row) in &arc {
            let cell = buf.cell((col, row)).unwrap();
            assert_eq!(cell.fg, Color::Rgb(0xff, 0xff, 0xff));
            assert_eq!(cell.bg, Theme::default().accent);
        }
    }

    #[test]
    fn test_spinner_arc_turns_with_time() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(150));
        let before = arc_cells(&render(&stage.snapshot()));

        stage.advance(Duration::from_millis(200));
        let after = arc_cells(&render(&stage.snapshot()));

        assert_ne!(before, after);
    }

    #[test]
    fn test_hidden_spinner_draws_no_arc() {
        let buf = render(&stage().snapshot());
        assert!(arc_cells(&buf).is_empty());
    }

    #[test]
    fn test_expanded_button_floods_the_area() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(200));
        stage.begin_success(None).unwrap();
        stage.advance(Duration::from_millis(300));

        let buf = render(&stage.snapshot());
        for row in 0..buf.area.height {
            assert_eq!(filled_columns(&buf, row), 60);
        }
    }

    #[test]
    fn test_rounded_corners_are_cut() {
        assert!(inside_rounded_rect(0.0, 0.0, 44.0, 44.0, 22.0));
        assert!(!inside_rounded_rect(21.0, 21.0, 44.0, 44.0, 22.0));
        assert!(inside_rounded_rect(21.0, 21.0, 44.0, 44.0, 0.0));
    }

    #[test]
    fn test_arc_starts_at_twelve_and_runs_clockwise() {
        let geometry = SpinnerGeometry::for_height(44.0);
        let r = geometry.radius;
        assert_eq!(r, 11.0);

        // 40% of a turn from 12 o'clock reaches past 3 but not 6
        assert!(on_spinner_arc(0.0, -r, &geometry, 0.0, 1.0));
        assert!(on_spinner_arc(r, 0.0, &geometry, 0.0, 1.0));
        assert!(!on_spinner_arc(0.0, r, &geometry, 0.0, 1.0));
        assert!(!on_spinner_arc(-r, 0.0, &geometry, 0.0, 1.0));

        // Half a turn later the stroke starts at 6 o'clock
        let half = std::f64::consts::PI;
        assert!(on_spinner_arc(0.0, r, &geometry, half, 1.0));
        assert!(!on_spinner_arc(0.0, -r, &geometry, half, 1.0));

        // Off the ring
        assert!(!on_spinner_arc(0.0, -r - 2.0, &geometry, 0.0, 1.0));
        assert!(!on_spinner_arc(0.0, 0.0, &geometry, 0.0, 1.0));
    }
}
