use audmon_meter::LevelFrame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::bar::{bar_length, filler_length, split, Orientation};
use crate::theme::MeterTheme;

/// What the bar currently shows. Only the UI loop touches it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeterView {
    pub volume: f32,
    pub clipped_recently: bool,
}

impl MeterView {
    pub fn apply(&mut self, frame: &LevelFrame) {
        self.volume = frame.volume.clamp(0.0, 1.0);
        self.clipped_recently = frame.clipped_recently();
    }
}

pub struct LevelBar<'a> {
    view: &'a MeterView,
    theme: &'a MeterTheme,
    orientation: Orientation,
}

impl<'a> LevelBar<'a> {
    pub fn new(view: &'a MeterView, theme: &'a MeterTheme, orientation: Orientation) -> Self {
        Self {
            view,
            theme,
            orientation,
        }
    }
}

impl Widget for LevelBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let filler = filler_length(self.view.volume, bar_length(area, self.orientation));
        let segments = split(area, self.orientation, filler);
        buf.set_style(
            segments.filler,
            Style::default().bg(self.theme.filler(self.view.clipped_recently)),
        );
        buf.set_style(segments.bar, Style::default().bg(self.theme.bar));
    }
}

#[cfg(test)]
mod tests {
    use audmon_meter::ClipState;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;

    use super::*;

    fn render(view: MeterView, orientation: Orientation, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = MeterTheme::default();
        terminal
            .draw(|frame| {
                frame.render_widget(LevelBar::new(&view, &theme, orientation), frame.area())
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn bg(buffer: &Buffer, x: u16, y: u16) -> Color {
        buffer.cell((x, y)).unwrap().bg
    }

    #[test]
    fn apply_copies_volume_and_clip_flag() {
        let mut view = MeterView::default();
        view.apply(&LevelFrame {
            volume: 0.4,
            clip: ClipState::ClippedRecently,
            ..Default::default()
        });
        assert_eq!(view.volume, 0.4);
        assert!(view.clipped_recently);
    }

    #[test]
    fn vertical_bar_fills_from_the_bottom() {
        let view = MeterView {
            volume: 0.3,
            clipped_recently: false,
        };
        let buffer = render(view, Orientation::Vertical, 2, 10);
        for y in 0..7 {
            assert_eq!(bg(&buffer, 0, y), Color::Reset, "row {y}");
        }
        for y in 7..10 {
            assert_eq!(bg(&buffer, 1, y), Color::Green, "row {y}");
        }
    }

    #[test]
    fn horizontal_bar_fills_from_the_left() {
        let view = MeterView {
            volume: 0.25,
            clipped_recently: false,
        };
        let buffer = render(view, Orientation::Horizontal, 100, 1);
        assert_eq!(bg(&buffer, 24, 0), Color::Green);
        assert_eq!(bg(&buffer, 25, 0), Color::Reset);
        assert_eq!(bg(&buffer, 99, 0), Color::Reset);
    }

    #[test]
    fn clipping_colors_the_filler() {
        let view = MeterView {
            volume: 0.5,
            clipped_recently: true,
        };
        let buffer = render(view, Orientation::Vertical, 1, 4);
        assert_eq!(bg(&buffer, 0, 0), Color::Red);
        assert_eq!(bg(&buffer, 0, 3), Color::Green);
    }

    #[test]
    fn full_volume_leaves_no_filler() {
        let view = MeterView {
            volume: 1.0,
            clipped_recently: true,
        };
        let buffer = render(view, Orientation::Vertical, 1, 5);
        for y in 0..5 {
            assert_eq!(bg(&buffer, 0, y), Color::Green);
        }
    }
}
