use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bar grows upward from the bottom edge.
    #[default]
    Vertical,
    /// Bar grows rightward from the left edge.
    Horizontal,
}

/// Cells along the bar's axis.
pub fn bar_length(area: Rect, orientation: Orientation) -> u16 {
    match orientation {
        Orientation::Vertical => area.height,
        Orientation::Horizontal => area.width,
    }
}

/// Length of the empty segment: louder volume leaves less of it.
pub fn filler_length(volume: f32, total: u16) -> u16 {
    let empty = 1.0 - volume.clamp(0.0, 1.0);
    ((empty * total as f32).round() as u16).min(total)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarSegments {
    pub filler: Rect,
    pub bar: Rect,
}

/// Splits `area` into the empty filler and the lit bar.
pub fn split(area: Rect, orientation: Orientation, filler: u16) -> BarSegments {
    match orientation {
        Orientation::Vertical => {
            let filler = filler.min(area.height);
            BarSegments {
                filler: Rect {
                    height: filler,
                    ..area
                },
                bar: Rect {
                    y: area.y + filler,
                    height: area.height - filler,
                    ..area
                },
            }
        }
        Orientation::Horizontal => {
            let filler = filler.min(area.width);
            let bar_width = area.width - filler;
            BarSegments {
                filler: Rect {
                    x: area.x + bar_width,
                    width: filler,
                    ..area
                },
                bar: Rect {
                    width: bar_width,
                    ..area
                },
            }
        }
    }
}
