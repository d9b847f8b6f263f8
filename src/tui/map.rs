//! Marker map panel for the car-wash step.
//!
//! Renders the geocoded markers on a canvas scaled to their bounding box.
//! Markers without a coordinate never reach this panel; the list next to it
//! still shows them.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::canvas::{Canvas, Points},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::AddressMarker;

pub fn draw_map(f: &mut Frame, area: Rect, markers: &[AddressMarker]) {
    let located: Vec<_> = markers
        .iter()
        .filter_map(|m| m.coordinate.map(|c| (m, c)))
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Map");
    if located.is_empty() {
        let message = if markers.is_empty() {
            "No markers yet."
        } else {
            "None of the addresses could be located."
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let (x_bounds, y_bounds) = bounds(
        located.iter().map(|(_, c)| (c.longitude, c.latitude)),
    );

    let canvas = Canvas::default()
        .block(block)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for (marker, coordinate) in &located {
                ctx.draw(&Points {
                    coords: &[(coordinate.longitude, coordinate.latitude)],
                    color: Color::Cyan,
                });
                ctx.print(
                    coordinate.longitude,
                    coordinate.latitude,
                    ratatui::text::Line::styled(
                        marker.title.clone(),
                        Style::default().fg(Color::Cyan),
                    ),
                );
            }
        });
    f.render_widget(canvas, area);
}

/// Bounding box with a margin, widened when all points coincide so the
/// canvas never divides by a zero-sized range.
fn bounds(points: impl Iterator<Item = (f64, f64)>) -> ([f64; 2], [f64; 2]) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let x_pad = ((x_max - x_min) * 0.15).max(0.01);
    let y_pad = ((y_max - y_min) * 0.15).max(0.01);
    (
        [x_min - x_pad, x_max + x_pad],
        [y_min - y_pad, y_max + y_pad],
    )
}
