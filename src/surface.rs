//! Drawing-surface abstraction consumed by the render pass.
//!
//! The engine never talks to a concrete canvas. The application shell
//! provides an implementation over its painter, and tests use
//! [`RecordingSurface`] to inspect what a render pass produced.

use serde::{Deserialize, Serialize};

use crate::diagram::{Point, Rect};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Rgba = Rgba::rgb(192, 192, 192);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const CYAN: Rgba = Rgba::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    pub dashed: bool,
}

impl Stroke {
    pub const fn solid(color: Rgba) -> Self {
        Self {
            color,
            width: 1.0,
            dashed: false,
        }
    }

    pub const fn dashed(color: Rgba) -> Self {
        Self {
            color,
            width: 1.0,
            dashed: true,
        }
    }
}

/// Primitive operations a render pass may issue.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke);
    fn fill_ellipse(&mut self, rect: Rect, color: Rgba);
    fn stroke_ellipse(&mut self, rect: Rect, stroke: Stroke);
    fn line(&mut self, a: Point, b: Point, stroke: Stroke);
    fn fill_polygon(&mut self, points: &[Point], color: Rgba);
    fn stroke_polygon(&mut self, points: &[Point], stroke: Stroke);
    /// Draws `text` centered on `center`.
    fn text(&mut self, center: Point, text: &str, font_size: u32, color: Rgba);
    /// Width and height the surface would use for `text` at `font_size`.
    fn measure_text(&self, text: &str, font_size: u32) -> (i32, i32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect(Rect, Rgba),
    StrokeRect(Rect, Stroke),
    FillEllipse(Rect, Rgba),
    StrokeEllipse(Rect, Stroke),
    Line(Point, Point, Stroke),
    FillPolygon(Vec<Point>, Rgba),
    StrokePolygon(Vec<Point>, Stroke),
    Text(Point, String, u32),
}

/// Surface that records every command instead of drawing it.
#[derive(Default, Debug)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(_, t, _) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeRect(rect, stroke));
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillEllipse(rect, color));
    }

    fn stroke_ellipse(&mut self, rect: Rect, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeEllipse(rect, stroke));
    }

    fn line(&mut self, a: Point, b: Point, stroke: Stroke) {
        self.commands.push(DrawCommand::Line(a, b, stroke));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        self.commands
            .push(DrawCommand::FillPolygon(points.to_vec(), color));
    }

    fn stroke_polygon(&mut self, points: &[Point], stroke: Stroke) {
        self.commands
            .push(DrawCommand::StrokePolygon(points.to_vec(), stroke));
    }

    fn text(&mut self, center: Point, text: &str, font_size: u32, _color: Rgba) {
        self.commands
            .push(DrawCommand::Text(center, text.to_string(), font_size));
    }

    fn measure_text(&self, text: &str, font_size: u32) -> (i32, i32) {
        let w = (text.chars().count() as f32 * font_size as f32 * 0.6).round() as i32;
        let h = (font_size as f32 * 1.2).round() as i32;
        (w, h)
    }
}
