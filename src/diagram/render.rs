use super::basic::{BasicShape, LabelShape};
use super::composite::CompositeShape;
use super::geometry::{Point, Rect};
use super::link::{Link, LinkKind};
use super::ports::ShapeKind;
use super::selection::SelectionRectangle;
use super::shape::Shape;
use crate::settings::EditorSettings;
use crate::surface::{Rgba, Stroke, Surface};

const LABEL_PADDING: i32 = 10;
const HANDLE_SIZE: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub arrow_size: i32,
    pub port_marker_size: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_settings(&EditorSettings::default())
    }
}

impl RenderOptions {
    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            arrow_size: settings.arrow_size,
            port_marker_size: settings.port_marker_size,
        }
    }
}

pub fn draw_shape(surface: &mut dyn Surface, shape: &Shape, opts: &RenderOptions) {
    match shape {
        Shape::Basic(s) => draw_basic(surface, s, opts),
        Shape::Link(l) => draw_link(surface, l, opts),
        Shape::Composite(c) => draw_composite(surface, c, opts),
    }
}

fn square_at(center: Point, size: i32) -> Rect {
    Rect::new(center.x - size / 2, center.y - size / 2, size, size)
}

fn draw_basic(surface: &mut dyn Surface, shape: &BasicShape, opts: &RenderOptions) {
    let b = shape.bounds();
    let border = Stroke::solid(Rgba::BLACK);
    match shape.kind() {
        ShapeKind::Rectangle => {
            surface.fill_rect(b, Rgba::LIGHT_GRAY);
            surface.stroke_rect(b, border);
            for row in [b.h / 3, 2 * b.h / 3] {
                surface.line(
                    Point::new(b.x, b.y + row),
                    Point::new(b.right(), b.y + row),
                    border,
                );
            }
        }
        ShapeKind::Oval => {
            surface.fill_ellipse(b, Rgba::LIGHT_GRAY);
            surface.stroke_ellipse(b, border);
        }
    }
    draw_label(surface, shape);
    if shape.is_selected() {
        for port in shape.ports() {
            surface.fill_rect(square_at(port.position, opts.port_marker_size), Rgba::BLACK);
        }
    }
}

fn draw_label(surface: &mut dyn Surface, shape: &BasicShape) {
    if shape.label.is_empty() {
        return;
    }
    let style = shape.label_style;
    let center = shape.bounds().center();
    let (tw, th) = surface.measure_text(&shape.label, style.font_size);
    let w = tw + LABEL_PADDING;
    let frame = Rect::new(center.x - w / 2, center.y - th / 2, w, th);
    let border = Stroke::solid(Rgba::BLACK);
    match style.shape {
        LabelShape::Rect => {
            surface.fill_rect(frame, style.color);
            surface.stroke_rect(frame, border);
        }
        LabelShape::Oval => {
            surface.fill_ellipse(frame, style.color);
            surface.stroke_ellipse(frame, border);
        }
    }
    surface.text(center, &shape.label, style.font_size, Rgba::BLACK);
}

/// Points of the end terminator, tip first. Empty for a zero-length link.
pub fn terminator(kind: LinkKind, start: Point, tip: Point, size: i32) -> Vec<Point> {
    let dx = f64::from(tip.x - start.x);
    let dy = f64::from(tip.y - start.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f64::EPSILON {
        return Vec::new();
    }
    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);
    let s = f64::from(size);
    let at = |back: f64, side: f64| {
        Point::new(
            (f64::from(tip.x) - back * ux + side * px).round() as i32,
            (f64::from(tip.y) - back * uy + side * py).round() as i32,
        )
    };
    match kind {
        LinkKind::Association | LinkKind::Generalization => {
            vec![tip, at(s, s / 2.0), at(s, -s / 2.0)]
        }
        LinkKind::Composition => vec![tip, at(s, s / 2.0), at(2.0 * s, 0.0), at(s, -s / 2.0)],
    }
}

fn draw_link(surface: &mut dyn Surface, link: &Link, opts: &RenderOptions) {
    let black = Stroke::solid(Rgba::BLACK);
    surface.line(link.start(), link.end(), black);
    let head = terminator(link.kind(), link.start(), link.end(), opts.arrow_size);
    if head.is_empty() {
        return;
    }
    match link.kind() {
        LinkKind::Association | LinkKind::Composition => surface.fill_polygon(&head, Rgba::BLACK),
        LinkKind::Generalization => {
            surface.fill_polygon(&head, Rgba::WHITE);
            surface.stroke_polygon(&head, black);
        }
    }
}

fn draw_composite(surface: &mut dyn Surface, group: &CompositeShape, opts: &RenderOptions) {
    let mut children: Vec<&Shape> = group.children().iter().collect();
    children.sort_by_key(|s| s.depth());
    for child in children {
        draw_shape(surface, child, opts);
    }
    if group.is_selected() {
        let b = group.bounds();
        surface.stroke_rect(b, Stroke::dashed(Rgba::BLACK));
        for corner in [
            Point::new(b.x, b.y),
            Point::new(b.right(), b.y),
            Point::new(b.x, b.bottom()),
            Point::new(b.right(), b.bottom()),
        ] {
            surface.fill_rect(square_at(corner, HANDLE_SIZE), Rgba::BLACK);
        }
    }
}

pub fn draw_rubber_band(surface: &mut dyn Surface, band: &SelectionRectangle) {
    let r = band.rect();
    surface.fill_rect(r, Rgba::BLUE.with_alpha(30));
    surface.stroke_rect(r, Stroke::dashed(Rgba::BLUE));
}
