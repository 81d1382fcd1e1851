use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};
use super::ports::{Port, ShapeKind, generate_ports, nearest_port};
use super::shape::ShapeId;
use crate::surface::Rgba;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LabelShape {
    #[default]
    Rect,
    Oval,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelStyle {
    pub shape: LabelShape,
    pub color: Rgba,
    pub font_size: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            shape: LabelShape::Rect,
            color: Rgba::LIGHT_GRAY,
            font_size: 12,
        }
    }
}

/// Leaf diagram node: a rectangle or an oval with ports and a label.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicShape {
    pub(crate) id: ShapeId,
    kind: ShapeKind,
    bounds: Rect,
    ports: Vec<Port>,
    pub label: String,
    pub label_style: LabelStyle,
    pub(crate) selected: bool,
    pub(crate) depth: u64,
}

impl BasicShape {
    pub fn new(id: ShapeId, kind: ShapeKind, bounds: Rect, depth: u64) -> Self {
        Self {
            id,
            kind,
            bounds,
            ports: generate_ports(kind, bounds),
            label: String::new(),
            label_style: LabelStyle::default(),
            selected: false,
            depth,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port(&self, index: usize) -> Option<Point> {
        self.ports.get(index).map(|p| p.position)
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn regenerate_ports(&mut self) {
        self.ports = generate_ports(self.kind, self.bounds);
    }

    pub fn resize(&mut self, start: Point, end: Point) {
        self.bounds = Rect::from_corners(start, end);
        self.regenerate_ports();
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.regenerate_ports();
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.bounds.translate(dx, dy);
        self.regenerate_ports();
    }

    pub fn nearest_port(&self, p: Point) -> Option<&Port> {
        nearest_port(&self.ports, p)
    }

    pub fn contains(&self, p: Point) -> bool {
        match self.kind {
            ShapeKind::Rectangle => self.bounds.contains_point(p),
            ShapeKind::Oval => {
                let b = self.bounds;
                if b.is_empty() {
                    return false;
                }
                let rx = f64::from(b.w) / 2.0;
                let ry = f64::from(b.h) / 2.0;
                let dx = (f64::from(p.x) - (f64::from(b.x) + rx)) / rx;
                let dy = (f64::from(p.y) - (f64::from(b.y) + ry)) / ry;
                dx * dx + dy * dy < 1.0
            }
        }
    }

    pub fn set_label(&mut self, text: impl Into<String>, style: LabelStyle) {
        self.label = text.into();
        self.label_style = style;
    }

    pub fn rename(&mut self, text: impl Into<String>) {
        self.label = text.into();
    }
}
