use super::Mode;
use super::basic::BasicShape;
use super::geometry::{Point, Rect};
use super::link::LinkKind;
use super::ports::ShapeKind;
use super::shape::ShapeId;
use crate::settings::EditorSettings;

/// What a press in a given mode starts building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blueprint {
    Basic(ShapeKind),
    Link(LinkKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeFactory {
    rect_size: (i32, i32),
    oval_size: (i32, i32),
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::from_settings(&EditorSettings::default())
    }
}

impl ShapeFactory {
    pub fn from_settings(settings: &EditorSettings) -> Self {
        let [rw, rh] = settings.rect_size;
        let [ow, oh] = settings.oval_size;
        Self {
            rect_size: (rw.max(1), rh.max(1)),
            oval_size: (ow.max(1), oh.max(1)),
        }
    }

    pub fn blueprint(mode: Mode) -> Option<Blueprint> {
        match mode {
            Mode::Select => None,
            Mode::Rect => Some(Blueprint::Basic(ShapeKind::Rectangle)),
            Mode::Oval => Some(Blueprint::Basic(ShapeKind::Oval)),
            Mode::Association => Some(Blueprint::Link(LinkKind::Association)),
            Mode::Generalization => Some(Blueprint::Link(LinkKind::Generalization)),
            Mode::Composition => Some(Blueprint::Link(LinkKind::Composition)),
        }
    }

    /// Fixed-size bounds anchored at `at`.
    pub fn default_bounds(&self, kind: ShapeKind, at: Point) -> Rect {
        let (w, h) = match kind {
            ShapeKind::Rectangle => self.rect_size,
            ShapeKind::Oval => self.oval_size,
        };
        Rect::new(at.x, at.y, w, h)
    }

    pub fn basic(&self, kind: ShapeKind, id: ShapeId, depth: u64, at: Point) -> BasicShape {
        BasicShape::new(id, kind, self.default_bounds(kind, at), depth)
    }
}
