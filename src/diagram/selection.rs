use super::geometry::{Point, Rect};
use super::shape::{HitTolerance, Shape, ShapeId};

/// Rubber band spanning the press point and the current cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRectangle {
    anchor: Point,
    rect: Rect,
}

impl SelectionRectangle {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            rect: Rect::new(anchor.x, anchor.y, 0, 0),
        }
    }

    pub fn update(&mut self, current: Point) {
        self.rect = Rect::from_corners(self.anchor, current);
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

pub struct SelectionEngine;

impl SelectionEngine {
    /// Top-most top-level shape under `p`, by depth.
    pub fn hit_test(shapes: &[Shape], p: Point, tol: &HitTolerance) -> Option<ShapeId> {
        shapes
            .iter()
            .filter(|s| s.contains(p, tol))
            .max_by_key(|s| s.depth())
            .map(Shape::id)
    }

    /// Top-most top-level basic shape under `p`.
    pub fn hit_test_basic(shapes: &[Shape], p: Point) -> Option<ShapeId> {
        shapes
            .iter()
            .filter_map(Shape::as_basic)
            .filter(|s| s.contains(p))
            .max_by_key(|s| s.depth())
            .map(|s| s.id())
    }

    fn touches(shape: &Shape, area: &Rect) -> bool {
        match shape {
            Shape::Link(l) => {
                area.contains_point_inclusive(l.start())
                    || area.contains_point_inclusive(l.end())
                    || area.intersects_segment(l.start(), l.end())
            }
            _ => {
                let b = shape.bounds();
                area.intersects(&b) || area.contains_rect(&b)
            }
        }
    }

    /// Top-level shapes covered by `area`, in depth order.
    pub fn select_in_rect(shapes: &[Shape], area: Rect) -> Vec<ShapeId> {
        if area.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<&Shape> = shapes.iter().filter(|s| Self::touches(s, &area)).collect();
        hits.sort_by_key(|s| s.depth());
        hits.into_iter().map(Shape::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::basic::BasicShape;
    use crate::diagram::link::{Link, LinkKind};
    use crate::diagram::ports::ShapeKind;

    fn square(id: u64, x: i32, y: i32, depth: u64) -> Shape {
        BasicShape::new(ShapeId(id), ShapeKind::Rectangle, Rect::new(x, y, 40, 40), depth).into()
    }

    #[test]
    fn hit_test_prefers_deepest() {
        let shapes = vec![square(1, 0, 0, 5), square(2, 20, 20, 3)];
        let tol = HitTolerance::default();
        assert_eq!(SelectionEngine::hit_test(&shapes, Point::new(30, 30), &tol), Some(ShapeId(1)));
        assert_eq!(SelectionEngine::hit_test(&shapes, Point::new(50, 50), &tol), Some(ShapeId(2)));
        assert_eq!(SelectionEngine::hit_test(&shapes, Point::new(90, 90), &tol), None);
    }

    #[test]
    fn band_normalizes_drag_direction() {
        let mut band = SelectionRectangle::new(Point::new(50, 50));
        assert!(band.rect().is_empty());
        band.update(Point::new(10, 70));
        assert_eq!(band.rect(), Rect::new(10, 50, 40, 20));
        assert_eq!(band.anchor(), Point::new(50, 50));
    }

    #[test]
    fn link_selected_when_segment_crosses_band() {
        let a = square(1, 0, 0, 0);
        let b = square(2, 200, 0, 1);
        let mut l = Link::pending(ShapeId(3), LinkKind::Association, 2, &a, Point::new(40, 20))
            .unwrap();
        l.bind_end(&b, Point::new(200, 20)).unwrap();
        let shapes = vec![a, b, l.into()];

        let picked = SelectionEngine::select_in_rect(&shapes, Rect::new(100, 0, 20, 40));
        assert_eq!(picked, vec![ShapeId(3)]);
        let none = SelectionEngine::select_in_rect(&shapes, Rect::new(100, 30, 20, 40));
        assert!(none.is_empty());
    }
}
