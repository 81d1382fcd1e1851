use super::geometry::{Point, Rect};
use super::link::Link;
use super::shape::{HitTolerance, PortTable, Shape, ShapeId};
use crate::error::DiagramError;

/// A group that owns its children and moves them as one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeShape {
    pub(crate) id: ShapeId,
    children: Vec<Shape>,
    bounds: Rect,
    pub(crate) selected: bool,
    pub(crate) depth: u64,
}

impl CompositeShape {
    pub fn new(id: ShapeId, depth: u64) -> Self {
        Self {
            id,
            children: Vec::new(),
            bounds: Rect::default(),
            selected: false,
            depth,
        }
    }

    pub fn with_children(
        id: ShapeId,
        depth: u64,
        children: Vec<Shape>,
    ) -> Result<Self, DiagramError> {
        let mut group = Self::new(id, depth);
        for child in children {
            group.add_shape(child)?;
        }
        Ok(group)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Shape] {
        &mut self.children
    }

    pub fn into_children(self) -> Vec<Shape> {
        self.children
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Adds `shape` as a direct child.
    ///
    /// Rejects the group itself, a subtree that contains the group, and any
    /// node already present somewhere below this group.
    pub fn add_shape(&mut self, shape: Shape) -> Result<(), DiagramError> {
        let member = shape.id();
        if member == self.id || shape.contains_id(self.id) {
            return Err(DiagramError::InvalidMembership {
                group: self.id,
                member,
            });
        }
        let mut incoming = vec![member];
        shape.descendant_ids(&mut incoming);
        if incoming
            .iter()
            .any(|id| self.children.iter().any(|c| c.contains_id(*id)))
        {
            return Err(DiagramError::InvalidMembership {
                group: self.id,
                member,
            });
        }
        self.children.push(shape);
        self.recompute_bounds();
        Ok(())
    }

    fn recompute_bounds(&mut self) {
        self.bounds = self
            .children
            .iter()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
    }

    fn near_border(&self, p: Point, tolerance: i32) -> bool {
        let b = self.bounds;
        let edge = (p.x - b.x)
            .min(b.right() - p.x)
            .min(p.y - b.y)
            .min(b.bottom() - p.y);
        edge <= tolerance
    }

    pub fn contains(&self, p: Point, tol: &HitTolerance) -> bool {
        if !self.bounds.contains_point(p) {
            return false;
        }
        self.children.iter().any(|c| c.contains(p, tol)) || self.near_border(p, tol.group_border)
    }

    /// Translates every child, then snaps the group's own links back onto
    /// the moved ports.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        for child in &mut self.children {
            child.move_by(dx, dy);
        }
        let mut table = PortTable::new();
        for child in &self.children {
            child.collect_ports(&mut table);
        }
        for child in &mut self.children {
            if let Shape::Link(link) = child {
                link.update_position(&table);
            }
        }
        self.bounds.translate(dx, dy);
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        for child in &mut self.children {
            child.set_selected(selected);
        }
    }

    pub fn is_related_to_link(&self, link: &Link) -> bool {
        self.children.iter().any(|c| c.is_related_to_link(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::basic::BasicShape;
    use crate::diagram::link::LinkKind;
    use crate::diagram::ports::ShapeKind;

    fn square(id: u64, x: i32) -> Shape {
        BasicShape::new(ShapeId(id), ShapeKind::Rectangle, Rect::new(x, 0, 40, 40), id).into()
    }

    #[test]
    fn bounds_are_union_of_children() {
        let g = CompositeShape::with_children(ShapeId(9), 9, vec![square(1, 0), square(2, 100)])
            .unwrap();
        assert_eq!(g.bounds(), Rect::new(0, 0, 140, 40));
        assert_eq!(CompositeShape::new(ShapeId(8), 8).bounds(), Rect::default());
    }

    #[test]
    fn contains_needs_child_or_border_band() {
        let g = CompositeShape::with_children(ShapeId(9), 9, vec![square(1, 0), square(2, 100)])
            .unwrap();
        let tol = HitTolerance::default();
        assert!(g.contains(Point::new(20, 20), &tol));
        assert!(g.contains(Point::new(70, 2), &tol));
        assert!(!g.contains(Point::new(70, 20), &tol));
        assert!(!g.contains(Point::new(200, 20), &tol));
    }

    #[test]
    fn rejects_self_and_duplicates() {
        let mut g = CompositeShape::with_children(ShapeId(9), 9, vec![square(1, 0)]).unwrap();
        let err = g.add_shape(square(1, 50)).unwrap_err();
        assert_eq!(
            err,
            DiagramError::InvalidMembership {
                group: ShapeId(9),
                member: ShapeId(1)
            }
        );
        let same_id: Shape = CompositeShape::new(ShapeId(9), 10).into();
        assert!(g.add_shape(same_id).is_err());
        assert_eq!(g.children().len(), 1);
    }

    #[test]
    fn selection_cascades_to_descendants() {
        let inner = CompositeShape::with_children(ShapeId(10), 10, vec![square(1, 0)]).unwrap();
        let mut outer =
            CompositeShape::with_children(ShapeId(11), 11, vec![inner.into(), square(2, 60)])
                .unwrap();
        outer.set_selected(true);
        let mut ids = Vec::new();
        Shape::from(outer.clone()).descendant_ids(&mut ids);
        for id in ids {
            assert!(Shape::from(outer.clone()).find(id).unwrap().is_selected());
        }
        outer.set_selected(false);
        assert!(!outer.children()[0].is_selected());
    }

    #[test]
    fn moving_group_keeps_inner_link_on_ports() {
        let a = square(1, 0);
        let b = square(2, 100);
        let mut link = Link::pending(ShapeId(3), LinkKind::Association, 3, &a, Point::new(40, 20))
            .unwrap();
        link.bind_end(&b, Point::new(100, 20)).unwrap();
        let mut g =
            CompositeShape::with_children(ShapeId(9), 9, vec![a, b, link.into()]).unwrap();

        g.move_by(15, -5);
        let link = g.children()[2].as_link().unwrap();
        assert_eq!(link.start(), Point::new(55, 15));
        assert_eq!(link.end(), Point::new(115, 15));
        assert_eq!(g.bounds(), Rect::new(15, -5, 140, 40));
        assert!(g.is_related_to_link(link));
    }
}
