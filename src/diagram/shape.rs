use std::collections::HashMap;
use std::fmt;

use super::basic::BasicShape;
use super::composite::CompositeShape;
use super::geometry::{Point, Rect};
use super::link::Link;
use super::ports::Port;

/// Stable identity of a diagram object. Links refer to shapes through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Distances used by point hit-testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTolerance {
    pub link: f64,
    pub group_border: i32,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            link: 5.0,
            group_border: 5,
        }
    }
}

/// Port positions keyed by the owning basic shape.
pub type PortTable = HashMap<ShapeId, Vec<Port>>;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Basic(BasicShape),
    Link(Link),
    Composite(CompositeShape),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Basic(s) => s.id,
            Shape::Link(l) => l.id,
            Shape::Composite(c) => c.id,
        }
    }

    pub fn depth(&self) -> u64 {
        match self {
            Shape::Basic(s) => s.depth,
            Shape::Link(l) => l.depth,
            Shape::Composite(c) => c.depth,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Basic(s) => s.bounds(),
            Shape::Link(l) => l.bounds(),
            Shape::Composite(c) => c.bounds(),
        }
    }

    pub fn contains(&self, p: Point, tol: &HitTolerance) -> bool {
        match self {
            Shape::Basic(s) => s.contains(p),
            Shape::Link(l) => l.contains(p, tol.link),
            Shape::Composite(c) => c.contains(p, tol),
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        match self {
            Shape::Basic(s) => s.move_by(dx, dy),
            Shape::Link(l) => l.translate(dx, dy),
            Shape::Composite(c) => c.move_by(dx, dy),
        }
    }

    /// Only basic shapes can be resized.
    pub fn resize(&mut self, start: Point, end: Point) {
        if let Shape::Basic(s) = self {
            s.resize(start, end);
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        match self {
            Shape::Basic(s) => s.selected = selected,
            Shape::Link(l) => l.selected = selected,
            Shape::Composite(c) => c.set_selected(selected),
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            Shape::Basic(s) => s.selected,
            Shape::Link(l) => l.selected,
            Shape::Composite(c) => c.selected,
        }
    }

    pub fn as_basic(&self) -> Option<&BasicShape> {
        match self {
            Shape::Basic(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_basic_mut(&mut self) -> Option<&mut BasicShape> {
        match self {
            Shape::Basic(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Shape::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeShape> {
        match self {
            Shape::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Shape::Composite(_))
    }

    /// Depth-first search of this subtree, self included.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Shape::Composite(c) => c.children().iter().find_map(|child| child.find(id)),
            _ => None,
        }
    }

    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Shape::Composite(c) => c
                .children_mut()
                .iter_mut()
                .find_map(|child| child.find_mut(id)),
            _ => None,
        }
    }

    pub fn contains_id(&self, id: ShapeId) -> bool {
        self.find(id).is_some()
    }

    /// Ids of every node strictly below this one.
    pub fn descendant_ids(&self, out: &mut Vec<ShapeId>) {
        if let Shape::Composite(c) = self {
            for child in c.children() {
                out.push(child.id());
                child.descendant_ids(out);
            }
        }
    }

    /// Ids of the basic shapes in this subtree, self included.
    pub fn basic_ids(&self, out: &mut Vec<ShapeId>) {
        match self {
            Shape::Basic(s) => out.push(s.id),
            Shape::Link(_) => {}
            Shape::Composite(c) => {
                for child in c.children() {
                    child.basic_ids(out);
                }
            }
        }
    }

    pub fn collect_ports(&self, table: &mut PortTable) {
        match self {
            Shape::Basic(s) => {
                table.insert(s.id, s.ports().to_vec());
            }
            Shape::Link(_) => {}
            Shape::Composite(c) => {
                for child in c.children() {
                    child.collect_ports(table);
                }
            }
        }
    }

    pub fn for_each_link_mut(&mut self, f: &mut dyn FnMut(&mut Link)) {
        match self {
            Shape::Basic(_) => {}
            Shape::Link(l) => f(l),
            Shape::Composite(c) => {
                for child in c.children_mut() {
                    child.for_each_link_mut(f);
                }
            }
        }
    }

    /// Whether `link` has a bound end on a basic shape in this subtree.
    pub fn is_related_to_link(&self, link: &Link) -> bool {
        match self {
            Shape::Basic(s) => link.is_related_to(s.id),
            Shape::Link(_) => false,
            Shape::Composite(c) => c.is_related_to_link(link),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Basic(s) => s.kind().name(),
            Shape::Link(l) => l.kind().name(),
            Shape::Composite(_) => "Group",
        }
    }
}

impl From<BasicShape> for Shape {
    fn from(s: BasicShape) -> Self {
        Shape::Basic(s)
    }
}

impl From<Link> for Shape {
    fn from(l: Link) -> Self {
        Shape::Link(l)
    }
}

impl From<CompositeShape> for Shape {
    fn from(c: CompositeShape) -> Self {
        Shape::Composite(c)
    }
}

pub fn collect_all_ports(shapes: &[Shape]) -> PortTable {
    let mut table = PortTable::new();
    for s in shapes {
        s.collect_ports(&mut table);
    }
    table
}

pub fn find_in<'a>(shapes: &'a [Shape], id: ShapeId) -> Option<&'a Shape> {
    shapes.iter().find_map(|s| s.find(id))
}

pub fn find_in_mut(shapes: &mut [Shape], id: ShapeId) -> Option<&mut Shape> {
    shapes.iter_mut().find_map(|s| s.find_mut(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::ports::ShapeKind;

    fn basic(id: u64, x: i32) -> Shape {
        BasicShape::new(ShapeId(id), ShapeKind::Rectangle, Rect::new(x, 0, 10, 10), id).into()
    }

    #[test]
    fn find_reaches_nested_children() {
        let inner = CompositeShape::with_children(ShapeId(10), 10, vec![basic(1, 0), basic(2, 20)])
            .unwrap();
        let outer =
            CompositeShape::with_children(ShapeId(11), 11, vec![inner.into(), basic(3, 40)])
                .unwrap();
        let outer: Shape = outer.into();

        assert_eq!(outer.find(ShapeId(2)).map(Shape::id), Some(ShapeId(2)));
        assert!(outer.find(ShapeId(99)).is_none());

        let mut basics = Vec::new();
        outer.basic_ids(&mut basics);
        assert_eq!(basics, vec![ShapeId(1), ShapeId(2), ShapeId(3)]);

        let mut all = Vec::new();
        outer.descendant_ids(&mut all);
        assert_eq!(all, vec![ShapeId(10), ShapeId(1), ShapeId(2), ShapeId(3)]);
    }

    #[test]
    fn resize_is_ignored_for_groups() {
        let group = CompositeShape::with_children(ShapeId(10), 10, vec![basic(1, 0), basic(2, 20)])
            .unwrap();
        let mut shape: Shape = group.into();
        let before = shape.bounds();
        shape.resize(Point::new(0, 0), Point::new(500, 500));
        assert_eq!(shape.bounds(), before);
    }
}
