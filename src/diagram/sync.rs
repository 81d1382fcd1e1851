use std::collections::HashSet;

use log::debug;

use super::ports::Port;
use super::shape::{Shape, ShapeId, collect_all_ports, find_in};

/// Keeps link endpoints glued to their ports after a shape moves.
pub struct LinkSynchronizer;

impl LinkSynchronizer {
    /// Re-derives the endpoints affected by moving `moved` by (`dx`, `dy`).
    ///
    /// Ports are snapshotted before any link is touched, so every lookup sees
    /// the post-move geometry of the whole diagram.
    pub fn sync_after_move(shapes: &mut [Shape], moved: ShapeId, dx: i32, dy: i32) {
        let Some(root) = find_in(shapes, moved) else {
            return;
        };
        if matches!(root, Shape::Link(_)) {
            return;
        }
        let mut moved_basics = Vec::new();
        root.basic_ids(&mut moved_basics);
        let mut inner = Vec::new();
        root.descendant_ids(&mut inner);
        let inner: HashSet<ShapeId> = inner.into_iter().collect();

        let table = collect_all_ports(shapes);
        let mut touched = 0usize;
        for shape in shapes.iter_mut() {
            shape.for_each_link_mut(&mut |link| {
                if inner.contains(&link.id) {
                    link.update_position(&table);
                    touched += 1;
                    return;
                }
                for basic in &moved_basics {
                    if link.is_related_to(*basic) {
                        let ports: &[Port] = table.get(basic).map(Vec::as_slice).unwrap_or_default();
                        link.update_endpoint_for_shape(*basic, ports, dx, dy);
                        touched += 1;
                    }
                }
            });
        }
        debug!(shape = moved.0, links = touched; "Synced links after move");
    }

    /// Re-derives every bound end in the diagram from the current ports.
    ///
    /// Run once after a batch of moves, so a link that was translated along
    /// with its endpoint shapes lands back on its ports.
    pub fn resync_all(shapes: &mut [Shape]) {
        let table = collect_all_ports(shapes);
        let mut touched = 0usize;
        for shape in shapes.iter_mut() {
            shape.for_each_link_mut(&mut |link| {
                link.update_position(&table);
                touched += 1;
            });
        }
        debug!(links = touched; "Re-derived all link ends");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::basic::BasicShape;
    use crate::diagram::composite::CompositeShape;
    use crate::diagram::geometry::{Point, Rect};
    use crate::diagram::link::{Link, LinkKind};
    use crate::diagram::ports::{ShapeKind, rect_port};

    fn square(id: u64, x: i32, y: i32) -> Shape {
        BasicShape::new(ShapeId(id), ShapeKind::Rectangle, Rect::new(x, y, 40, 40), id).into()
    }

    fn link(id: u64, from: &Shape, at: Point, to: &Shape, end: Point) -> Shape {
        let mut l = Link::pending(ShapeId(id), LinkKind::Association, id, from, at).unwrap();
        l.bind_end(to, end).unwrap();
        l.into()
    }

    #[test]
    fn outer_link_follows_moved_basic() {
        let a = square(1, 0, 0);
        let b = square(2, 100, 0);
        let l = link(3, &a, Point::new(40, 20), &b, Point::new(100, 20));
        let mut shapes = vec![a, b, l];

        shapes[0].move_by(10, 30);
        LinkSynchronizer::sync_after_move(&mut shapes, ShapeId(1), 10, 30);

        let moved = shapes[0].as_basic().unwrap();
        let l = shapes[2].as_link().unwrap();
        assert_eq!(Some(l.start()), moved.port(rect_port::RIGHT));
        assert_eq!(l.end(), Point::new(100, 20));
    }

    #[test]
    fn grouped_link_to_outside_shape_is_refreshed() {
        let a = square(1, 0, 0);
        let b = square(2, 100, 0);
        let c = square(4, 0, 200);
        let ab = link(3, &a, Point::new(40, 20), &b, Point::new(100, 20));
        let bc = link(5, &b, Point::new(120, 40), &c, Point::new(20, 200));
        let group = CompositeShape::with_children(ShapeId(9), 9, vec![a, b, bc]).unwrap();
        let mut shapes = vec![group.into(), c, ab];

        shapes[0].move_by(0, 50);
        LinkSynchronizer::sync_after_move(&mut shapes, ShapeId(9), 0, 50);

        let group = shapes[0].as_composite().unwrap();
        let bc = group.children()[2].as_link().unwrap();
        assert_eq!(bc.start(), Point::new(120, 90));
        assert_eq!(bc.end(), Point::new(20, 200));

        let ab = shapes[2].as_link().unwrap();
        assert_eq!(ab.start(), Point::new(40, 70));
        assert_eq!(ab.end(), Point::new(100, 70));
    }

    #[test]
    fn moving_a_link_touches_nothing_else() {
        let a = square(1, 0, 0);
        let b = square(2, 100, 0);
        let l = link(3, &a, Point::new(40, 20), &b, Point::new(100, 20));
        let mut shapes = vec![a, b, l];
        let before = shapes.clone();

        shapes[2].move_by(5, 5);
        LinkSynchronizer::sync_after_move(&mut shapes, ShapeId(3), 5, 5);
        assert_eq!(shapes[..2], before[..2]);
        assert_eq!(shapes[2].as_link().unwrap().start(), Point::new(45, 25));
    }

    #[test]
    fn resync_pulls_translated_link_back_onto_ports() {
        let a = square(1, 0, 0);
        let b = square(2, 100, 0);
        let l = link(3, &a, Point::new(40, 20), &b, Point::new(100, 20));
        let mut shapes = vec![a, b, l];

        shapes[0].move_by(10, 10);
        LinkSynchronizer::sync_after_move(&mut shapes, ShapeId(1), 10, 10);
        shapes[2].move_by(10, 10);
        LinkSynchronizer::resync_all(&mut shapes);

        let l = shapes[2].as_link().unwrap();
        assert_eq!(Some(l.start()), shapes[0].as_basic().unwrap().port(rect_port::RIGHT));
        assert_eq!(Some(l.end()), shapes[1].as_basic().unwrap().port(rect_port::LEFT));
    }
}
