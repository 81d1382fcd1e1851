use log::debug;

use super::geometry::{Point, Rect, distance_to_segment};
use super::ports::Port;
use super::shape::{PortTable, Shape, ShapeId};
use crate::error::DiagramError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Association,
    Generalization,
    Composition,
}

impl LinkKind {
    pub fn name(self) -> &'static str {
        match self {
            LinkKind::Association => "Association",
            LinkKind::Generalization => "Generalization",
            LinkKind::Composition => "Composition",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    /// Start attached, free end follows the cursor.
    Pending,
    /// Both ends attached to ports of two distinct basic shapes.
    Bound,
    /// Terminal. Never kept in a diagram.
    Discarded,
}

/// Non-owning reference to a port of a basic shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub shape: ShapeId,
    pub port: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub(crate) id: ShapeId,
    kind: LinkKind,
    start: Point,
    end: Point,
    start_binding: Option<Endpoint>,
    end_binding: Option<Endpoint>,
    state: LinkState,
    pub(crate) selected: bool,
    pub(crate) depth: u64,
}

fn snap_to_port(target: &Shape, p: Point) -> Result<Endpoint, DiagramError> {
    let Shape::Basic(basic) = target else {
        return Err(DiagramError::invalid_connection(
            "links can only attach to basic shapes",
        ));
    };
    let port = basic
        .nearest_port(p)
        .ok_or_else(|| DiagramError::invalid_connection("shape has no ports"))?;
    Ok(Endpoint {
        shape: basic.id(),
        port: port.index,
    })
}

fn port_position(target: &Shape, index: usize) -> Option<Point> {
    target.as_basic().and_then(|b| b.port(index))
}

impl Link {
    /// Starts a link on the port of `source` nearest to `press`.
    pub fn pending(
        id: ShapeId,
        kind: LinkKind,
        depth: u64,
        source: &Shape,
        press: Point,
    ) -> Result<Self, DiagramError> {
        let binding = snap_to_port(source, press)?;
        let start = port_position(source, binding.port).unwrap_or(press);
        debug!(link = id.0, shape = binding.shape.0, port = binding.port; "Link pending");
        Ok(Self {
            id,
            kind,
            start,
            end: start,
            start_binding: Some(binding),
            end_binding: None,
            state: LinkState::Pending,
            selected: false,
            depth,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn start_binding(&self) -> Option<Endpoint> {
        self.start_binding
    }

    pub fn end_binding(&self) -> Option<Endpoint> {
        self.end_binding
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Moves the free end of a pending link to the raw cursor position.
    pub fn drag_to(&mut self, p: Point) {
        if self.state == LinkState::Pending {
            self.end = p;
        }
    }

    /// Attaches the free end to `target`. On failure the link is unchanged.
    pub fn bind_end(&mut self, target: &Shape, p: Point) -> Result<(), DiagramError> {
        if self.state != LinkState::Pending {
            return Err(DiagramError::invalid_connection("link is not pending"));
        }
        let binding = snap_to_port(target, p)?;
        if self.start_binding.is_some_and(|s| s.shape == binding.shape) {
            return Err(DiagramError::invalid_connection(
                "a link cannot connect a shape to itself",
            ));
        }
        self.end = port_position(target, binding.port).unwrap_or(p);
        self.end_binding = Some(binding);
        self.state = LinkState::Bound;
        debug!(link = self.id.0, shape = binding.shape.0, port = binding.port; "Link bound");
        Ok(())
    }

    /// Reattaches the start end. Validated against the end if that is bound.
    pub fn bind_start(&mut self, source: &Shape, p: Point) -> Result<(), DiagramError> {
        if self.state == LinkState::Discarded {
            return Err(DiagramError::invalid_connection("link was discarded"));
        }
        let binding = snap_to_port(source, p)?;
        if self.end_binding.is_some_and(|e| e.shape == binding.shape) {
            return Err(DiagramError::invalid_connection(
                "a link cannot connect a shape to itself",
            ));
        }
        self.start = port_position(source, binding.port).unwrap_or(p);
        self.start_binding = Some(binding);
        Ok(())
    }

    pub fn discard(&mut self) {
        debug!(link = self.id.0; "Link discarded");
        self.state = LinkState::Discarded;
    }

    pub fn is_related_to(&self, shape: ShapeId) -> bool {
        self.start_binding.is_some_and(|b| b.shape == shape)
            || self.end_binding.is_some_and(|b| b.shape == shape)
    }

    /// Re-derives every end bound to `shape` from its fresh `ports`.
    ///
    /// An index outside `ports` falls back to shifting the last known point.
    pub fn update_endpoint_for_shape(&mut self, shape: ShapeId, ports: &[Port], dx: i32, dy: i32) {
        if let Some(b) = self.start_binding.filter(|b| b.shape == shape) {
            self.start = match ports.get(b.port) {
                Some(port) => port.position,
                None => self.start.offset(dx, dy),
            };
        }
        if let Some(b) = self.end_binding.filter(|b| b.shape == shape) {
            self.end = match ports.get(b.port) {
                Some(port) => port.position,
                None => self.end.offset(dx, dy),
            };
        }
    }

    /// Re-derives each bound end whose shape and index resolve in `table`.
    pub fn update_position(&mut self, table: &PortTable) {
        let resolve = |b: Option<Endpoint>| {
            b.and_then(|b| table.get(&b.shape))
                .zip(b)
                .and_then(|(ports, b)| ports.get(b.port))
                .map(|p| p.position)
        };
        if let Some(p) = resolve(self.start_binding) {
            self.start = p;
        }
        if let Some(p) = resolve(self.end_binding) {
            self.end = p;
        }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.start = self.start.offset(dx, dy);
        self.end = self.end.offset(dx, dy);
    }

    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        distance_to_segment(p, self.start, self.end) < tolerance
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::basic::BasicShape;
    use crate::diagram::composite::CompositeShape;
    use crate::diagram::ports::{ShapeKind, oval_port, rect_port};

    fn rect() -> Shape {
        BasicShape::new(ShapeId(1), ShapeKind::Rectangle, Rect::new(10, 10, 100, 60), 0).into()
    }

    fn oval() -> Shape {
        BasicShape::new(ShapeId(2), ShapeKind::Oval, Rect::new(200, 10, 100, 80), 1).into()
    }

    #[test]
    fn press_release_binds_both_ports() {
        let (r, o) = (rect(), oval());
        let mut link =
            Link::pending(ShapeId(3), LinkKind::Association, 2, &r, Point::new(108, 40)).unwrap();
        assert_eq!(link.state(), LinkState::Pending);
        assert_eq!(link.start(), Point::new(110, 40));

        link.drag_to(Point::new(150, 47));
        assert_eq!(link.end(), Point::new(150, 47));

        link.bind_end(&o, Point::new(203, 52)).unwrap();
        assert_eq!(link.state(), LinkState::Bound);
        assert_eq!(link.end(), Point::new(200, 50));
        assert_eq!(link.start_binding().map(|b| b.port), Some(rect_port::RIGHT));
        assert_eq!(link.end_binding().map(|b| b.port), Some(oval_port::LEFT));
    }

    #[test]
    fn binding_to_self_is_rejected_without_state_change() {
        let r = rect();
        let mut link =
            Link::pending(ShapeId(3), LinkKind::Composition, 2, &r, Point::new(12, 12)).unwrap();
        link.drag_to(Point::new(60, 60));
        let before = link.clone();

        let err = link.bind_end(&r, Point::new(100, 60)).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidConnection { .. }));
        assert_eq!(link, before);
    }

    #[test]
    fn binding_to_group_is_rejected() {
        let group =
            CompositeShape::with_children(ShapeId(9), 9, vec![oval()]).unwrap();
        let group: Shape = group.into();
        let mut link =
            Link::pending(ShapeId(3), LinkKind::Generalization, 2, &rect(), Point::new(12, 12))
                .unwrap();
        assert!(link.bind_end(&group, Point::new(250, 50)).is_err());
        assert_eq!(link.state(), LinkState::Pending);
    }

    #[test]
    fn pending_requires_basic_source() {
        let group: Shape = CompositeShape::with_children(ShapeId(9), 9, vec![rect()])
            .unwrap()
            .into();
        assert!(Link::pending(ShapeId(3), LinkKind::Association, 2, &group, Point::new(12, 12)).is_err());
    }

    #[test]
    fn endpoint_update_falls_back_to_delta_when_index_out_of_range() {
        let (r, o) = (rect(), oval());
        let mut link =
            Link::pending(ShapeId(3), LinkKind::Association, 2, &r, Point::new(110, 40)).unwrap();
        link.bind_end(&o, Point::new(300, 50)).unwrap();

        link.update_endpoint_for_shape(ShapeId(2), &[], 4, -2);
        assert_eq!(link.end(), Point::new(304, 48));
        assert_eq!(link.start(), Point::new(110, 40));
    }

    #[test]
    fn hit_test_uses_clamped_segment_distance() {
        let (r, o) = (rect(), oval());
        let mut link =
            Link::pending(ShapeId(3), LinkKind::Association, 2, &r, Point::new(110, 40)).unwrap();
        link.bind_end(&o, Point::new(200, 50)).unwrap();

        assert!(link.contains(Point::new(155, 47), 5.0));
        assert!(!link.contains(Point::new(155, 60), 5.0));
        assert!(!link.contains(Point::new(90, 40), 5.0));
    }

    #[test]
    fn discarded_link_rejects_binding() {
        let (r, o) = (rect(), oval());
        let mut link =
            Link::pending(ShapeId(3), LinkKind::Association, 2, &r, Point::new(110, 40)).unwrap();
        link.discard();
        assert!(link.bind_end(&o, Point::new(200, 50)).is_err());
        assert_eq!(link.state(), LinkState::Discarded);
    }
}
