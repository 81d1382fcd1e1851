//! Connection anchors generated from a shape's bounds.
//!
//! Ports are never stored on their own: callers regenerate the whole list
//! from the current bounds, so an index always names the same relative
//! anchor.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Oval,
}

impl ShapeKind {
    pub fn port_count(self) -> usize {
        match self {
            ShapeKind::Rectangle => 8,
            ShapeKind::Oval => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Oval => "Oval",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Port {
    pub index: usize,
    pub position: Point,
}

pub mod rect_port {
    pub const TOP_LEFT: usize = 0;
    pub const TOP: usize = 1;
    pub const TOP_RIGHT: usize = 2;
    pub const LEFT: usize = 3;
    pub const RIGHT: usize = 4;
    pub const BOTTOM_LEFT: usize = 5;
    pub const BOTTOM: usize = 6;
    pub const BOTTOM_RIGHT: usize = 7;
}

pub mod oval_port {
    pub const TOP: usize = 0;
    pub const LEFT: usize = 1;
    pub const RIGHT: usize = 2;
    pub const BOTTOM: usize = 3;
}

pub fn generate_ports(kind: ShapeKind, b: Rect) -> Vec<Port> {
    let (x, y, w, h) = (b.x, b.y, b.w, b.h);
    let positions: Vec<Point> = match kind {
        ShapeKind::Rectangle => vec![
            Point::new(x, y),
            Point::new(x + w / 2, y),
            Point::new(x + w, y),
            Point::new(x, y + h / 2),
            Point::new(x + w, y + h / 2),
            Point::new(x, y + h),
            Point::new(x + w / 2, y + h),
            Point::new(x + w, y + h),
        ],
        ShapeKind::Oval => vec![
            Point::new(x + w / 2, y),
            Point::new(x, y + h / 2),
            Point::new(x + w, y + h / 2),
            Point::new(x + w / 2, y + h),
        ],
    };
    positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| Port { index, position })
        .collect()
}

/// First port with the minimum Euclidean distance to `p`.
pub fn nearest_port(ports: &[Port], p: Point) -> Option<&Port> {
    let mut best: Option<(&Port, f64)> = None;
    for port in ports {
        let d = port.position.distance(p);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((port, d)),
        }
    }
    best.map(|(port, _)| port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_layout_walks_the_perimeter() {
        let ports = generate_ports(ShapeKind::Rectangle, Rect::new(10, 10, 100, 60));
        let pts: Vec<Point> = ports.iter().map(|p| p.position).collect();
        assert_eq!(
            pts,
            vec![
                Point::new(10, 10),
                Point::new(60, 10),
                Point::new(110, 10),
                Point::new(10, 40),
                Point::new(110, 40),
                Point::new(10, 70),
                Point::new(60, 70),
                Point::new(110, 70),
            ]
        );
        assert!(ports.iter().enumerate().all(|(i, p)| p.index == i));
    }

    #[test]
    fn oval_layout_is_cardinal() {
        let ports = generate_ports(ShapeKind::Oval, Rect::new(200, 10, 100, 80));
        assert_eq!(ports.len(), 4);
        assert_eq!(ports[oval_port::TOP].position, Point::new(250, 10));
        assert_eq!(ports[oval_port::LEFT].position, Point::new(200, 50));
        assert_eq!(ports[oval_port::RIGHT].position, Point::new(300, 50));
        assert_eq!(ports[oval_port::BOTTOM].position, Point::new(250, 90));
    }

    #[test]
    fn nearest_port_of_empty_list_is_none() {
        assert!(nearest_port(&[], Point::new(0, 0)).is_none());
    }

    #[test]
    fn nearest_port_prefers_first_on_ties() {
        let ports = generate_ports(ShapeKind::Rectangle, Rect::new(0, 0, 0, 0));
        assert_eq!(nearest_port(&ports, Point::new(3, 3)).map(|p| p.index), Some(0));
    }

    #[test]
    fn nearest_port_finds_right_mid() {
        let ports = generate_ports(ShapeKind::Rectangle, Rect::new(10, 10, 100, 60));
        let p = nearest_port(&ports, Point::new(105, 42)).unwrap();
        assert_eq!(p.index, rect_port::RIGHT);
    }
}
