//! The diagram engine: shapes, links, groups and the gesture state machine
//! that edits them.
//!
//! [`Diagram`] is the single entry point. It owns the top-level shapes, the
//! selection and the in-flight gesture, and it drives the helper components
//! ([`SelectionEngine`], [`GroupManager`], [`Deleter`], [`LinkSynchronizer`])
//! that keep links glued to their ports.

pub mod basic;
pub mod composite;
pub mod delete;
pub mod factory;
pub mod geometry;
pub mod group;
pub mod link;
pub mod ports;
pub mod render;
pub mod selection;
pub mod shape;
pub mod sync;

use log::{debug, warn};

pub use basic::{BasicShape, LabelShape, LabelStyle};
pub use composite::CompositeShape;
pub use delete::{DeleteReport, Deleter};
pub use factory::{Blueprint, ShapeFactory};
pub use geometry::{Point, Rect};
pub use group::GroupManager;
pub use link::{Endpoint, Link, LinkKind, LinkState};
pub use ports::{Port, ShapeKind};
pub use render::RenderOptions;
pub use selection::{SelectionEngine, SelectionRectangle};
pub use shape::{HitTolerance, Shape, ShapeId};
pub use sync::LinkSynchronizer;

use crate::error::DiagramError;
use crate::settings::EditorSettings;
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Select,
    Association,
    Generalization,
    Composition,
    Rect,
    Oval,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Select,
        Mode::Association,
        Mode::Generalization,
        Mode::Composition,
        Mode::Rect,
        Mode::Oval,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Select => "Select",
            Mode::Association => "Association",
            Mode::Generalization => "Generalization",
            Mode::Composition => "Composition",
            Mode::Rect => "Class",
            Mode::Oval => "Use case",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Press,
    Drag,
    Release,
}

/// A normalized pointer gesture step in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub phase: Phase,
    pub point: Point,
}

impl PointerEvent {
    pub fn press(x: i32, y: i32) -> Self {
        Self {
            phase: Phase::Press,
            point: Point::new(x, y),
        }
    }

    pub fn drag(x: i32, y: i32) -> Self {
        Self {
            phase: Phase::Drag,
            point: Point::new(x, y),
        }
    }

    pub fn release(x: i32, y: i32) -> Self {
        Self {
            phase: Phase::Release,
            point: Point::new(x, y),
        }
    }
}

#[derive(Clone, Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Creating {
        shape: BasicShape,
        anchor: Point,
    },
    Linking {
        link: Link,
    },
    Moving {
        last: Point,
    },
    RubberBand(SelectionRectangle),
}

pub struct Diagram {
    shapes: Vec<Shape>,
    selection: Vec<ShapeId>,
    mode: Mode,
    gesture: Gesture,
    next_id: u64,
    next_depth: u64,
    settings: EditorSettings,
    factory: ShapeFactory,
    tolerance: HitTolerance,
    render_options: RenderOptions,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Diagram {
    pub fn new(settings: EditorSettings) -> Self {
        let mut diagram = Self {
            shapes: Vec::new(),
            selection: Vec::new(),
            mode: Mode::Select,
            gesture: Gesture::Idle,
            next_id: 1,
            next_depth: 0,
            settings: EditorSettings::default(),
            factory: ShapeFactory::default(),
            tolerance: HitTolerance::default(),
            render_options: RenderOptions::default(),
        };
        diagram.apply_settings(settings);
        diagram
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: EditorSettings) {
        self.factory = ShapeFactory::from_settings(&settings);
        self.tolerance = HitTolerance {
            link: settings.link_hit_tolerance,
            group_border: settings.group_border_tolerance,
        };
        self.render_options = RenderOptions::from_settings(&settings);
        self.settings = settings;
    }

    fn alloc(&mut self) -> (ShapeId, u64) {
        let id = ShapeId(self.next_id);
        let depth = self.next_depth;
        self.next_id += 1;
        self.next_depth += 1;
        (id, depth)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches the editing mode, abandoning any half-finished gesture.
    pub fn set_mode(&mut self, mode: Mode) {
        if !matches!(self.gesture, Gesture::Idle) {
            debug!(mode = mode.label(); "Abandoning gesture on mode change");
        }
        self.gesture = Gesture::Idle;
        self.mode = mode;
        self.clear_selection();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        shape::find_in(&self.shapes, id)
    }

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// The link currently being drawn, if any.
    pub fn pending_link(&self) -> Option<&Link> {
        match &self.gesture {
            Gesture::Linking { link } => Some(link),
            _ => None,
        }
    }

    /// The rubber band currently being dragged, if any.
    pub fn rubber_band(&self) -> Option<&SelectionRectangle> {
        match &self.gesture {
            Gesture::RubberBand(band) => Some(band),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event.phase {
            Phase::Press => {
                if self.is_gesture_active() {
                    debug!(point = event.point.to_string(); "Finalizing stale gesture");
                    self.release(event.point);
                }
                self.press(event.point);
            }
            Phase::Drag => self.drag(event.point),
            Phase::Release => self.release(event.point),
        }
    }

    fn press(&mut self, p: Point) {
        match ShapeFactory::blueprint(self.mode) {
            None => {
                self.clear_selection();
                match self.hit_test(p) {
                    Some(id) => {
                        self.mark_selected(id);
                        self.gesture = Gesture::Moving { last: p };
                    }
                    None => {
                        self.gesture = Gesture::RubberBand(SelectionRectangle::new(p));
                    }
                }
            }
            Some(Blueprint::Basic(kind)) => {
                let (id, depth) = self.alloc();
                let mut shape = self.factory.basic(kind, id, depth, p);
                shape.label_style = self.settings.default_label;
                debug!(shape = id.0, kind = kind.name(); "Creating shape");
                self.gesture = Gesture::Creating { shape, anchor: p };
            }
            Some(Blueprint::Link(kind)) => {
                let Some(source) = SelectionEngine::hit_test_basic(&self.shapes, p) else {
                    debug!(point = p.to_string(); "Link press missed every shape");
                    return;
                };
                let (id, depth) = self.alloc();
                let Some(source) = self.shapes.iter().find(|s| s.id() == source) else {
                    return;
                };
                match Link::pending(id, kind, depth, source, p) {
                    Ok(link) => self.gesture = Gesture::Linking { link },
                    Err(e) => warn!(error = e.to_string(); "Could not start link"),
                }
            }
        }
    }

    fn drag(&mut self, p: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Creating { mut shape, anchor } => {
                shape.resize(anchor, p);
                self.gesture = Gesture::Creating { shape, anchor };
            }
            Gesture::Linking { mut link } => {
                link.drag_to(p);
                self.gesture = Gesture::Linking { link };
            }
            Gesture::Moving { last } => {
                self.move_selection(p.x - last.x, p.y - last.y);
                self.gesture = Gesture::Moving { last: p };
            }
            Gesture::RubberBand(mut band) => {
                band.update(p);
                self.gesture = Gesture::RubberBand(band);
            }
        }
    }

    fn release(&mut self, p: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Moving { .. } => {}
            Gesture::Creating { mut shape, anchor } => {
                if shape.bounds().is_empty() {
                    shape.set_bounds(self.factory.default_bounds(shape.kind(), anchor));
                }
                debug!(shape = shape.id().0, bounds = format!("{:?}", shape.bounds()); "Committed shape");
                self.shapes.push(shape.into());
            }
            Gesture::Linking { mut link } => {
                let target = SelectionEngine::hit_test_basic(&self.shapes, p)
                    .and_then(|id| self.shapes.iter().find(|s| s.id() == id));
                match target {
                    Some(target) => match link.bind_end(target, p) {
                        Ok(()) => self.shapes.push(link.into()),
                        Err(e) => {
                            warn!(error = e.to_string(); "Discarding link");
                            link.discard();
                        }
                    },
                    None => {
                        debug!(point = p.to_string(); "Link released over empty canvas");
                        link.discard();
                    }
                }
            }
            Gesture::RubberBand(mut band) => {
                band.update(p);
                for id in SelectionEngine::select_in_rect(&self.shapes, band.rect()) {
                    self.mark_selected(id);
                }
                debug!(selected = self.selection.len(); "Rubber band applied");
            }
        }
    }

    /// Places a default-sized shape anchored at `at`.
    pub fn create_shape(&mut self, kind: ShapeKind, at: Point) -> ShapeId {
        let (id, depth) = self.alloc();
        let mut shape = self.factory.basic(kind, id, depth, at);
        shape.label_style = self.settings.default_label;
        self.shapes.push(shape.into());
        id
    }

    /// Connects the top-level basic shapes under `from` and `to`.
    pub fn create_link(
        &mut self,
        kind: LinkKind,
        from: Point,
        to: Point,
    ) -> Result<ShapeId, DiagramError> {
        let source = SelectionEngine::hit_test_basic(&self.shapes, from)
            .ok_or_else(|| DiagramError::invalid_connection("no shape at link start"))?;
        let target = SelectionEngine::hit_test_basic(&self.shapes, to)
            .ok_or_else(|| DiagramError::invalid_connection("no shape at link end"))?;
        let find = |id: ShapeId| self.shapes.iter().find(|s| s.id() == id);
        let (Some(source), Some(target)) = (find(source), find(target)) else {
            return Err(DiagramError::invalid_connection("link end vanished"));
        };
        let id = ShapeId(self.next_id);
        let mut link = Link::pending(id, kind, self.next_depth, source, from)?;
        link.bind_end(target, to)?;
        self.alloc();
        self.shapes.push(link.into());
        Ok(id)
    }

    pub fn hit_test(&self, p: Point) -> Option<ShapeId> {
        SelectionEngine::hit_test(&self.shapes, p, &self.tolerance)
    }

    pub fn move_shape(&mut self, id: ShapeId, dx: i32, dy: i32) -> Result<(), DiagramError> {
        let shape = shape::find_in_mut(&mut self.shapes, id).ok_or(DiagramError::NotFound(id))?;
        shape.move_by(dx, dy);
        LinkSynchronizer::sync_after_move(&mut self.shapes, id, dx, dy);
        Ok(())
    }

    /// Moves every selected shape, then re-derives all bound link ends so a
    /// link selected along with its endpoint shapes stays on its ports.
    pub fn move_selection(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        for id in self.selection.clone() {
            if let Err(e) = self.move_shape(id, dx, dy) {
                debug!(error = e.to_string(); "Skipped selected shape while moving");
            }
        }
        LinkSynchronizer::resync_all(&mut self.shapes);
    }

    /// Resizes a basic shape to span `start` and `end`. Other kinds ignore it.
    pub fn resize(&mut self, id: ShapeId, start: Point, end: Point) -> Result<(), DiagramError> {
        let shape = shape::find_in_mut(&mut self.shapes, id).ok_or(DiagramError::NotFound(id))?;
        let Some(basic) = shape.as_basic_mut() else {
            return Ok(());
        };
        let before = basic.bounds();
        basic.resize(start, end);
        let after = basic.bounds();
        LinkSynchronizer::sync_after_move(&mut self.shapes, id, after.x - before.x, after.y - before.y);
        Ok(())
    }

    /// Groups the top-level shapes among `ids` and selects the new group.
    pub fn group(&mut self, ids: &[ShapeId]) -> Option<ShapeId> {
        let id = ShapeId(self.next_id);
        match GroupManager::create_group(ids, &mut self.shapes, id, self.next_depth) {
            Ok(id) => {
                self.alloc();
                self.clear_selection();
                self.mark_selected(id);
                Some(id)
            }
            Err(e) => {
                debug!(error = e.to_string(); "Group refused");
                None
            }
        }
    }

    pub fn group_selection(&mut self) -> Option<ShapeId> {
        let ids = self.selection.clone();
        self.group(&ids)
    }

    /// Dissolves the top-level group `id`; promoted shapes join the selection.
    pub fn ungroup(&mut self, id: ShapeId, deep: bool) -> Result<Vec<ShapeId>, DiagramError> {
        let promoted = GroupManager::ungroup(id, &mut self.shapes, deep).inspect_err(|e| {
            warn!(error = e.to_string(); "Ungroup refused");
        })?;
        self.selection.retain(|s| *s != id);
        self.selection.extend(promoted.iter().copied());
        Ok(promoted)
    }

    pub fn ungroup_selection(&mut self, deep: bool) -> Result<Vec<ShapeId>, DiagramError> {
        GroupManager::ungroup_selection(&mut self.selection, &mut self.shapes, deep).inspect_err(
            |e| {
                debug!(error = e.to_string(); "Ungroup refused");
            },
        )
    }

    pub fn delete(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        Deleter::delete(ids, &mut self.shapes, &mut self.selection).removed
    }

    pub fn delete_selection(&mut self) -> Vec<ShapeId> {
        let ids = self.selection.clone();
        self.delete(&ids)
    }

    fn basic_mut(&mut self, id: ShapeId) -> Result<&mut BasicShape, DiagramError> {
        shape::find_in_mut(&mut self.shapes, id)
            .ok_or(DiagramError::NotFound(id))?
            .as_basic_mut()
            .ok_or(DiagramError::NotABasicShape(id))
    }

    pub fn set_label(
        &mut self,
        id: ShapeId,
        text: impl Into<String>,
        style: LabelStyle,
    ) -> Result<(), DiagramError> {
        self.basic_mut(id)?.set_label(text, style);
        Ok(())
    }

    pub fn rename(&mut self, id: ShapeId, text: impl Into<String>) -> Result<(), DiagramError> {
        self.basic_mut(id)?.rename(text);
        Ok(())
    }

    /// Empties the canvas. Id and depth counters keep counting up.
    pub fn clear_all(&mut self) {
        debug!(shapes = self.shapes.len(); "Clearing diagram");
        self.shapes.clear();
        self.selection.clear();
        self.gesture = Gesture::Idle;
    }

    fn mark_selected(&mut self, id: ShapeId) {
        if let Some(shape) = shape::find_in_mut(&mut self.shapes, id) {
            shape.set_selected(true);
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    pub fn select(&mut self, id: ShapeId) -> Result<(), DiagramError> {
        if self.shape(id).is_none() {
            return Err(DiagramError::NotFound(id));
        }
        self.mark_selected(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for id in std::mem::take(&mut self.selection) {
            if let Some(shape) = shape::find_in_mut(&mut self.shapes, id) {
                shape.set_selected(false);
            }
        }
    }

    /// Draws the diagram bottom-up by depth, then whatever is being built.
    pub fn render(&self, surface: &mut dyn Surface) {
        let mut ordered: Vec<&Shape> = self.shapes.iter().collect();
        ordered.sort_by_key(|s| s.depth());
        for shape in ordered {
            render::draw_shape(surface, shape, &self.render_options);
        }
        match &self.gesture {
            Gesture::Idle | Gesture::Moving { .. } => {}
            Gesture::Creating { shape, .. } => {
                render::draw_shape(surface, &Shape::Basic(shape.clone()), &self.render_options);
            }
            Gesture::Linking { link } => {
                render::draw_shape(surface, &Shape::Link(link.clone()), &self.render_options);
            }
            Gesture::RubberBand(band) => render::draw_rubber_band(surface, band),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::ports::rect_port;

    #[test]
    fn press_drag_release_creates_sized_shape() {
        let mut d = Diagram::default();
        d.set_mode(Mode::Rect);
        d.handle(PointerEvent::press(10, 10));
        assert!(d.is_gesture_active());
        assert!(d.shapes().is_empty());
        d.handle(PointerEvent::drag(70, 50));
        d.handle(PointerEvent::release(70, 50));
        assert_eq!(d.shapes().len(), 1);
        assert_eq!(d.shapes()[0].bounds(), Rect::new(10, 10, 60, 40));
    }

    #[test]
    fn degenerate_creation_falls_back_to_default_size() {
        let mut d = Diagram::default();
        d.set_mode(Mode::Oval);
        d.handle(PointerEvent::press(5, 5));
        d.handle(PointerEvent::drag(5, 40));
        d.handle(PointerEvent::release(5, 40));
        assert_eq!(d.shapes()[0].bounds(), Rect::new(5, 5, 100, 80));
    }

    #[test]
    fn link_gesture_released_on_source_is_discarded() {
        let mut d = Diagram::default();
        d.create_shape(ShapeKind::Rectangle, Point::new(10, 10));
        d.set_mode(Mode::Association);
        d.handle(PointerEvent::press(100, 40));
        assert!(d.pending_link().is_some());
        d.handle(PointerEvent::drag(60, 60));
        d.handle(PointerEvent::release(60, 60));
        assert!(d.pending_link().is_none());
        assert_eq!(d.shapes().len(), 1);
    }

    #[test]
    fn link_gesture_binds_between_shapes() {
        let mut d = Diagram::default();
        let r = d.create_shape(ShapeKind::Rectangle, Point::new(10, 10));
        d.create_shape(ShapeKind::Oval, Point::new(200, 10));
        d.set_mode(Mode::Generalization);
        d.handle(PointerEvent::press(105, 40));
        d.handle(PointerEvent::drag(150, 45));
        d.handle(PointerEvent::release(205, 50));
        let link = d.shapes()[2].as_link().unwrap();
        assert_eq!(link.state(), LinkState::Bound);
        assert_eq!(link.kind(), LinkKind::Generalization);
        assert_eq!(link.start_binding(), Some(Endpoint { shape: r, port: rect_port::RIGHT }));
    }

    #[test]
    fn select_press_then_drag_moves_selection() {
        let mut d = Diagram::default();
        let r = d.create_shape(ShapeKind::Rectangle, Point::new(10, 10));
        d.handle(PointerEvent::press(20, 20));
        assert_eq!(d.selection(), &[r]);
        d.handle(PointerEvent::drag(25, 22));
        d.handle(PointerEvent::drag(30, 30));
        d.handle(PointerEvent::release(30, 30));
        assert_eq!(d.shape(r).unwrap().bounds(), Rect::new(20, 20, 100, 60));
    }

    #[test]
    fn press_on_empty_canvas_clears_selection() {
        let mut d = Diagram::default();
        let r = d.create_shape(ShapeKind::Rectangle, Point::new(10, 10));
        d.select(r).unwrap();
        d.handle(PointerEvent::press(500, 500));
        assert!(d.selection().is_empty());
        assert!(!d.shape(r).unwrap().is_selected());
        assert!(d.rubber_band().is_some());
        d.handle(PointerEvent::release(501, 501));
        assert!(d.rubber_band().is_none());
    }

    #[test]
    fn stale_gesture_is_finalized_by_next_press() {
        let mut d = Diagram::default();
        d.set_mode(Mode::Rect);
        d.handle(PointerEvent::press(0, 0));
        d.handle(PointerEvent::press(300, 300));
        d.handle(PointerEvent::release(300, 300));
        assert_eq!(d.shapes().len(), 2);
    }

    #[test]
    fn labels_only_on_basic_shapes() {
        let mut d = Diagram::default();
        let a = d.create_shape(ShapeKind::Rectangle, Point::new(0, 0));
        let b = d.create_shape(ShapeKind::Rectangle, Point::new(200, 0));
        let g = d.group(&[a, b]).unwrap();
        assert_eq!(
            d.rename(g, "Nope"),
            Err(DiagramError::NotABasicShape(g))
        );
        assert_eq!(d.rename(ShapeId(99), "x"), Err(DiagramError::NotFound(ShapeId(99))));
        d.rename(a, "Order").unwrap();
        assert_eq!(d.shape(a).unwrap().as_basic().unwrap().label, "Order");
    }

    #[test]
    fn clear_all_keeps_counters_monotonic() {
        let mut d = Diagram::default();
        let first = d.create_shape(ShapeKind::Rectangle, Point::new(0, 0));
        d.clear_all();
        let second = d.create_shape(ShapeKind::Rectangle, Point::new(0, 0));
        assert!(second > first);
        assert!(d.shape(second).unwrap().depth() > 0);
    }
}
