use std::collections::HashSet;

use log::{debug, warn};

use super::shape::{Shape, ShapeId};
use crate::error::DiagramError;

/// Outcome of a cascading delete.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Top-level ids removed, targets and cascaded links alike.
    pub removed: Vec<ShapeId>,
    pub errors: Vec<DiagramError>,
}

pub struct Deleter;

impl Deleter {
    /// Removes the top-level `targets` and every top-level link attached to
    /// anything inside them.
    ///
    /// All removals are computed first and applied in one `retain` pass.
    pub fn delete(
        targets: &[ShapeId],
        shapes: &mut Vec<Shape>,
        selection: &mut Vec<ShapeId>,
    ) -> DeleteReport {
        let mut report = DeleteReport::default();
        let mut doomed: HashSet<ShapeId> = HashSet::new();
        let mut roots: Vec<&Shape> = Vec::new();
        for id in targets {
            match shapes.iter().find(|s| s.id() == *id) {
                Some(shape) => {
                    doomed.insert(*id);
                    roots.push(shape);
                }
                None => {
                    warn!(shape = id.0; "Delete target is not a top-level shape");
                    report.errors.push(DiagramError::NotFound(*id));
                }
            }
        }

        let mut expanded: Vec<ShapeId> = Vec::new();
        for root in &roots {
            root.descendant_ids(&mut expanded);
        }

        for shape in shapes.iter() {
            let Shape::Link(link) = shape else {
                continue;
            };
            if doomed.contains(&link.id) {
                continue;
            }
            let related = roots.iter().any(|r| r.is_related_to_link(link))
                || expanded.iter().any(|id| link.is_related_to(*id));
            if related {
                doomed.insert(link.id);
            }
        }

        report.removed = shapes
            .iter()
            .map(Shape::id)
            .filter(|id| doomed.contains(id))
            .collect();
        shapes.retain(|s| !doomed.contains(&s.id()));
        selection.retain(|id| !doomed.contains(id) && !expanded.contains(id));
        debug!(removed = report.removed.len(); "Deleted shapes");
        report
    }
}
