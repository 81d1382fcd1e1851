use std::collections::HashSet;

use log::debug;

use super::composite::CompositeShape;
use super::shape::{Shape, ShapeId};
use crate::error::DiagramError;

pub struct GroupManager;

fn flatten_into(shape: Shape, out: &mut Vec<Shape>) {
    match shape {
        Shape::Composite(c) => {
            for child in c.into_children() {
                flatten_into(child, out);
            }
        }
        other => out.push(other),
    }
}

impl GroupManager {
    /// Wraps the selected top-level shapes into a new composite appended to
    /// the top level.
    ///
    /// Needs at least two selected top-level members. Nothing is touched on
    /// failure.
    pub fn create_group(
        selected: &[ShapeId],
        shapes: &mut Vec<Shape>,
        id: ShapeId,
        depth: u64,
    ) -> Result<ShapeId, DiagramError> {
        let wanted: HashSet<ShapeId> = selected.iter().copied().collect();
        let members: Vec<Shape> = shapes
            .iter()
            .filter(|s| wanted.contains(&s.id()))
            .cloned()
            .collect();
        if members.len() < 2 {
            return Err(DiagramError::precondition(format!(
                "grouping needs at least 2 top-level shapes, got {}",
                members.len()
            )));
        }
        let count = members.len();
        let group = CompositeShape::with_children(id, depth, members)?;
        shapes.retain(|s| !wanted.contains(&s.id()));
        shapes.push(group.into());
        debug!(group = id.0, members = count; "Created group");
        Ok(id)
    }

    /// Dissolves the top-level composite `id`.
    ///
    /// Promoted shapes are appended to the top level and selected. With `deep`
    /// every nested composite is dissolved too.
    pub fn ungroup(
        id: ShapeId,
        shapes: &mut Vec<Shape>,
        deep: bool,
    ) -> Result<Vec<ShapeId>, DiagramError> {
        let pos = shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or(DiagramError::NotFound(id))?;
        if !shapes[pos].is_composite() {
            return Err(DiagramError::precondition(format!("{id} is not a group")));
        }
        let Shape::Composite(group) = shapes.remove(pos) else {
            return Err(DiagramError::precondition(format!("{id} is not a group")));
        };
        let mut promoted = Vec::new();
        if deep {
            for child in group.into_children() {
                flatten_into(child, &mut promoted);
            }
        } else {
            promoted = group.into_children();
        }
        let ids: Vec<ShapeId> = promoted.iter().map(Shape::id).collect();
        for mut shape in promoted {
            shape.set_selected(true);
            shapes.push(shape);
        }
        debug!(group = id.0, promoted = ids.len(), deep = deep; "Ungrouped");
        Ok(ids)
    }

    /// Ungroups when the selection is exactly one top-level composite.
    pub fn ungroup_selection(
        selection: &mut Vec<ShapeId>,
        shapes: &mut Vec<Shape>,
        deep: bool,
    ) -> Result<Vec<ShapeId>, DiagramError> {
        let [id] = selection.as_slice() else {
            return Err(DiagramError::precondition(format!(
                "ungroup needs exactly one selected group, got {} shapes",
                selection.len()
            )));
        };
        let id = *id;
        if !shapes.iter().any(|s| s.id() == id && s.is_composite()) {
            return Err(DiagramError::precondition(format!(
                "{id} is not a top-level group"
            )));
        }
        let promoted = Self::ungroup(id, shapes, deep)?;
        selection.retain(|s| *s != id);
        selection.extend(promoted.iter().copied());
        Ok(promoted)
    }
}
