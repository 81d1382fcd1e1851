//! Editing engine for box-and-link UML sketches.
//!
//! The crate is usable headless: drive a [`Diagram`] with [`PointerEvent`]s
//! or its direct operations, and draw it through any [`Surface`].

pub mod diagram;
pub mod error;
pub mod settings;
pub mod surface;

pub use diagram::{
    Diagram, LabelShape, LabelStyle, LinkKind, Mode, Phase, Point, PointerEvent, Rect, Shape,
    ShapeId, ShapeKind,
};
pub use error::DiagramError;
pub use settings::{EditorSettings, SettingsError, load_settings, save_settings};
pub use surface::{RecordingSurface, Rgba, Stroke, Surface};
