use std::path::PathBuf;

use eframe::egui;
use log::{info, warn};
use umlsketch::{Diagram, EditorSettings, Mode, Shape, load_settings};

mod command_palette;
mod help;
mod painter;
mod update;

pub struct DiagramApp {
    diagram: Diagram,
    settings_path: Option<PathBuf>,
    status: Option<String>,
    command_palette: command_palette::CommandPalette,
    show_help: bool,
}

impl DiagramApp {
    fn config_path() -> Option<PathBuf> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = PathBuf::from(home).join(".config").join("umlsketch.toml");
            if path.exists() {
                return Some(path);
            }
        }
        let local = PathBuf::from("umlsketch.toml");
        local.exists().then_some(local)
    }

    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        let settings_path = Self::config_path();
        let settings = match &settings_path {
            Some(path) => load_settings(path).unwrap_or_else(|e| {
                warn!(path = path.display().to_string(), error = e.to_string(); "Falling back to default settings");
                EditorSettings::default()
            }),
            None => {
                info!("No settings file found, using defaults");
                EditorSettings::default()
            }
        };
        Self {
            diagram: Diagram::new(settings),
            settings_path,
            status: None,
            command_palette: command_palette::CommandPalette::default(),
            show_help: false,
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        self.diagram.set_mode(mode);
        self.status = Some(format!("Mode: {}", mode.label()));
    }

    fn can_ungroup(&self) -> bool {
        matches!(self.diagram.selection(), [id] if self.diagram.shape(*id).is_some_and(Shape::is_composite))
    }

    fn group_selected(&mut self) {
        self.status = Some(match self.diagram.group_selection() {
            Some(id) => format!("Created group {id}"),
            None => "Select at least two shapes to group".to_string(),
        });
    }

    fn ungroup_selected(&mut self, deep: bool) {
        self.status = Some(match self.diagram.ungroup_selection(deep) {
            Ok(promoted) => format!("Ungrouped {} shapes", promoted.len()),
            Err(e) => e.to_string(),
        });
    }

    fn delete_selected(&mut self) {
        let removed = self.diagram.delete_selection();
        self.status = Some(format!("Deleted {} shapes", removed.len()));
    }

    fn clear_all(&mut self) {
        self.diagram.clear_all();
        self.status = Some("Cleared canvas".to_string());
    }
}
