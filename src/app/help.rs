use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help & Commands")
        .open(open)
        .resizable(true)
        .default_width(480.0)
        .default_height(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                ui.label("General");
                help_row(ui, "Space", "Open command palette");
                help_row(ui, "⌘⇧P", "Open command palette");
                help_row(ui, "F1", "Show this window");
                help_row(ui, "Escape", "Back to Select mode");

                ui.add_space(10.0);
                ui.label("Modes");
                help_row(ui, "V", "Select");
                help_row(ui, "A", "Association link");
                help_row(ui, "G", "Generalization link");
                help_row(ui, "C", "Composition link");
                help_row(ui, "R", "Class box");
                help_row(ui, "O", "Use case oval");

                ui.add_space(10.0);
                ui.label("Editing");
                help_row(ui, "⌘G", "Group selection");
                help_row(ui, "⌘⇧G", "Ungroup selected group");
                help_row(ui, "Delete / Backspace", "Delete selection and attached links");

                ui.add_space(20.0);
                ui.heading("Canvas");
                ui.separator();
                ui.label("• In Select mode, press on a shape and drag to move it.");
                ui.label("• Drag on empty canvas to select everything the band touches.");
                ui.label("• In a link mode, drag from one shape to another.");
                ui.label("• Links stay attached to the same port when shapes move.");

                ui.add_space(20.0);
                ui.heading("Settings");
                ui.separator();
                ui.label("Settings are read from ~/.config/umlsketch.toml or ./umlsketch.toml:");
                ui.add_space(5.0);
                ui.code(
                    r##"rect_size = [120, 70]
oval_size = [100, 80]
arrow_size = 12

[default_label]
shape = "Oval"
font_size = 14"##,
                );
                ui.add_space(5.0);
                ui.label("Set UMLSKETCH_LOG=debug to trace gestures.");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [120.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
