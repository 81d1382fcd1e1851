use eframe::egui;
use umlsketch::{LabelShape, Mode, Point, PointerEvent, Rgba, Shape};

use super::DiagramApp;
use super::command_palette::CommandContext;
use super::painter::{EguiSurface, color};

#[derive(Default)]
struct Shortcuts {
    palette: bool,
    help: bool,
    mode: Option<Mode>,
    group: bool,
    ungroup: bool,
    delete: bool,
}

impl DiagramApp {
    fn read_shortcuts(&self, ctx: &egui::Context) -> Shortcuts {
        let skip = ctx.wants_keyboard_input() || self.command_palette.open;
        let palette_enabled = self.diagram.settings().palette_commands_enabled;
        ctx.input_mut(|i| {
            let mut s = Shortcuts::default();
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                s.help = true;
            }
            if skip {
                return s;
            }
            if palette_enabled
                && (i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::P)
                    || i.consume_key(egui::Modifiers::NONE, egui::Key::Space))
            {
                s.palette = true;
            }
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::G) {
                s.ungroup = true;
            } else if i.consume_key(egui::Modifiers::COMMAND, egui::Key::G) {
                s.group = true;
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                s.delete = true;
            }
            let keys = [
                (egui::Key::Escape, Mode::Select),
                (egui::Key::V, Mode::Select),
                (egui::Key::A, Mode::Association),
                (egui::Key::G, Mode::Generalization),
                (egui::Key::C, Mode::Composition),
                (egui::Key::R, Mode::Rect),
                (egui::Key::O, Mode::Oval),
            ];
            for (key, mode) in keys {
                if i.consume_key(egui::Modifiers::NONE, key) {
                    s.mode = Some(mode);
                }
            }
            s
        })
    }

    fn tool_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Modes");
        ui.separator();
        for mode in Mode::ALL {
            if ui
                .selectable_label(self.diagram.mode() == mode, mode.label())
                .clicked()
            {
                self.set_mode(mode);
            }
        }
        ui.add_space(12.0);
        ui.heading("Edit");
        ui.separator();
        let selected = self.diagram.selection().len();
        if ui
            .add_enabled(selected >= 2, egui::Button::new("Group"))
            .clicked()
        {
            self.group_selected();
        }
        let can_ungroup = self.can_ungroup();
        if ui
            .add_enabled(can_ungroup, egui::Button::new("Ungroup"))
            .clicked()
        {
            self.ungroup_selected(false);
        }
        if ui
            .add_enabled(can_ungroup, egui::Button::new("Ungroup all levels"))
            .clicked()
        {
            self.ungroup_selected(true);
        }
        if ui
            .add_enabled(selected > 0, egui::Button::new("Delete"))
            .clicked()
        {
            self.delete_selected();
        }
        if ui
            .add_enabled(!self.diagram.shapes().is_empty(), egui::Button::new("Clear all"))
            .clicked()
        {
            self.clear_all();
        }
    }

    fn label_editor(&mut self, ui: &mut egui::Ui) {
        ui.heading("Label");
        ui.separator();
        let [id] = self.diagram.selection() else {
            ui.label("Select a single class or use case.");
            return;
        };
        let id = *id;
        let Some(basic) = self.diagram.shape(id).and_then(Shape::as_basic) else {
            ui.label("Groups and links have no label.");
            return;
        };
        let mut text = basic.label.clone();
        let mut style = basic.label_style;

        let mut changed = ui.text_edit_singleline(&mut text).changed();
        ui.horizontal(|ui| {
            changed |= ui
                .radio_value(&mut style.shape, LabelShape::Rect, "Box")
                .changed();
            changed |= ui
                .radio_value(&mut style.shape, LabelShape::Oval, "Oval")
                .changed();
        });
        ui.horizontal(|ui| {
            ui.label("Color");
            let mut c = color(style.color);
            if ui.color_edit_button_srgba(&mut c).changed() {
                let [r, g, b, a] = c.to_srgba_unmultiplied();
                style.color = Rgba { r, g, b, a };
                changed = true;
            }
        });
        changed |= ui
            .add(egui::Slider::new(&mut style.font_size, 8..=48).text("Font size"))
            .changed();

        if changed && let Err(e) = self.diagram.set_label(id, text, style) {
            self.status = Some(e.to_string());
        }
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, egui::Color32::WHITE);

        let to_point = |p: egui::Pos2| {
            let v = p - origin;
            Point::new(v.x.round() as i32, v.y.round() as i32)
        };
        let pointer = ctx.input(|i| i.pointer.interact_pos()).map(to_point);

        if response.clicked() {
            if let Some(p) = pointer {
                self.diagram.handle(PointerEvent::press(p.x, p.y));
                self.diagram.handle(PointerEvent::release(p.x, p.y));
            }
        } else {
            if response.drag_started()
                && let Some(p) = ctx.input(|i| i.pointer.press_origin()).map(to_point)
            {
                self.diagram.handle(PointerEvent::press(p.x, p.y));
            }
            if response.dragged()
                && let Some(p) = pointer
            {
                self.diagram.handle(PointerEvent::drag(p.x, p.y));
            }
            if response.drag_stopped()
                && let Some(p) = pointer
            {
                self.diagram.handle(PointerEvent::release(p.x, p.y));
            }
        }

        let mut surface = EguiSurface::new(&painter, origin);
        self.diagram.render(&mut surface);
    }
}

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let shortcuts = self.read_shortcuts(ctx);
        if shortcuts.help {
            self.show_help = true;
        }
        if shortcuts.palette {
            self.command_palette.open("");
        }
        if let Some(mode) = shortcuts.mode {
            self.set_mode(mode);
        }
        if shortcuts.group {
            self.group_selected();
        }
        if shortcuts.ungroup {
            self.ungroup_selected(false);
        }
        if shortcuts.delete {
            self.delete_selected();
        }

        egui::SidePanel::left("tool_panel")
            .resizable(false)
            .min_width(140.0)
            .show(ctx, |ui| self.tool_panel(ui));

        egui::SidePanel::right("label_panel")
            .resizable(true)
            .min_width(200.0)
            .show(ctx, |ui| self.label_editor(ui));

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_deref().unwrap_or("Ready"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Selected: {}", self.diagram.selection().len()));
                    ui.separator();
                    ui.label(format!("Objects: {}", self.diagram.shapes().len()));
                    ui.separator();
                    let source = self
                        .settings_path
                        .as_ref()
                        .map_or_else(|| "default settings".to_string(), |p| p.display().to_string());
                    ui.label(source);
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.canvas(ctx, ui));

        let cx = CommandContext {
            selected_len: self.diagram.selection().len(),
            can_ungroup: self.can_ungroup(),
            has_shapes: !self.diagram.shapes().is_empty(),
        };
        if let Some(cmd) = self.command_palette.ui(ctx, cx) {
            super::command_palette::CommandPalette::execute(self, ctx, cmd);
        }

        super::help::draw_help_window(ctx, &mut self.show_help);
    }
}
