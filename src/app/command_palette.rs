use eframe::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use umlsketch::Mode;

use super::DiagramApp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CommandId {
    ModeSelect,
    ModeAssociation,
    ModeGeneralization,
    ModeComposition,
    ModeClass,
    ModeUseCase,
    Group,
    Ungroup,
    DeepUngroup,
    Delete,
    ClearSelection,
    ClearAll,
    Help,
}

pub(super) struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    pub search: &'static str,
    pub keys: &'static str,
}

const fn cmd(id: CommandId, name: &'static str, search: &'static str, keys: &'static str) -> CommandSpec {
    CommandSpec { id, name, search, keys }
}

const COMMANDS: &[CommandSpec] = &[
    cmd(CommandId::ModeSelect, "Mode: Select", "select pointer move", "V"),
    cmd(CommandId::ModeAssociation, "Mode: Association", "association link arrow", "A"),
    cmd(CommandId::ModeGeneralization, "Mode: Generalization", "generalization inheritance triangle", "G"),
    cmd(CommandId::ModeComposition, "Mode: Composition", "composition diamond whole part", "C"),
    cmd(CommandId::ModeClass, "Mode: Class", "class rectangle box", "R"),
    cmd(CommandId::ModeUseCase, "Mode: Use case", "use case oval ellipse", "O"),
    cmd(CommandId::Group, "Edit: Group", "group combine", "⌘G"),
    cmd(CommandId::Ungroup, "Edit: Ungroup", "ungroup split", "⌘⇧G"),
    cmd(CommandId::DeepUngroup, "Edit: Ungroup all levels", "deep ungroup flatten nested", ""),
    cmd(CommandId::Delete, "Edit: Delete", "delete remove erase", "Del"),
    cmd(CommandId::ClearSelection, "Edit: Deselect all", "deselect clear selection none", ""),
    cmd(CommandId::ClearAll, "Edit: Clear canvas", "clear all canvas reset", ""),
    cmd(CommandId::Help, "Help: Shortcuts", "help keys shortcuts", "F1"),
];

/// A palette row: the command, whether it applies to the current diagram,
/// and its match score.
#[derive(Clone, Copy)]
pub(super) struct Entry {
    pub spec: &'static CommandSpec,
    pub enabled: bool,
    score: i64,
}

#[derive(Default)]
pub(super) struct CommandPalette {
    pub open: bool,
    pub query: String,
    pub selected: usize,
    request_focus: bool,
}

#[derive(Clone, Copy)]
pub(super) struct CommandContext {
    pub selected_len: usize,
    pub can_ungroup: bool,
    pub has_shapes: bool,
}

impl CommandPalette {
    pub fn open(&mut self, query: impl Into<String>) {
        self.open = true;
        self.query = query.into();
        self.selected = 0;
        self.request_focus = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
        self.request_focus = false;
    }

    fn is_enabled(cx: CommandContext, id: CommandId) -> bool {
        match id {
            CommandId::Group => cx.selected_len >= 2,
            CommandId::Ungroup | CommandId::DeepUngroup => cx.can_ungroup,
            CommandId::Delete | CommandId::ClearSelection => cx.selected_len > 0,
            CommandId::ClearAll => cx.has_shapes,
            _ => true,
        }
    }

    pub(super) fn execute(app: &mut DiagramApp, ctx: &egui::Context, id: CommandId) {
        match id {
            CommandId::ModeSelect => app.set_mode(Mode::Select),
            CommandId::ModeAssociation => app.set_mode(Mode::Association),
            CommandId::ModeGeneralization => app.set_mode(Mode::Generalization),
            CommandId::ModeComposition => app.set_mode(Mode::Composition),
            CommandId::ModeClass => app.set_mode(Mode::Rect),
            CommandId::ModeUseCase => app.set_mode(Mode::Oval),
            CommandId::Group => app.group_selected(),
            CommandId::Ungroup => app.ungroup_selected(false),
            CommandId::DeepUngroup => app.ungroup_selected(true),
            CommandId::Delete => app.delete_selected(),
            CommandId::ClearSelection => app.diagram.clear_selection(),
            CommandId::ClearAll => app.clear_all(),
            CommandId::Help => app.show_help = true,
        }
        ctx.request_repaint();
    }

    /// Commands matching the query, applicable ones first, best score first
    /// within each half.
    fn filtered(&self, cx: CommandContext) -> Vec<Entry> {
        let matcher = SkimMatcherV2::default();
        let q = self.query.trim();
        let mut out: Vec<Entry> = COMMANDS
            .iter()
            .filter_map(|spec| {
                let score = if q.is_empty() {
                    0
                } else {
                    let by_name = matcher.fuzzy_match(spec.name, q);
                    let by_alias = matcher.fuzzy_match(spec.search, q);
                    by_name.max(by_alias)?
                };
                let enabled = CommandPalette::is_enabled(cx, spec.id);
                Some(Entry { spec, enabled, score })
            })
            .collect();
        out.sort_by_key(|e| (!e.enabled, std::cmp::Reverse(e.score)));
        out
    }

    fn step(entries: &[Entry], from: usize, forward: bool) -> usize {
        let mut i = from;
        loop {
            let next = if forward { i.checked_add(1) } else { i.checked_sub(1) };
            match next.filter(|&n| n < entries.len()) {
                Some(n) if entries[n].enabled => return n,
                Some(n) => i = n,
                None => return from,
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context, cx: CommandContext) -> Option<CommandId> {
        if !self.open {
            return None;
        }
        let entries = self.filtered(cx);
        self.selected = self.selected.min(entries.len().saturating_sub(1));
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close();
            return None;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
            self.selected = CommandPalette::step(&entries, self.selected, true);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
            self.selected = CommandPalette::step(&entries, self.selected, false);
        }
        let mut run_selected = ctx.input(|i| i.key_pressed(egui::Key::Enter));

        let screen = ctx.content_rect();
        let width = 420.0;
        let height = 260.0;
        let pos = egui::pos2(screen.center().x - width * 0.5, screen.top() + 48.0);
        egui::Area::new(egui::Id::new("command_palette"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(245, 245, 245, 245))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255)))
                    .inner_margin(10.0)
                    .corner_radius(egui::CornerRadius::same(8));
                frame.show(ui, |ui| {
                    ui.set_min_size(egui::vec2(width, height));
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.query)
                            .desired_width(f32::INFINITY)
                            .hint_text("Search commands"),
                    );
                    if self.request_focus {
                        resp.request_focus();
                        self.request_focus = false;
                    }
                    ui.separator();
                    if entries.is_empty() {
                        ui.weak("No matching command");
                    }
                    egui::ScrollArea::vertical().max_height(height - 64.0).show(ui, |ui| {
                        for (idx, entry) in entries.iter().enumerate() {
                            ui.horizontal(|ui| {
                                let row = egui::Button::new(entry.spec.name)
                                    .selected(idx == self.selected)
                                    .min_size(egui::vec2(width - 90.0, 0.0));
                                if ui.add_enabled(entry.enabled, row).clicked() {
                                    self.selected = idx;
                                    run_selected = true;
                                }
                                ui.weak(entry.spec.keys);
                            });
                        }
                    });
                });
            });

        if run_selected
            && let Some(entry) = entries.get(self.selected)
            && entry.enabled
        {
            let id = entry.spec.id;
            self.close();
            return Some(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: CommandContext = CommandContext {
        selected_len: 0,
        can_ungroup: false,
        has_shapes: false,
    };

    #[test]
    fn applicable_commands_rank_first() {
        let palette = CommandPalette::default();
        let entries = palette.filtered(EMPTY);
        assert_eq!(entries.len(), COMMANDS.len());
        let first_disabled = entries.iter().position(|e| !e.enabled).unwrap();
        assert!(entries[first_disabled..].iter().all(|e| !e.enabled));
        assert!(entries[..first_disabled].iter().any(|e| e.spec.id == CommandId::Help));
    }

    #[test]
    fn query_matches_aliases() {
        let mut palette = CommandPalette::default();
        palette.open("diamond");
        let cx = CommandContext { selected_len: 2, ..EMPTY };
        let entries = palette.filtered(cx);
        assert_eq!(entries[0].spec.id, CommandId::ModeComposition);
    }

    #[test]
    fn navigation_skips_disabled_rows() {
        let palette = CommandPalette::default();
        let entries = palette.filtered(EMPTY);
        let last_enabled = entries.iter().rposition(|e| e.enabled).unwrap();
        assert_eq!(CommandPalette::step(&entries, last_enabled, true), last_enabled);
        assert_eq!(CommandPalette::step(&entries, 0, false), 0);
        assert_eq!(CommandPalette::step(&entries, 0, true), 1);
    }
}
