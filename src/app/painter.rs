use eframe::egui;
use umlsketch::{Point, Rect, Rgba, Stroke, Surface};

const DASH: f32 = 6.0;
const GAP: f32 = 4.0;

/// [`Surface`] over an egui painter, with diagram coordinates offset by the
/// canvas origin.
pub(super) struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x as f32, p.y as f32)
    }

    fn rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_min_size(self.pos(Point::new(r.x, r.y)), egui::vec2(r.w as f32, r.h as f32))
    }

    fn dashed_path(&self, points: Vec<egui::Pos2>, stroke: egui::Stroke) {
        self.painter
            .extend(egui::Shape::dashed_line(&points, stroke, DASH, GAP));
    }
}

pub(super) fn color(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn stroke(s: Stroke) -> egui::Stroke {
    egui::Stroke::new(s.width, color(s.color))
}

impl Surface for EguiSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, c: Rgba) {
        self.painter.rect_filled(self.rect(rect), 0.0, color(c));
    }

    fn stroke_rect(&mut self, rect: Rect, s: Stroke) {
        let r = self.rect(rect);
        if s.dashed {
            let pts = vec![r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom(), r.left_top()];
            self.dashed_path(pts, stroke(s));
        } else {
            self.painter
                .rect_stroke(r, 0.0, stroke(s), egui::StrokeKind::Middle);
        }
    }

    fn fill_ellipse(&mut self, rect: Rect, c: Rgba) {
        let r = self.rect(rect);
        self.painter
            .add(egui::Shape::ellipse_filled(r.center(), r.size() * 0.5, color(c)));
    }

    fn stroke_ellipse(&mut self, rect: Rect, s: Stroke) {
        let r = self.rect(rect);
        self.painter
            .add(egui::Shape::ellipse_stroke(r.center(), r.size() * 0.5, stroke(s)));
    }

    fn line(&mut self, a: Point, b: Point, s: Stroke) {
        let (a, b) = (self.pos(a), self.pos(b));
        if s.dashed {
            self.dashed_path(vec![a, b], stroke(s));
        } else {
            self.painter.line_segment([a, b], stroke(s));
        }
    }

    fn fill_polygon(&mut self, points: &[Point], c: Rgba) {
        let pts = points.iter().map(|p| self.pos(*p)).collect();
        self.painter
            .add(egui::Shape::convex_polygon(pts, color(c), egui::Stroke::NONE));
    }

    fn stroke_polygon(&mut self, points: &[Point], s: Stroke) {
        let pts = points.iter().map(|p| self.pos(*p)).collect();
        self.painter.add(egui::Shape::closed_line(pts, stroke(s)));
    }

    fn text(&mut self, center: Point, text: &str, font_size: u32, c: Rgba) {
        self.painter.text(
            self.pos(center),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(font_size as f32),
            color(c),
        );
    }

    fn measure_text(&self, text: &str, font_size: u32) -> (i32, i32) {
        let galley = self.painter.layout_no_wrap(
            text.to_string(),
            egui::FontId::proportional(font_size as f32),
            egui::Color32::BLACK,
        );
        let size = galley.size();
        (size.x.ceil() as i32, size.y.ceil() as i32)
    }
}
