use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::cases::{CaseRecord, Summary};
use crate::layout::{ChartLayout, LABEL_BAND};
use crate::util::{format_amount, format_thousands};

use super::super::render_utils::{
    NA_COLOR, blend_color, dim_color, draw_background, fallback_color, parse_color,
    with_opacity, world_to_screen,
};
use super::super::{QuickFindCache, ViewModel};
use super::interaction::ScreenBubbles;

const QUICK_FIND_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn bubble_color(record: &CaseRecord) -> Color32 {
    if record.is_na {
        NA_COLOR
    } else {
        parse_color(&record.color).unwrap_or_else(|| fallback_color(&record.id))
    }
}

fn summary_text(summary: &Summary) -> String {
    let statistic = |value: Option<f64>| {
        value
            .map(|value| format!("${}", format_thousands(value)))
            .unwrap_or_else(|| "-".to_owned())
    };
    format!(
        "Count: {}   Average: {}   Median: {}",
        summary.count,
        statistic(summary.average),
        statistic(summary.median)
    )
}

impl ViewModel {
    fn cached_quick_find_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.quick_find.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.quick_find_cache
            && cached.chart_revision == self.chart_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let cache = self.chart_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .bubbles
            .iter()
            .enumerate()
            .filter(|(_, bubble)| {
                fuzzy_match_score(&matcher, &bubble.record.case_name, query).is_some()
            })
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.quick_find_cache = Some(QuickFindCache {
            query: query.to_owned(),
            chart_revision: self.chart_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.zoom_chart(ui, rect, &response);
        self.pan_chart(&response);

        let now = ui.input(|input| input.time);
        let viewport = rect.size();
        let resized = self
            .chart_cache
            .as_ref()
            .is_none_or(|cache| (cache.viewport - viewport).length() > 1.0);
        if self.chart_dirty || resized {
            self.rebuild_chart(viewport, now);
        }

        if self.settle_bubbles(now) || response.dragged() {
            ui.ctx().request_repaint();
        }

        let quick_matches = self.cached_quick_find_matches();
        let quick_active = quick_matches.is_some();
        let pan = self.pan;
        let zoom = self.zoom;

        let Some(cache) = self.chart_cache.as_ref() else {
            return;
        };

        match &cache.layout {
            ChartLayout::Flat { summary, .. } => {
                painter.text(
                    rect.left_top() + vec2(10.0, 10.0),
                    Align2::LEFT_TOP,
                    summary_text(summary),
                    FontId::proportional(13.0),
                    Color32::from_gray(225),
                );
            }
            ChartLayout::Grouped(grouped) => {
                for cell in &grouped.cells {
                    let cell_top_left = world_to_screen(
                        rect,
                        pan,
                        zoom,
                        vec2(cell.bounds.x as f32, (cell.bounds.y - LABEL_BAND) as f32),
                    );
                    let cell_size = vec2(
                        cell.bounds.width as f32,
                        (cell.bounds.height + LABEL_BAND) as f32,
                    ) * zoom;
                    if !rect.intersects(Rect::from_min_size(cell_top_left, cell_size)) {
                        continue;
                    }

                    painter.text(
                        cell_top_left + vec2(6.0, 3.0) * zoom,
                        Align2::LEFT_TOP,
                        format!("{}   {}", cell.name, summary_text(&cell.summary)),
                        FontId::proportional(12.0),
                        Color32::from_gray(225),
                    );

                    if let Some(root) = cell.layout.root() {
                        painter.circle_stroke(
                            world_to_screen(
                                rect,
                                pan,
                                zoom,
                                vec2(root.circle.x as f32, root.circle.y as f32),
                            ),
                            root.circle.r as f32 * zoom,
                            Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 130, 140, 60)),
                        );
                    }
                }
            }
        }

        if cache.bubbles.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No cases match the current filters.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        }

        let screen = ScreenBubbles::project(&cache.bubbles, rect, pan, zoom, now);
        let visible = screen.on_screen(rect);
        let hoverable = visible
            .iter()
            .copied()
            .filter(|&index| !cache.bubbles[index].leaving)
            .collect::<Vec<_>>();
        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = screen.under_pointer(pointer, &hoverable);

        if let Some(index) = hovered {
            self.highlight.hover(&cache.bubbles[index].id);
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        let highlighted = self.highlight.resolve(&cache.index_by_id);

        for &index in &visible {
            let bubble = &cache.bubbles[index];
            let position = screen.center(index);
            let radius = screen.radius(index);
            let is_highlighted = highlighted == Some(index);
            let is_match = quick_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = bubble_color(&bubble.record);
            let opacity = if is_highlighted { 0.8 } else { 0.5 };
            let mut fill = with_opacity(base_color, opacity);
            if quick_active && !is_match && !is_highlighted {
                fill = dim_color(fill, 0.4);
            }
            painter.circle_filled(position, radius, fill);

            if is_match {
                painter.circle_stroke(
                    position,
                    radius + 1.5,
                    Stroke::new(1.8, blend_color(base_color, QUICK_FIND_COLOR, 0.68)),
                );
            } else if is_highlighted {
                painter.circle_stroke(position, radius, Stroke::new(1.4, Color32::from_gray(235)));
            }
        }

        let pending_detail = if response.clicked_by(egui::PointerButton::Primary) {
            hovered.map(|index| cache.bubbles[index].id.clone())
        } else {
            None
        };

        if let Some(index) = hovered
            && let Some(pointer) = pointer
        {
            let record = &cache.bubbles[index].record;
            Self::draw_tooltip(&painter, rect, pointer, record);
        }

        if let Some(id) = pending_detail {
            self.open_detail(id);
        }
    }

    fn draw_tooltip(painter: &egui::Painter, rect: Rect, pointer: Pos2, record: &CaseRecord) {
        let text = format!(
            "Amount: {}\nJudge: {}\nCounty: {}",
            format_amount(record),
            record.judge,
            record.county
        );
        let galley = painter.layout_no_wrap(text, FontId::proportional(13.0), Color32::from_gray(240));

        let mut origin = pointer + vec2(14.0, 14.0);
        if origin.x + galley.size().x + 12.0 > rect.right() {
            origin.x = pointer.x - galley.size().x - 14.0;
        }
        if origin.y + galley.size().y + 12.0 > rect.bottom() {
            origin.y = pointer.y - galley.size().y - 14.0;
        }

        let frame = Rect::from_min_size(origin, galley.size()).expand(6.0);
        painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(12, 14, 18, 230));
        painter.galley(origin, galley, Color32::from_gray(240));
    }
}
