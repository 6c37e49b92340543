use eframe::egui::{self, Pos2, Rect, Ui, Vec2, vec2};

use super::super::render_utils::{circle_visible, screen_to_world, world_to_screen};
use super::super::{Bubble, ViewModel};

const MIN_ZOOM: f32 = 0.2;
const MAX_ZOOM: f32 = 6.0;

/// Where each bubble sits on screen this frame, indexed like the chart's
/// bubble list.
pub(in crate::app) struct ScreenBubbles {
    centers: Vec<Pos2>,
    radii: Vec<f32>,
}

impl ScreenBubbles {
    pub(in crate::app) fn project(
        bubbles: &[Bubble],
        rect: Rect,
        pan: Vec2,
        zoom: f32,
        now: f64,
    ) -> Self {
        let (centers, radii) = bubbles
            .iter()
            .map(|bubble| {
                let circle = bubble.motion.at(now);
                (
                    world_to_screen(rect, pan, zoom, vec2(circle.x as f32, circle.y as f32)),
                    circle.r as f32 * zoom,
                )
            })
            .unzip();
        Self { centers, radii }
    }

    pub(in crate::app) fn center(&self, index: usize) -> Pos2 {
        self.centers[index]
    }

    pub(in crate::app) fn radius(&self, index: usize) -> f32 {
        self.radii[index]
    }

    /// Bubbles that overlap `rect` at all.
    pub(in crate::app) fn on_screen(&self, rect: Rect) -> Vec<usize> {
        (0..self.centers.len())
            .filter(|&index| circle_visible(rect, self.centers[index], self.radii[index]))
            .collect()
    }

    /// Among `candidates`, the bubble under `pointer` whose centre is closest.
    pub(in crate::app) fn under_pointer(
        &self,
        pointer: Option<Pos2>,
        candidates: &[usize],
    ) -> Option<usize> {
        let pointer = pointer?;
        candidates
            .iter()
            .map(|&index| (index, self.centers[index].distance(pointer)))
            .filter(|&(index, distance)| distance <= self.radii[index])
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

impl ViewModel {
    /// Wheel zoom that keeps the chart point under the pointer in place.
    pub(in crate::app) fn zoom_chart(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let anchor = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchored = screen_to_world(rect, self.pan, self.zoom, anchor);

        let factor = (1.0 + scroll * 0.0018).clamp(0.85, 1.15);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = anchor - rect.left_top() - anchored * self.zoom;
    }

    /// Any drag pans, so tall packs can be scrolled with the primary button.
    pub(in crate::app) fn pan_chart(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn reset_chart_view(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eframe::egui::pos2;

    use super::*;
    use crate::app::motion::Motion;
    use crate::cases::test_record as record;
    use crate::layout::Circle;

    fn bubble(id: &str, x: f64, y: f64, r: f64) -> Bubble {
        let circle = Circle { x, y, r };
        Bubble {
            id: id.to_owned(),
            record: Arc::new(record(id, 1.0, "Kern", "")),
            motion: Motion::new(circle, circle, 0.0),
            leaving: false,
        }
    }

    fn screen() -> (Rect, ScreenBubbles) {
        let rect = Rect::from_min_size(pos2(100.0, 50.0), vec2(400.0, 300.0));
        let bubbles = [
            bubble("a", 50.0, 50.0, 40.0),
            bubble("b", 100.0, 50.0, 30.0),
            bubble("far", 5_000.0, 50.0, 10.0),
        ];
        (rect, ScreenBubbles::project(&bubbles, rect, vec2(0.0, 0.0), 2.0, 1.0))
    }

    #[test]
    fn projection_follows_pan_and_zoom() {
        let (_, screen) = screen();
        assert_eq!(screen.center(0), pos2(200.0, 150.0));
        assert_eq!(screen.radius(1), 60.0);
    }

    #[test]
    fn off_screen_bubbles_are_skipped() {
        let (rect, screen) = screen();
        assert_eq!(screen.on_screen(rect), vec![0, 1]);
    }

    #[test]
    fn overlapping_bubbles_resolve_to_the_nearest_centre() {
        let (rect, screen) = screen();
        let visible = screen.on_screen(rect);
        assert_eq!(screen.under_pointer(Some(pos2(260.0, 150.0)), &visible), Some(1));
        assert_eq!(screen.under_pointer(Some(pos2(205.0, 150.0)), &visible), Some(0));
        assert_eq!(screen.under_pointer(Some(pos2(205.0, 150.0)), &[1]), None);
        assert_eq!(screen.under_pointer(Some(pos2(250.0, 150.0)), &[1]), Some(1));
        assert_eq!(screen.under_pointer(Some(pos2(480.0, 330.0)), &visible), None);
        assert_eq!(screen.under_pointer(None, &visible), None);
    }
}
