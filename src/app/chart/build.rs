use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::Vec2;
use tracing::debug;

use crate::layout::{ChartLayout, Circle, dataset_scale};
use crate::util::stable_pair;

use super::super::motion::Motion;
use super::super::{Bubble, ChartCache, ViewModel};

fn index_bubbles(bubbles: &[Bubble]) -> HashMap<String, usize> {
    bubbles
        .iter()
        .enumerate()
        .map(|(index, bubble)| (bubble.id.clone(), index))
        .collect()
}

impl ViewModel {
    /// Where a bubble that was not on screen before starts growing from.
    fn entry_point(id: &str, viewport: Vec2) -> Circle {
        let (jx, jy) = stable_pair(id);
        Circle {
            x: f64::from((jx + 1.0) / 2.0 * viewport.x),
            y: f64::from((jy + 1.0) / 2.0 * viewport.y),
            r: 0.0,
        }
    }

    /// Recomputes the whole layout for `viewport` and retargets bubbles by
    /// case id: survivors move, departures shrink away, arrivals grow in.
    pub(in crate::app) fn rebuild_chart(&mut self, viewport: Vec2, now: f64) {
        self.chart_revision = self.chart_revision.wrapping_add(1);
        self.quick_find_cache = None;

        let width = f64::from(viewport.x);
        let height = f64::from(viewport.y);
        let scale = dataset_scale(&self.base, width, height);
        let layout = ChartLayout::compute(
            &self.engine,
            &scale,
            &self.filtered,
            self.grouping,
            width,
            height,
        );

        let records = self
            .filtered
            .records()
            .iter()
            .map(|record| (record.id.as_str(), record))
            .collect::<HashMap<_, _>>();
        let targets = layout.leaves().collect::<Vec<_>>();
        let target_by_id = targets.iter().copied().collect::<HashMap<_, _>>();

        let prior = self
            .chart_cache
            .take()
            .map(|cache| cache.bubbles)
            .unwrap_or_default();
        let mut bubbles = Vec::with_capacity(prior.len().max(targets.len()));
        for mut bubble in prior {
            if let Some(target) = target_by_id.get(bubble.id.as_str()) {
                // An unchanged target keeps its transition running.
                if bubble.leaving || bubble.motion.target() != *target {
                    bubble.motion.retarget(*target, now);
                }
                bubble.leaving = false;
                if let Some(record) = records.get(bubble.id.as_str()) {
                    bubble.record = Arc::clone(record);
                }
            } else if !bubble.leaving {
                let current = bubble.motion.at(now);
                bubble.motion.retarget(Circle { r: 0.0, ..current }, now);
                bubble.leaving = true;
            }
            bubbles.push(bubble);
        }

        let known = bubbles
            .iter()
            .map(|bubble| bubble.id.clone())
            .collect::<HashSet<_>>();
        for (id, target) in &targets {
            if known.contains(*id) {
                continue;
            }
            let Some(record) = records.get(id) else {
                continue;
            };
            bubbles.push(Bubble {
                id: (*id).to_owned(),
                record: Arc::clone(record),
                motion: Motion::new(Self::entry_point(id, viewport), *target, now),
                leaving: false,
            });
        }

        debug!(
            grouping = self.grouping.label(),
            sort = ?self.engine.sort_mode(),
            leaves = targets.len(),
            bubbles = bubbles.len(),
            content_height = layout.height(),
            "chart rebuilt"
        );

        self.chart_cache = Some(ChartCache {
            index_by_id: index_bubbles(&bubbles),
            layout,
            viewport,
            bubbles,
        });
        self.chart_dirty = false;
    }

    /// Drops bubbles that finished shrinking away. Returns whether any bubble
    /// is still in motion.
    pub(in crate::app) fn settle_bubbles(&mut self, now: f64) -> bool {
        let Some(cache) = self.chart_cache.as_mut() else {
            return false;
        };

        let before = cache.bubbles.len();
        cache
            .bubbles
            .retain(|bubble| !(bubble.leaving && bubble.motion.is_finished(now)));
        if cache.bubbles.len() != before {
            cache.index_by_id = index_bubbles(&cache.bubbles);
            self.quick_find_cache = None;
        }

        cache
            .bubbles
            .iter()
            .any(|bubble| !bubble.motion.is_finished(now))
    }
}
