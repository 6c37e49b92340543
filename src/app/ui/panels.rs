use std::collections::HashMap;

use eframe::egui::{self, Align, Context, Key, Layout, Vec2};

use crate::cases::{DEFAULT_PAGE_SIZE, FilterConfig, Snapshot};
use crate::layout::{Grouping, PackEngine, SortMode};

use super::super::ViewModel;
use super::super::highlight::HighlightStore;

impl ViewModel {
    pub(in crate::app) fn new(base: Snapshot, sort: SortMode) -> Self {
        let filters = FilterConfig::default();
        let filter_values = filters.idle_values();
        let filter_options = (0..filters.specs().len())
            .map(|index| filters.options(index, &base))
            .collect();
        let filtered = filters.apply(&base, &filter_values);

        let mut model = Self {
            list: filtered.clone(),
            list_rows: Vec::new(),
            list_index_by_id: HashMap::new(),
            base,
            filters,
            filter_values,
            filter_options,
            filtered,
            grouping: Grouping::All,
            engine: PackEngine::new(sort, PackEngine::DEFAULT_PADDING),
            chart_dirty: true,
            chart_revision: 0,
            chart_cache: None,
            quick_find: String::new(),
            quick_find_cache: None,
            highlight: HighlightStore::default(),
            detail: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
        };
        model.load_more_rows();
        model
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        if self.highlight.begin_frame() {
            ctx.request_repaint();
        }
        if self.detail.is_some() && ctx.input(|input| input.key_pressed(Key::Escape)) {
            self.close_detail();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Case settlements");
                    ui.separator();
                    for tab in Grouping::TABS {
                        if ui
                            .selectable_value(&mut self.grouping, tab, tab.label())
                            .changed()
                        {
                            self.chart_dirty = true;
                        }
                    }
                    ui.separator();
                    if ui.button("Reset view").clicked() {
                        self.reset_chart_view();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "cases: {} of {}",
                            self.filtered.len(),
                            self.base.len()
                        ));
                    });
                });
            });

        if self.detail.is_none() {
            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(380.0)
                .show(ctx, |ui| {
                    self.draw_controls(ui);
                    ui.separator();
                    self.draw_case_list(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.detail.is_some() {
                self.draw_detail(ui);
            } else {
                self.draw_chart(ui);
            }
        });
    }

    /// Re-runs the filter pipeline from the base snapshot and restarts the
    /// cases list from its first page.
    pub(in crate::app) fn apply_filters(&mut self) {
        self.filtered = self.filters.apply(&self.base, &self.filter_values);
        self.list = self.filtered.clone();
        self.list_rows.clear();
        self.load_more_rows();
        self.chart_dirty = true;
    }

    pub(in crate::app) fn load_more_rows(&mut self) {
        let (rows, next) = self.list.next_page(DEFAULT_PAGE_SIZE);
        self.list_rows = rows.to_vec();
        self.list = next;
        self.list_index_by_id = self
            .list_rows
            .iter()
            .enumerate()
            .map(|(index, record)| (record.id.clone(), index))
            .collect();
        tracing::debug!(
            shown = self.list_rows.len(),
            cursor = self.list.cursor(),
            exhausted = self.list.is_exhausted(),
            "cases list page loaded"
        );
    }

    pub(in crate::app) fn open_detail(&mut self, id: String) {
        tracing::debug!(%id, "opening case detail");
        self.highlight.clear();
        self.detail = Some(id);
    }

    pub(in crate::app) fn close_detail(&mut self) {
        self.detail = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::cases::{Snapshot, test_record as record};
    use crate::layout::SortMode;

    use super::super::super::ViewModel;

    fn model(count: usize) -> ViewModel {
        let records = (0..count)
            .map(|index| {
                let county = if index % 2 == 0 { "Kern" } else { "Fresno" };
                record(&index.to_string(), 100.0 * index as f64, county, "")
            })
            .collect();
        ViewModel::new(Snapshot::from_records(records), SortMode::Ascending)
    }

    #[test]
    fn list_starts_with_one_page_and_grows() {
        let mut model = model(12);
        assert_eq!(model.list_rows.len(), 5);
        assert!(!model.list.is_exhausted());

        model.load_more_rows();
        assert_eq!(model.list_rows.len(), 10);
        model.load_more_rows();
        assert_eq!(model.list_rows.len(), 12);
        assert!(model.list.is_exhausted());
        assert_eq!(model.list_index_by_id["11"], 11);
    }

    #[test]
    fn filter_change_restarts_the_list() {
        let mut model = model(12);
        model.load_more_rows();

        model.filter_values.set(0, "Fresno");
        model.apply_filters();
        assert_eq!(model.filtered.len(), 6);
        assert_eq!(model.list_rows.len(), 5);
        assert!(model.list_rows.iter().all(|row| row.county == "Fresno"));
        assert!(!model.list_index_by_id.contains_key("0"));
        assert!(model.chart_dirty);
    }

    #[test]
    fn county_options_lead_with_the_head_value() {
        let model = model(4);
        assert_eq!(model.filter_options[0], vec!["County", "Fresno", "Kern"]);
        assert!(model.filter_options[3].is_empty());
    }

    #[test]
    fn detail_opens_and_closes() {
        let mut model = model(3);
        model.open_detail("2".to_owned());
        assert_eq!(model.detail.as_deref(), Some("2"));
        model.close_detail();
        assert_eq!(model.detail, None);
    }
}
