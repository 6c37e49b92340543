use eframe::egui::{self, Color32, RichText, Sense, Ui};

use crate::util::format_amount;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_case_list(&mut self, ui: &mut Ui) {
        ui.heading(format!("Cases ({})", self.filtered.len()));
        ui.add_space(4.0);

        let highlighted = self.highlight.resolve(&self.list_index_by_id);
        let mut hovered_id = None;
        let mut opened_id = None;
        let mut load_more = false;

        egui::ScrollArea::vertical()
            .id_salt("case_list_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.filtered.is_empty() {
                    ui.label("No cases match the current filters.");
                }

                for (index, record) in self.list_rows.iter().enumerate() {
                    let fill = if highlighted == Some(index) {
                        Color32::from_rgba_unmultiplied(103, 196, 255, 40)
                    } else {
                        Color32::TRANSPARENT
                    };

                    let row = egui::Frame::group(ui.style())
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(record.case_name.as_str()).strong());
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| ui.label(format_amount(record)),
                                );
                            });
                            ui.small(format!(
                                "{}  ·  {}  ·  {}  ·  {}",
                                record.judge, record.state, record.county, record.start_year
                            ));
                            if !record.summary.is_empty() {
                                ui.label(record.summary.as_str());
                            }
                            if !record.injury.is_empty() {
                                ui.small(format!("Injuries: {}", record.injury));
                            }
                        })
                        .response
                        .interact(Sense::click());

                    if row.hovered() {
                        hovered_id = Some(record.id.as_str());
                    }
                    if row.clicked() {
                        opened_id = Some(record.id.clone());
                    }
                }

                ui.add_space(6.0);
                let show_more =
                    ui.add_enabled(!self.list.is_exhausted(), egui::Button::new("Show more"));
                if show_more.clicked() {
                    load_more = true;
                }
            });

        if let Some(id) = hovered_id {
            self.highlight.hover(id);
        }
        if load_more {
            self.load_more_rows();
        }
        if let Some(id) = opened_id {
            self.open_detail(id);
        }
    }
}
