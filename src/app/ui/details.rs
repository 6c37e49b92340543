use eframe::egui::{self, RichText, Ui};

use crate::cases::CaseRecord;
use crate::util::format_amount;

use super::super::ViewModel;

/// Label and value pairs shown in the detail grid, in display order.
fn detail_rows(record: &CaseRecord) -> [(&'static str, &str); 6] {
    [
        ("State", record.state.as_str()),
        ("Court", record.court.as_str()),
        ("Judge", record.judge.as_str()),
        ("Year", record.start_year.as_str()),
        ("Case type", record.case_type.as_str()),
        ("Injury", record.injury.as_str()),
    ]
}

impl ViewModel {
    pub(in crate::app) fn draw_detail(&mut self, ui: &mut Ui) {
        if ui.button("Back").clicked() {
            self.close_detail();
            return;
        }
        ui.add_space(8.0);

        let Some(record) = self
            .detail
            .as_deref()
            .and_then(|id| self.base.get(id))
            .cloned()
        else {
            ui.label("This case is no longer part of the dataset.");
            return;
        };

        egui::ScrollArea::vertical()
            .id_salt("case_detail_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(record.case_name.as_str()).strong());
                ui.label(RichText::new(format_amount(&record)).size(22.0));
                ui.add_space(10.0);

                egui::Grid::new("case_detail_grid")
                    .num_columns(2)
                    .spacing([18.0, 6.0])
                    .show(ui, |ui| {
                        for (label, value) in detail_rows(&record) {
                            ui.label(RichText::new(label).strong());
                            ui.label(value);
                            ui.end_row();
                        }
                    });

                ui.separator();
                ui.label(RichText::new("Summary").strong());
                ui.label(record.summary.as_str());
            });
    }
}
