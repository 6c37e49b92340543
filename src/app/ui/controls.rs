use eframe::egui::{self, Ui};

use crate::cases::FilterKind;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        for (index, spec) in self.filters.specs().iter().enumerate() {
            let Some(value) = self.filter_values.get_mut(index) else {
                continue;
            };

            match spec.kind {
                FilterKind::Select { .. } => {
                    let options = self
                        .filter_options
                        .get(index)
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    egui::ComboBox::from_id_salt(("filter", index))
                        .selected_text(value.as_str())
                        .width(ui.available_width() - 8.0)
                        .show_ui(ui, |ui| {
                            for option in options {
                                changed |= ui
                                    .selectable_value(&mut *value, option.clone(), option.as_str())
                                    .changed();
                            }
                        });
                }
                FilterKind::Search { placeholder } => {
                    changed |= ui
                        .add(
                            egui::TextEdit::singleline(value)
                                .hint_text(placeholder)
                                .desired_width(f32::INFINITY),
                        )
                        .on_hover_text(format!("Cases whose {} contains every word", spec.label))
                        .changed();
                }
            }
            ui.add_space(4.0);
        }

        if ui.button("Clear filters").clicked() {
            self.filter_values = self.filters.idle_values();
            changed = true;
        }

        if changed {
            self.apply_filters();
        }

        ui.separator();
        ui.label("Find case")
            .on_hover_text("Fuzzy-highlight bubbles by case name without filtering them.");
        ui.add(
            egui::TextEdit::singleline(&mut self.quick_find)
                .hint_text("Case name...")
                .desired_width(f32::INFINITY),
        );
    }
}
