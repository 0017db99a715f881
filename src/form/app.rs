//! The form window: field widgets, status log and modal dialogs.
//!
//! Every frame first drains the worker's events, then draws. The state
//! transitions live in plain methods so they can be driven without a window.

use eframe::egui;
use std::collections::VecDeque;

use super::worker::{DialogKind, MergeController, WorkerEvent, POLL_INTERVAL};
use super::{MergeForm, MAX_SIZE_MB, MIN_SIZE_MB};

/// A message box waiting to be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub text: String,
}

impl Dialog {
    fn error(text: impl Into<String>) -> Self {
        Self { kind: DialogKind::Error, title: "Error".to_string(), text: text.into() }
    }
}

pub struct MergerApp {
    form: MergeForm,
    controller: MergeController,
    pattern_input: String,
    selected: Option<usize>,
    status_log: Vec<String>,
    dialogs: VecDeque<Dialog>,
}

impl MergerApp {
    pub fn new(form: MergeForm) -> Self {
        Self {
            form,
            controller: MergeController::new(),
            pattern_input: String::new(),
            selected: None,
            status_log: Vec::new(),
            dialogs: VecDeque::new(),
        }
    }

    pub fn form(&self) -> &MergeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut MergeForm {
        &mut self.form
    }

    pub fn status_log(&self) -> &[String] {
        &self.status_log
    }

    pub fn pending_dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialogs.pop_front();
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Validate the form, reset the status log and start the worker.
    pub fn start_merge(&mut self) {
        let job = match self.form.to_job() {
            Ok(job) => job,
            Err(err) => {
                self.dialogs.push_back(Dialog::error(err.to_string()));
                return;
            }
        };

        let summary = self.form.run_summary();
        match self.controller.start(job) {
            Ok(()) => self.status_log = summary,
            Err(err) => self.dialogs.push_back(Dialog::error(err.to_string())),
        }
    }

    /// Apply every pending worker event. Returns true if anything changed.
    pub fn drain_events(&mut self) -> bool {
        let events = self.controller.poll();
        let changed = !events.is_empty();
        for event in events {
            self.apply_event(event);
        }
        changed
    }

    pub fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Status(line) | WorkerEvent::Progress(line) => self.status_log.push(line),
            WorkerEvent::Dialog { kind, title, text } => {
                self.dialogs.push_back(Dialog { kind, title, text });
            }
            WorkerEvent::Finished { success } => {
                let line = if success { "Process completed successfully." } else { "Process failed." };
                self.status_log.push(line.to_string());
            }
        }
    }

    pub fn add_pattern(&mut self) {
        match self.form.add_exclusion(&self.pattern_input) {
            Ok(()) => self.pattern_input.clear(),
            Err(err) => self.dialogs.push_back(Dialog::error(err.to_string())),
        }
    }

    pub fn remove_selected(&mut self) {
        if let Some(index) = self.selected.take() {
            self.form.remove_exclusion(index);
        }
    }

    pub fn clear_patterns(&mut self) {
        self.selected = None;
        self.form.clear_exclusions();
    }

    fn draw_fields(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("fields").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label("GitHub Repository URL:");
            ui.add(egui::TextEdit::singleline(&mut self.form.repo_url).desired_width(f32::INFINITY));
            ui.end_row();

            ui.label("Output File:");
            ui.add(egui::TextEdit::singleline(&mut self.form.output).desired_width(f32::INFINITY));
            ui.end_row();

            ui.label("Max File Size (MB):");
            let mut size = self.form.max_size_mb();
            let response =
                ui.add(egui::DragValue::new(&mut size).range(MIN_SIZE_MB..=MAX_SIZE_MB).speed(0.2));
            if response.changed() {
                if let Err(err) = self.form.set_max_size_mb(size) {
                    self.dialogs.push_back(Dialog::error(err.to_string()));
                }
            }
            ui.end_row();

            ui.label("Exclude Patterns:");
            ui.horizontal(|ui| {
                let input = ui.text_edit_singleline(&mut self.pattern_input);
                let submitted =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || submitted {
                    self.add_pattern();
                }
            });
            ui.end_row();
        });
    }

    fn draw_exclusions(&mut self, ui: &mut egui::Ui) {
        ui.label("Current Exclusions:");
        let mut clicked = None;
        ui.push_id("exclusions", |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                egui::ScrollArea::vertical().max_height(110.0).auto_shrink([false, true]).show(
                    ui,
                    |ui| {
                        for (index, pattern) in self.form.exclusions().iter().enumerate() {
                            let selected = self.selected == Some(index);
                            let label = egui::RichText::new(pattern).monospace();
                            if ui.selectable_label(selected, label).clicked() {
                                clicked = Some(index);
                            }
                        }
                    },
                );
            });
        });
        if clicked.is_some() {
            self.selected = clicked;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Remove Selected").clicked() {
                self.remove_selected();
            }
            if ui.button("Clear All").clicked() {
                self.clear_patterns();
            }
        });
    }

    fn draw_status(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Progress:");
            if self.is_running() {
                ui.add(egui::Spinner::new());
            }
        });

        ui.label("Status:");
        ui.push_id("status", |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(160.0)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.status_log {
                            ui.monospace(line);
                        }
                    });
            });
        });
    }

    fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialogs.front() else {
            return;
        };

        let color = match dialog.kind {
            DialogKind::Info => egui::Color32::LIGHT_GREEN,
            DialogKind::Warning => egui::Color32::YELLOW,
            DialogKind::Error => egui::Color32::LIGHT_RED,
        };

        let mut dismissed = false;
        egui::Window::new(dialog.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(color, dialog.text.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.dismiss_dialog();
        }
    }
}

impl eframe::App for MergerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        let modal_open = self.pending_dialog().is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                self.draw_fields(ui);
                ui.add_space(6.0);
                self.draw_exclusions(ui);
                ui.add_space(6.0);
                self.draw_status(ui);
                ui.add_space(6.0);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let merge = egui::Button::new("Merge Codebase");
                    if ui.add_enabled(!self.is_running(), merge).clicked() {
                        self.start_merge();
                    }
                });
            });
        });

        self.draw_dialog(ctx);
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
