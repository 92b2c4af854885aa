// RLM Log Reader - gui.rs
//
// Top-level eframe::App implementation.
// Wires the form and dialogs to the application state and polls the
// background analysis.

use crate::app::state::AppState;
use crate::ui;
use crate::ui::panels::{about, dialogs, form};

/// The RLM Log Reader window.
pub struct RlmLogReaderApp {
    pub state: AppState,
}

impl RlmLogReaderApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RlmLogReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_job();
        if self.state.is_busy() {
            ctx.set_cursor_icon(egui::CursorIcon::Wait);
            ctx.request_repaint_after(std::time::Duration::from_millis(
                ui::theme::JOB_POLL_INTERVAL_MS,
            ));
        }

        let modal_open = self.state.pending.is_some() || self.state.error.is_some();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open && !self.state.is_busy(), |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Open Log\u{2026}").clicked() {
                            ui.close_menu();
                            form::pick_input(&mut self.state);
                        }
                        if ui.button("Set Output Folder\u{2026}").clicked() {
                            ui.close_menu();
                            form::pick_output_dir(&mut self.state);
                        }
                        ui.separator();
                        if ui.button("Quit").clicked() {
                            ui.close_menu();
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.menu_button("Help", |ui| {
                        if ui.button("About").clicked() {
                            ui.close_menu();
                            self.state.show_about = true;
                        }
                    });
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                form::render(ui, &mut self.state);
            });
        });

        dialogs::render_overwrite(ctx, &mut self.state);
        dialogs::render_error(ctx, &mut self.state);
        dialogs::render_warnings(ctx, &mut self.state);
        about::render(ctx, &mut self.state);
    }
}
