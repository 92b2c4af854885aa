// RLM Log Reader - ui/panels/dialogs.rs
//
// Modal windows: the overwrite confirmation, the error message, and the
// startup configuration warnings. Each is a centred, non-resizable window.

use crate::app::state::AppState;
use crate::ui::theme;

fn modal(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .min_width(theme::DIALOG_WIDTH)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// "Overwrite?" prompt listing the files that already exist.
/// No has the initial focus and Escape answers No.
pub fn render_overwrite(ctx: &egui::Context, state: &mut AppState) {
    let Some(pending) = &state.pending else {
        return;
    };

    let mut answer: Option<bool> = None;
    modal("Overwrite?").show(ctx, |ui| {
        ui.label("Do you wish to overwrite the following files?");
        ui.add_space(4.0);
        egui::ScrollArea::vertical()
            .max_height(theme::CONFLICT_LIST_HEIGHT)
            .show(ui, |ui| {
                for path in &pending.conflicts {
                    ui.monospace(path.display().to_string());
                }
            });
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Yes").clicked() {
                answer = Some(true);
            }
            let no = ui.button("No");
            if no.clicked() {
                answer = Some(false);
            }
            // Focus No once; after that Tab moves between the buttons and
            // Enter presses whichever has focus.
            if pending.needs_focus {
                no.request_focus();
            }
        });
    });

    if let Some(pending) = state.pending.as_mut() {
        pending.needs_focus = false;
    }
    let dismissed = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    match answer {
        Some(true) => state.confirm_overwrite(),
        Some(false) => state.cancel_overwrite(),
        None if dismissed => state.cancel_overwrite(),
        None => {}
    }
}

/// Error window with the message of the last failure.
pub fn render_error(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = &state.error else {
        return;
    };

    let mut close = false;
    modal("Error").show(ctx, |ui| {
        ui.label(egui::RichText::new(message).color(theme::ERROR_TEXT));
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            close = ui.button("OK").clicked();
        });
    });

    if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.error = None;
    }
}

/// Configuration warnings collected at startup, shown once.
pub fn render_warnings(ctx: &egui::Context, state: &mut AppState) {
    if state.warnings.is_empty() || state.error.is_some() {
        return;
    }

    let mut close = false;
    modal("Configuration").show(ctx, |ui| {
        for warning in &state.warnings {
            ui.label(egui::RichText::new(warning).color(theme::WARNING_TEXT));
        }
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            close = ui.button("OK").clicked();
        });
    });

    if close {
        state.warnings.clear();
    }
}
