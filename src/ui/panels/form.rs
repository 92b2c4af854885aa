// RLM Log Reader - ui/panels/form.rs
//
// The main form: input file row, output directory row, event-data option,
// and the Generate button.

use crate::app::state::AppState;
use crate::ui::theme;

/// Show the Open dialog and remember the chosen log file.
pub fn pick_input(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open RLM report or ISV log file")
        .add_filter("Log Files (*.log *.txt)", &["log", "txt"])
        .add_filter("All Files", &["*"]);
    if let Some(dir) = state.settings().input_dialog_dir() {
        dialog = dialog.set_directory(dir);
    }
    if let Some(path) = dialog.pick_file() {
        state.remember_input(&path);
    }
}

/// Show the folder picker and remember the chosen output directory.
pub fn pick_output_dir(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Set the directory to save the results");
    if let Some(dir) = state.settings().output_dir.as_deref() {
        dialog = dialog.set_directory(dir);
    }
    if let Some(path) = dialog.pick_folder() {
        state.remember_output_dir(&path);
    }
}

/// A labelled path field with a browse button. Returns true when the button
/// was clicked.
fn path_row(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str, button: &str) -> bool {
    let mut browse = false;
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::LABEL_WIDTH, ui.spacing().interact_size.y],
            egui::Label::new(label),
        );
        let button_width = 70.0;
        let field_width = (ui.available_width() - button_width).max(theme::PATH_FIELD_MIN_WIDTH);
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(field_width),
        );
        browse = ui.button(button).clicked();
    });
    browse
}

/// Render the form into the central panel.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let busy = state.is_busy();

    ui.add_space(8.0);
    ui.add_enabled_ui(!busy, |ui| {
        if path_row(
            ui,
            "Log file:",
            &mut state.input_path,
            "RLM report or ISV log",
            "Open\u{2026}",
        ) {
            pick_input(state);
        }
        ui.add_space(4.0);
        if path_row(
            ui,
            "Output folder:",
            &mut state.output_dir,
            "Directory for the results",
            "Save\u{2026}",
        ) {
            pick_output_dir(state);
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.add_space(theme::LABEL_WIDTH + ui.spacing().item_spacing.x);
            ui.checkbox(&mut state.write_event_data, "Also write all event data")
                .on_hover_text("Writes <name>_AllEventData.txt with every extracted event");
        });
    });

    ui.add_space(10.0);
    ui.vertical_centered(|ui| {
        let generate = ui.add_enabled(
            !busy,
            egui::Button::new("Generate").min_size(egui::vec2(120.0, 28.0)),
        );
        if generate.clicked() {
            state.start_generate();
        }
        if busy {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Analysing\u{2026}");
            });
        }
    });
}
