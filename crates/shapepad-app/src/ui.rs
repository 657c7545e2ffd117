//! UI components using egui.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Stroke, Vec2};

const PANEL_BG: Color32 = Color32::from_rgb(255, 255, 255);
const BORDER: Color32 = Color32::from_rgb(226, 232, 240);
const MUTED_TEXT: Color32 = Color32::from_rgb(100, 116, 139);

/// Default file name offered by the save dialog.
pub const DEFAULT_FILE_NAME: &str = "shapes.json";

/// Action triggered by the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Add a text label with the given content.
    AddText(String),
    AddPolyline,
    AddCircle,
    /// Save the scene through a file dialog.
    SaveDocument,
    /// Open a scene through a file dialog.
    LoadDocument,
}

/// State the toolbar reads and edits between frames.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Contents of the text field used by "Add Text".
    pub text_input: String,
    pub shape_count: usize,
    /// Id of the shape being moved, if any.
    pub selected: Option<String>,
}

/// Draw the whole UI and return the action the user triggered, if any.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let action = render_toolbar(ctx, ui_state);
    render_status(ctx, ui_state);
    action
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

/// Top toolbar: text field plus the add and file buttons.
fn render_toolbar(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut ui_state.text_input)
                            .hint_text("Enter text")
                            .desired_width(160.0),
                    );
                    if ui.button("Add Text").clicked() {
                        action = Some(UiAction::AddText(ui_state.text_input.clone()));
                    }
                    if ui.button("Add Polyline").clicked() {
                        action = Some(UiAction::AddPolyline);
                    }
                    if ui.button("Add Circle").clicked() {
                        action = Some(UiAction::AddCircle);
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        action = Some(UiAction::SaveDocument);
                    }
                    if ui.button("Open").clicked() {
                        action = Some(UiAction::LoadDocument);
                    }
                });
            });
        });

    action
}

/// Bottom-left status line.
fn render_status(ctx: &Context, ui_state: &UiState) {
    egui::Area::new(egui::Id::new("status"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            let text = match &ui_state.selected {
                Some(id) => format!(
                    "{} shapes | moving {} (Enter to place, Delete to remove)",
                    ui_state.shape_count, id
                ),
                None => format!("{} shapes", ui_state.shape_count),
            };
            ui.label(egui::RichText::new(text).color(MUTED_TEXT).size(12.0));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_action_without_input() {
        let ctx = Context::default();
        let mut state = UiState {
            text_input: "hello".to_string(),
            shape_count: 2,
            selected: Some("circle_3".to_string()),
        };
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &mut state);
        });
        assert!(action.is_none());
        assert_eq!(state.text_input, "hello");
    }
}
