use tracing::debug;

use super::{App, AppAction, AppActionContext, AppCommand};

pub(super) fn handle_picker_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    if let AppAction::OpenModelPicker = action {
        app.open_model_picker();
        return None;
    }

    let picker = app.picker.as_mut()?;
    match action {
        AppAction::PickerMoveUp => picker.move_up(),
        AppAction::PickerMoveDown => picker.move_down(),
        AppAction::PickerMoveToStart => picker.move_to_start(),
        AppAction::PickerMoveToEnd => picker.move_to_end(),
        AppAction::PickerApplySelection => apply_selection(app),
        AppAction::PickerEscape => app.close_picker(),
        _ => {}
    }
    None
}

fn apply_selection(app: &mut App) {
    let Some(id) = app
        .picker
        .as_ref()
        .and_then(|picker| picker.selected_id())
        .map(str::to_string)
    else {
        app.close_picker();
        return;
    };
    app.close_picker();

    let result = app.conversation().set_selected_model(&id);
    match result {
        Ok(()) => {
            debug!(model = %id, "Model selected");
            let name = app
                .selected_model()
                .map(|model| model.name.clone())
                .unwrap_or(id);
            app.ui.set_status(format!("Model: {name}"));
        }
        Err(err) => app.ui.set_status(err.to_string()),
    }
}
