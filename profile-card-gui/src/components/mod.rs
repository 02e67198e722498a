pub mod avatar_picker;
pub mod edit_dialog;
