use iced::{
    Element,
    widget::{Column, button, column, container, row, space, text, text_input},
};
use profile_card_lib::{EditDraft, EditableField};
use strum::IntoEnumIterator;

#[derive(Debug, Clone)]
pub enum Message {
    FieldInput(EditableField, String),
    CancelPressed,
    ConfirmPressed,
}

pub enum Action {
    Input(EditableField, String),
    Cancel,
    Save,
}

/// Form over the card's edit draft. The draft itself lives in the view-model.
pub struct EditDialog;

impl EditDialog {
    pub fn update(&self, message: Message) -> Action {
        match message {
            Message::FieldInput(field, content) => Action::Input(field, content),
            Message::CancelPressed => Action::Cancel,
            Message::ConfirmPressed => Action::Save,
        }
    }

    pub fn view<'a>(&self, draft: &'a EditDraft) -> Element<'a, Message> {
        let fields = EditableField::iter().map(|field| -> Element<'a, Message> {
            row![
                text(label(field)).width(90),
                text_input("...", draft.get(field))
                    .on_input(move |content| Message::FieldInput(field, content)),
            ]
            .spacing(8)
            .into()
        });

        container(
            column![
                text("Edit profile").size(20),
                Column::with_children(fields).spacing(10),
                space::vertical(),
                row![
                    space::horizontal(),
                    button(text("Cancel")).on_press(Message::CancelPressed),
                    button(text("Save")).on_press(Message::ConfirmPressed),
                ]
                .spacing(8),
            ]
            .spacing(16),
        )
        .padding(20)
        .width(400)
        .height(420)
        .style(container::rounded_box)
        .into()
    }
}

fn label(field: EditableField) -> &'static str {
    match field {
        EditableField::Name => "Name",
        EditableField::Title => "Title",
        EditableField::Company => "Company",
        EditableField::Location => "Location",
        EditableField::Bio => "Bio",
    }
}
