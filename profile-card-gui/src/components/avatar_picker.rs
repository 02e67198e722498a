use iced::{
    Element, Task,
    widget::{Column, button, column, container, row, space, text},
};
use profile_card_lib::{AvatarReference, avatar::GALLERY};
use rfd::AsyncFileDialog;
use tokio::task::spawn_blocking;
use tracing::warn;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Clone)]
pub enum Message {
    GallerySelected(usize),
    UploadPressed,
    FilePicked(Option<Vec<u8>>),
    FileDecoded(u64, Result<AvatarReference, String>),
    RemovePressed,
    CancelPressed,
}

pub enum Action {
    None,
    Run(Task<Message>),
    Gallery(usize),
    Set(AvatarReference),
    Remove,
    Cancel,
}

pub struct AvatarPicker {
    max_bytes: usize,
    /// Bumped whenever the picker is reset, so decodes started before then are ignored
    generation: u64,
    decoding: bool,
    error: Option<String>,
}

impl AvatarPicker {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            generation: 0,
            decoding: false,
            error: None,
        }
    }

    /// Reset the picker state
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.decoding = false;
        self.error = None;
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::GallerySelected(index) => {
                self.clear();
                Action::Gallery(index)
            }
            Message::UploadPressed => {
                self.error = None;
                Action::Run(Task::perform(
                    async {
                        let file = AsyncFileDialog::new()
                            .add_filter("Images", &IMAGE_EXTENSIONS)
                            .pick_file()
                            .await?;
                        Some(file.read().await)
                    },
                    Message::FilePicked,
                ))
            }
            // Dialog dismissed
            Message::FilePicked(None) => Action::None,
            Message::FilePicked(Some(bytes)) => {
                self.decoding = true;
                let max_bytes = self.max_bytes;
                let generation = self.generation;

                Action::Run(Task::perform(
                    async move {
                        spawn_blocking(move || {
                            AvatarReference::from_image_bytes(&bytes, max_bytes)
                                .map_err(|err| err.to_string())
                        })
                        .await
                        .unwrap_or_else(|err| Err(err.to_string()))
                    },
                    move |result| Message::FileDecoded(generation, result),
                ))
            }
            // The picker was reset while decoding
            Message::FileDecoded(generation, _) if generation != self.generation => Action::None,
            Message::FileDecoded(_, result) => {
                self.decoding = false;
                match result {
                    Ok(avatar) => {
                        self.clear();
                        Action::Set(avatar)
                    }
                    Err(err) => {
                        warn!("Rejected avatar upload: {err}");
                        self.error = Some(err);
                        Action::None
                    }
                }
            }
            Message::RemovePressed => {
                self.clear();
                Action::Remove
            }
            Message::CancelPressed => {
                self.clear();
                Action::Cancel
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let gallery = GALLERY.iter().enumerate().map(|(i, locator)| -> Element<'static, Message> {
            button(text(short_name(locator)))
                .on_press(Message::GallerySelected(i))
                .width(360)
                .into()
        });

        let status: Element<'_, Message> = match (&self.error, self.decoding) {
            (Some(err), _) => text(err.as_str()).into(),
            (None, true) => text("Reading image...").into(),
            (None, false) => text("").into(),
        };

        let mut upload = button(text("Upload..."));
        if !self.decoding {
            upload = upload.on_press(Message::UploadPressed);
        }

        container(
            column![
                text("Choose an avatar").size(20),
                Column::with_children(gallery).spacing(6),
                status,
                space::vertical(),
                row![
                    upload,
                    button(text("Remove")).on_press(Message::RemovePressed),
                    space::horizontal(),
                    button(text("Cancel")).on_press(Message::CancelPressed),
                ]
                .spacing(8),
            ]
            .spacing(12),
        )
        .padding(20)
        .width(400)
        .height(520)
        .style(container::rounded_box)
        .into()
    }
}

/// The photo identifier of a gallery URL, without the query string.
fn short_name(locator: &str) -> &str {
    let path = locator.split('?').next().unwrap_or(locator);
    path.rsplit('/').next().unwrap_or(path)
}
