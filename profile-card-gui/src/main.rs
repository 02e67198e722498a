use iced::{
    Color, Element,
    Length::{self, Fill},
    Task, Theme, application,
    widget::{
        Column, button, center, column, container, image, mouse_area, opaque, row, space, stack,
        text,
    },
};
use profile_card_lib::{
    AvatarReference, ContactAction, CoreConfig, Mode, ProfileCard, StorageAdapter, logging,
    storage::MemoryBackend,
};
use tracing::{error, info};

use crate::{
    components::{
        avatar_picker::{self, AvatarPicker},
        edit_dialog::{self, EditDialog},
    },
    config::GuiConfig,
};

pub mod components;
pub mod config;

const AVATAR_SIZE: f32 = 96.0;

fn main() -> iced::Result {
    application(App::new, App::update, App::view)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    FollowPressed,
    LikePressed,
    EditPressed,
    AvatarPressed,
    ContactPressed(ContactAction),
    ThemePressed,
    DismissNotices,
    // Child messages
    EditDialog(edit_dialog::Message),
    AvatarPicker(avatar_picker::Message),
}

struct App {
    cfg: GuiConfig,
    card: ProfileCard,
    /// Messages for the user that don't block the card, newest last
    notices: Vec<String>,
    // Components
    edit_dialog: EditDialog,
    avatar_picker: AvatarPicker,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        // Human friendly panicking in release mode
        human_panic::setup_panic!();

        logging::init();

        let cfg = GuiConfig::load();
        let mut notices = Vec::new();

        let card = ProfileCard::open().unwrap_or_else(|err| {
            error!("Falling back to a temporary store: {err}");
            notices.push(format!("Changes will not be saved: {err}"));

            let core = CoreConfig::load();
            let storage = StorageAdapter::new(core.namespace.clone(), MemoryBackend::new());
            ProfileCard::new(storage, core)
        });
        let avatar_picker = AvatarPicker::new(card.config().max_avatar_bytes);

        (
            Self {
                cfg,
                card,
                notices,
                edit_dialog: EditDialog,
                avatar_picker,
            },
            Task::none(),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::FollowPressed => {
                self.card.toggle_follow();
                Task::none()
            }
            Message::LikePressed => {
                self.card.toggle_like();
                Task::none()
            }
            Message::EditPressed => {
                let result = self.card.begin_edit();
                self.report(result);
                Task::none()
            }
            Message::AvatarPressed => {
                self.avatar_picker.clear();
                let result = self.card.open_avatar_picker();
                self.report(result);
                Task::none()
            }
            Message::ContactPressed(action) => {
                let uri = self.card.contact(action);
                self.notices.push(format!("Open {uri} to get in touch"));
                Task::none()
            }
            Message::ThemePressed => {
                self.cfg.theme = self.cfg.theme.next();
                self.cfg.save();
                Task::none()
            }
            Message::DismissNotices => {
                self.notices.clear();
                Task::none()
            }
            // Redirect messages to relevant child components
            Message::EditDialog(msg) => {
                match self.edit_dialog.update(msg) {
                    edit_dialog::Action::Input(field, content) => {
                        let result = self.card.update_draft_field(field, content);
                        self.report(result);
                    }
                    edit_dialog::Action::Cancel => self.card.cancel_edit(),
                    edit_dialog::Action::Save => {
                        let result = self.card.commit_edit();
                        self.report(result);
                    }
                }
                Task::none()
            }
            Message::AvatarPicker(msg) => match self.avatar_picker.update(msg) {
                avatar_picker::Action::None => Task::none(),
                avatar_picker::Action::Run(task) => task.map(Message::AvatarPicker),
                avatar_picker::Action::Gallery(index) => {
                    let result = self.card.select_gallery_avatar(index);
                    self.report(result);
                    Task::none()
                }
                avatar_picker::Action::Set(avatar) => {
                    // A decode can finish after the picker was closed
                    if self.card.mode() == &Mode::AvatarPicking {
                        self.card.set_avatar(avatar);
                    }
                    Task::none()
                }
                avatar_picker::Action::Remove => {
                    self.card.clear_avatar();
                    Task::none()
                }
                avatar_picker::Action::Cancel => {
                    self.card.close_avatar_picker();
                    Task::none()
                }
            },
        };

        for err in self.card.take_sync_errors() {
            self.notices.push(format!("Not saved: {err}"));
        }

        task
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let content = column![
            // Top bar
            row![
                space::horizontal(),
                button(text("Theme")).on_press(Message::ThemePressed),
                button(text("Edit")).on_press(Message::EditPressed),
            ]
            .spacing(8),
            self.card_view(),
            self.notices_view(),
        ]
        .spacing(16)
        .padding(20)
        .height(Fill);

        match self.card.mode() {
            Mode::Viewing => content.into(),
            Mode::Editing(draft) => modal(
                content,
                self.edit_dialog.view(draft).map(Message::EditDialog),
                None,
            ),
            Mode::AvatarPicking => modal(
                content,
                self.avatar_picker.view().map(Message::AvatarPicker),
                Some(Message::AvatarPicker(avatar_picker::Message::CancelPressed)),
            ),
        }
    }

    fn card_view(&self) -> Element<'_, Message> {
        let profile = self.card.profile();
        let engagement = self.card.engagement();

        let follow_label = if engagement.is_following() {
            "Following"
        } else {
            "Follow"
        };
        let like_label = if engagement.is_liked() { "♥" } else { "♡" };

        container(
            column![
                row![
                    avatar_view(profile.avatar(), profile.initials()),
                    button(text("Change")).on_press(Message::AvatarPressed),
                ]
                .spacing(8),
                text(profile.name().as_str()).size(24),
                text(format!("{} at {}", profile.title(), profile.company())),
                text(format!(
                    "{} · joined {}",
                    profile.location(),
                    profile.join_date()
                )),
                text(profile.bio().as_str()),
                row![
                    text(format!("{} followers", profile.follower_count())),
                    text(format!("{} following", profile.following_count())),
                    text(format!("{} likes", engagement.likes())),
                ]
                .spacing(16),
                row![
                    button(text(follow_label)).on_press(Message::FollowPressed),
                    button(text(like_label)).on_press(Message::LikePressed),
                    space::horizontal(),
                    button(text("Email")).on_press(Message::ContactPressed(ContactAction::Email)),
                    button(text("Call")).on_press(Message::ContactPressed(ContactAction::Call)),
                ]
                .spacing(8),
            ]
            .spacing(10),
        )
        .padding(20)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
    }

    fn notices_view(&self) -> Element<'_, Message> {
        if self.notices.is_empty() {
            return text("").into();
        }

        column![
            Column::with_children(
                self.notices
                    .iter()
                    .map(|notice| Element::<Message>::from(text(notice.as_str())))
            ),
            button(text("Dismiss")).on_press(Message::DismissNotices),
        ]
        .spacing(6)
        .into()
    }

    fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        if let Err(err) = result {
            info!("Rejected action: {err}");
            self.notices.push(err.to_string());
        }
    }

    pub fn title(&self) -> String {
        format!("{} · Profile Card", self.card.profile().name())
    }

    pub fn theme(&self) -> Theme {
        self.cfg.theme()
    }
}

fn avatar_view(avatar: Option<&AvatarReference>, initials: String) -> Element<'static, Message> {
    match avatar.and_then(AvatarReference::embedded_bytes) {
        Some(bytes) => image(image::Handle::from_bytes(bytes))
            .width(AVATAR_SIZE)
            .height(AVATAR_SIZE)
            .into(),
        None => {
            let caption = if avatar.is_some() { "linked image" } else { "" };
            container(column![text(initials).size(32), text(caption).size(10)])
                .width(AVATAR_SIZE)
                .height(AVATAR_SIZE)
                .center_x(AVATAR_SIZE)
                .center_y(AVATAR_SIZE)
                .style(container::rounded_box)
                .into()
        }
    }
}

pub fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_click_outside: Option<Message>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let mouse_area = mouse_area(center(opaque(content)).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.8,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    }));

    stack![
        base.into(),
        opaque(if let Some(msg) = on_click_outside {
            mouse_area.on_press(msg)
        } else {
            mouse_area
        })
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
