//! The profile card view-model.
//!
//! [`ProfileCard`] owns the in-session state and writes every change through to its
//! [`StorageAdapter`] as part of the operation that made it. Writes are best-effort: a failed
//! write is logged and recorded (see [`ProfileCard::take_sync_errors`]) but the in-session
//! change always stands.

use std::{mem, str::FromStr};

use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    avatar::{AvatarError, AvatarReference, GALLERY},
    config::CoreConfig,
    profile::{EditDraft, EditableField, EngagementState, Profile},
    storage::{self, Field, StorageAdapter, StorageError},
};

pub type Result<T> = std::result::Result<T, CardError>;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("No edit is in progress")]
    NotEditing,
    #[error("An edit is already in progress")]
    AlreadyEditing,
    #[error("The avatar picker is open")]
    AvatarPickerOpen,
    #[error("`{0}` is not an editable field")]
    UnknownField(String),
    #[error("There is no gallery image number {0}")]
    NoSuchGalleryImage(usize),
    #[error("Embedded images must be uploaded as files, not linked")]
    EmbeddedLocator,
    #[error(transparent)]
    Avatar(#[from] AvatarError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Viewing,
    Editing(EditDraft),
    AvatarPicking,
}

/// External handoffs offered by the card. Nothing is observed after the handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    Email,
    Call,
}

#[derive(Debug)]
pub struct ProfileCard {
    storage: StorageAdapter,
    cfg: CoreConfig,
    profile: Profile,
    engagement: EngagementState,
    mode: Mode,
    sync_errors: Vec<StorageError>,
}

impl ProfileCard {
    /// Load the configuration and open the card against the on-disk store.
    pub fn open() -> storage::Result<Self> {
        let cfg = CoreConfig::load();
        let storage = StorageAdapter::open(&cfg)?;

        Ok(Self::new(storage, cfg))
    }

    /// Seed a card from whatever `storage` holds. Missing or unreadable entries take their
    /// defaults.
    pub fn new(storage: StorageAdapter, cfg: CoreConfig) -> Self {
        let mut profile = Profile::default();

        let mut draft = profile.draft();
        for field in EditableField::iter() {
            if let Some(value) = storage.get::<String>(field.into()) {
                draft.set(field, value);
            }
        }
        profile.apply(draft);
        profile.avatar = storage
            .get::<Option<AvatarReference>>(Field::ProfileImage)
            .flatten();

        let defaults = EngagementState::default();
        let likes = storage.get(Field::Likes).unwrap_or(defaults.likes);
        // A like is always counted, so there can't be one when the count is zero
        let is_liked = storage.get(Field::IsLiked).unwrap_or(defaults.is_liked) && likes > 0;
        let engagement = EngagementState {
            is_following: storage
                .get(Field::IsFollowing)
                .unwrap_or(defaults.is_following),
            is_liked,
            likes,
        };

        debug!("Loaded profile card from namespace `{}`", storage.namespace());

        Self {
            storage,
            cfg,
            profile,
            engagement,
            mode: Mode::Viewing,
            sync_errors: Vec::new(),
        }
    }

    // State

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn engagement(&self) -> EngagementState {
        self.engagement
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match &self.mode {
            Mode::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Storage errors hit while synchronizing since the last call, oldest first.
    pub fn take_sync_errors(&mut self) -> Vec<StorageError> {
        mem::take(&mut self.sync_errors)
    }

    // Engagement

    pub fn toggle_follow(&mut self) {
        self.engagement.toggle_follow();

        let result = self
            .storage
            .set(Field::IsFollowing, &self.engagement.is_following);
        self.record(result);
    }

    pub fn toggle_like(&mut self) {
        self.engagement.toggle_like();

        let result = self.storage.set(Field::Likes, &self.engagement.likes);
        self.record(result);
        let result = self.storage.set(Field::IsLiked, &self.engagement.is_liked);
        self.record(result);
    }

    // Editing

    pub fn begin_edit(&mut self) -> Result<()> {
        match self.mode {
            Mode::Viewing => {
                self.mode = Mode::Editing(self.profile.draft());
                Ok(())
            }
            Mode::Editing(_) => Err(CardError::AlreadyEditing),
            Mode::AvatarPicking => Err(CardError::AvatarPickerOpen),
        }
    }

    pub fn update_draft_field(&mut self, field: EditableField, value: impl Into<String>) -> Result<()> {
        match &mut self.mode {
            Mode::Editing(draft) => {
                draft.set(field, value.into());
                Ok(())
            }
            _ => Err(CardError::NotEditing),
        }
    }

    /// Promote the draft to the profile and store every editable field.
    pub fn commit_edit(&mut self) -> Result<()> {
        let draft = match mem::take(&mut self.mode) {
            Mode::Editing(draft) => draft,
            other => {
                self.mode = other;
                return Err(CardError::NotEditing);
            }
        };

        self.profile.apply(draft);
        for field in EditableField::iter() {
            let result = self.storage.set(field.into(), self.profile.field(field));
            self.record(result);
        }

        info!("Saved profile edits");
        Ok(())
    }

    /// Drop the draft. Does nothing when no edit is in progress.
    pub fn cancel_edit(&mut self) {
        if matches!(self.mode, Mode::Editing(_)) {
            self.mode = Mode::Viewing;
        }
    }

    // Avatar

    pub fn open_avatar_picker(&mut self) -> Result<()> {
        match self.mode {
            Mode::Viewing | Mode::AvatarPicking => {
                self.mode = Mode::AvatarPicking;
                Ok(())
            }
            Mode::Editing(_) => Err(CardError::AlreadyEditing),
        }
    }

    /// Leave the picker without changing anything.
    pub fn close_avatar_picker(&mut self) {
        if self.mode == Mode::AvatarPicking {
            self.mode = Mode::Viewing;
        }
    }

    /// Decode a local image and use it as the avatar. On failure nothing changes and the picker
    /// stays open.
    pub fn set_avatar_from_local_file(&mut self, bytes: &[u8]) -> Result<()> {
        let avatar = AvatarReference::from_image_bytes(bytes, self.cfg.max_avatar_bytes)
            .inspect_err(|err| warn!("Rejected avatar upload: {err}"))?;

        self.set_avatar(avatar);
        Ok(())
    }

    /// Link an external image. `data:` URLs are rejected; embedded images only come from
    /// [`Self::set_avatar_from_local_file`].
    pub fn set_avatar_from_reference(&mut self, locator: impl Into<String>) -> Result<()> {
        let avatar = AvatarReference::from(locator.into());
        if !matches!(avatar, AvatarReference::Locator(_)) {
            warn!("Rejected embedded image given as a locator");
            return Err(CardError::EmbeddedLocator);
        }

        self.set_avatar(avatar);
        Ok(())
    }

    /// Use one of the predefined [`GALLERY`] images.
    pub fn select_gallery_avatar(&mut self, index: usize) -> Result<()> {
        let locator = GALLERY
            .get(index)
            .ok_or(CardError::NoSuchGalleryImage(index))?;

        self.set_avatar_from_reference(*locator)
    }

    /// Use an avatar that was already decoded, e.g. off the UI thread.
    pub fn set_avatar(&mut self, avatar: AvatarReference) {
        debug!("Setting avatar to {avatar}");
        self.profile.avatar = Some(avatar);
        self.sync_avatar();
        self.close_avatar_picker();
    }

    pub fn clear_avatar(&mut self) {
        self.profile.avatar = None;
        self.sync_avatar();
        self.close_avatar_picker();
    }

    // Contact

    /// The URI to hand off to the system for a contact action.
    pub fn contact(&self, action: ContactAction) -> String {
        let uri = match action {
            ContactAction::Email => format!("mailto:{}", self.cfg.contact.email),
            ContactAction::Call => format!("tel:{}", self.cfg.contact.phone),
        };

        info!("Contact handoff: {uri}");
        uri
    }

    fn sync_avatar(&mut self) {
        let result = match &self.profile.avatar {
            Some(avatar) => self.storage.set(Field::ProfileImage, avatar),
            None => self.storage.remove(Field::ProfileImage),
        };
        self.record(result);
    }

    fn record(&mut self, result: storage::Result<()>) {
        if let Err(err) = result {
            self.sync_errors.push(err);
        }
    }

    /// Return a card over an empty in-memory store, along with a handle to that store.
    #[cfg(test)]
    pub(crate) fn mock() -> (Self, crate::storage::MemoryBackend) {
        let backend = crate::storage::MemoryBackend::new();
        let cfg = CoreConfig::mock();
        let storage = StorageAdapter::new(cfg.namespace.clone(), backend.clone());

        (Self::new(storage, cfg), backend)
    }
}

impl FromStr for EditableField {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        EditableField::iter()
            .find(|field| field.to_string() == s)
            .ok_or_else(|| CardError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        avatar::test::png_bytes,
        profile::{DEFAULT_BIO, DEFAULT_LIKES, DEFAULT_NAME},
        storage::MemoryBackend,
    };

    use super::*;

    fn reopen(backend: &MemoryBackend) -> ProfileCard {
        let cfg = CoreConfig::mock();
        ProfileCard::new(StorageAdapter::new(cfg.namespace.clone(), backend.clone()), cfg)
    }

    #[test]
    fn test_defaults_on_empty_store() {
        let (card, backend) = ProfileCard::mock();

        assert!(!card.engagement().is_following());
        assert!(!card.engagement().is_liked());
        assert_eq!(card.engagement().likes(), DEFAULT_LIKES);
        assert_eq!(card.profile().avatar(), None);
        assert_eq!(card.profile().name(), DEFAULT_NAME);
        assert_eq!(card.profile().bio(), DEFAULT_BIO);
        assert_eq!(card.profile().follower_count(), 1250);
        assert_eq!(card.mode(), &Mode::Viewing);

        // Loading never writes
        assert!(backend.is_empty());
    }

    #[test]
    fn test_malformed_entries_fall_back() {
        let (_, backend) = ProfileCard::mock();
        backend.insert_raw("profileCard_likes", "-3");
        backend.insert_raw("profileCard_isFollowing", "maybe");
        backend.insert_raw("profileCard_name", "42");

        let card = reopen(&backend);

        assert_eq!(card.engagement().likes(), DEFAULT_LIKES);
        assert!(!card.engagement().is_following());
        assert_eq!(card.profile().name(), DEFAULT_NAME);
    }

    #[test]
    fn test_stored_empty_string_is_kept() {
        let (_, backend) = ProfileCard::mock();
        backend.insert_raw("profileCard_bio", "\"\"");
        backend.insert_raw("profileCard_profileImage", "null");

        let card = reopen(&backend);

        assert_eq!(card.profile().bio(), "");
        assert_eq!(card.profile().avatar(), None);
    }

    #[test]
    fn test_toggle_follow() {
        let (mut card, backend) = ProfileCard::mock();

        card.toggle_follow();
        assert!(card.engagement().is_following());
        assert_eq!(backend.raw("profileCard_isFollowing").as_deref(), Some("true"));

        card.toggle_follow();
        assert!(!card.engagement().is_following());
        assert_eq!(backend.raw("profileCard_isFollowing").as_deref(), Some("false"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_toggle_like_sequence() {
        let (mut card, backend) = ProfileCard::mock();

        for toggles in 1..=7u64 {
            card.toggle_like();

            let liked = toggles % 2 == 1;
            assert_eq!(card.engagement().is_liked(), liked);
            assert_eq!(
                card.engagement().likes(),
                if liked { DEFAULT_LIKES + 1 } else { DEFAULT_LIKES }
            );
        }

        assert_eq!(backend.raw("profileCard_likes").as_deref(), Some("43"));
        assert_eq!(backend.raw("profileCard_isLiked").as_deref(), Some("true"));

        let card = reopen(&backend);
        assert!(card.engagement().is_liked());
        assert_eq!(card.engagement().likes(), 43);
    }

    #[test]
    fn test_commit_edit() {
        let (mut card, backend) = ProfileCard::mock();

        card.begin_edit().unwrap();
        card.update_draft_field(EditableField::Name, "Ada").unwrap();
        card.update_draft_field(EditableField::Location, "").unwrap();

        // Nothing changes until the edit is committed
        assert_eq!(card.profile().name(), DEFAULT_NAME);
        assert!(backend.is_empty());

        card.commit_edit().unwrap();

        assert_eq!(card.mode(), &Mode::Viewing);
        assert_eq!(card.profile().name(), "Ada");
        assert_eq!(card.profile().location(), "");
        assert_eq!(backend.raw("profileCard_name").as_deref(), Some("\"Ada\""));
        assert_eq!(backend.raw("profileCard_location").as_deref(), Some("\"\""));
        // Every editable field is written
        assert_eq!(backend.len(), 5);

        let card = reopen(&backend);
        assert_eq!(card.profile().name(), "Ada");
        assert_eq!(card.profile().location(), "");
    }

    #[test]
    fn test_cancel_edit_discards_draft() {
        let (mut card, backend) = ProfileCard::mock();
        let before = card.profile().clone();

        card.begin_edit().unwrap();
        card.update_draft_field(EditableField::Bio, "changed").unwrap();
        card.cancel_edit();

        assert_eq!(card.profile(), &before);
        assert_eq!(card.draft(), None);
        assert!(backend.is_empty());

        // A new edit starts from the committed profile, not the discarded draft
        card.begin_edit().unwrap();
        assert_eq!(card.draft().unwrap().get(EditableField::Bio), DEFAULT_BIO);
    }

    #[test]
    fn test_cancel_without_edit_is_noop() {
        let (mut card, _) = ProfileCard::mock();
        let before = card.profile().clone();

        card.cancel_edit();
        card.cancel_edit();

        assert_eq!(card.profile(), &before);
        assert_eq!(card.mode(), &Mode::Viewing);
    }

    #[test]
    fn test_edit_state_checks() {
        let (mut card, _) = ProfileCard::mock();

        assert!(matches!(
            card.update_draft_field(EditableField::Name, "Ada"),
            Err(CardError::NotEditing)
        ));
        assert!(matches!(card.commit_edit(), Err(CardError::NotEditing)));

        card.begin_edit().unwrap();
        card.update_draft_field(EditableField::Name, "Ada").unwrap();
        assert!(matches!(card.begin_edit(), Err(CardError::AlreadyEditing)));
        // The rejected begin keeps the in-progress draft
        assert_eq!(card.draft().unwrap().get(EditableField::Name), "Ada");

        assert!(matches!(
            card.open_avatar_picker(),
            Err(CardError::AlreadyEditing)
        ));
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("bio".parse::<EditableField>().unwrap(), EditableField::Bio);
        assert!(matches!(
            "followers".parse::<EditableField>(),
            Err(CardError::UnknownField(name)) if name == "followers"
        ));
    }

    #[test]
    fn test_picker_blocks_edit() {
        let (mut card, _) = ProfileCard::mock();

        card.open_avatar_picker().unwrap();
        assert!(matches!(card.begin_edit(), Err(CardError::AvatarPickerOpen)));
        assert!(matches!(card.commit_edit(), Err(CardError::NotEditing)));
        assert_eq!(card.mode(), &Mode::AvatarPicking);

        card.close_avatar_picker();
        assert_eq!(card.mode(), &Mode::Viewing);
        card.begin_edit().unwrap();
    }

    #[test]
    fn test_gallery_avatar() {
        let (mut card, backend) = ProfileCard::mock();

        card.open_avatar_picker().unwrap();
        card.select_gallery_avatar(2).unwrap();

        assert_eq!(card.mode(), &Mode::Viewing);
        assert_eq!(
            card.profile().avatar(),
            Some(&AvatarReference::Locator(GALLERY[2].into()))
        );
        assert_eq!(
            backend.raw("profileCard_profileImage"),
            Some(format!("\"{}\"", GALLERY[2]))
        );

        assert!(matches!(
            card.select_gallery_avatar(GALLERY.len()),
            Err(CardError::NoSuchGalleryImage(_))
        ));
    }

    #[test]
    fn test_local_file_avatar() {
        let (mut card, backend) = ProfileCard::mock();

        card.open_avatar_picker().unwrap();
        card.set_avatar_from_local_file(&png_bytes()).unwrap();

        assert_eq!(card.mode(), &Mode::Viewing);
        assert!(matches!(
            card.profile().avatar(),
            Some(AvatarReference::Embedded(_))
        ));

        let card = reopen(&backend);
        assert_eq!(
            card.profile().avatar().and_then(AvatarReference::embedded_bytes),
            Some(png_bytes())
        );
    }

    #[test]
    fn test_decode_failure_keeps_avatar() {
        let (mut card, backend) = ProfileCard::mock();
        card.set_avatar_from_reference("https://example.com/me.png").unwrap();
        let before = card.profile().avatar().cloned();
        let stored = backend.raw("profileCard_profileImage");

        card.open_avatar_picker().unwrap();
        assert!(matches!(
            card.set_avatar_from_local_file(b"GIF89a but not really"),
            Err(CardError::Avatar(AvatarError::Undecodable(_)))
        ));

        assert_eq!(card.profile().avatar().cloned(), before);
        assert_eq!(backend.raw("profileCard_profileImage"), stored);
        // The picker stays open so the user can try another file
        assert_eq!(card.mode(), &Mode::AvatarPicking);
    }

    #[test]
    fn test_oversized_file_rejected() {
        let (mut card, _) = ProfileCard::mock();
        let too_big = vec![0u8; card.config().max_avatar_bytes + 1];

        assert!(matches!(
            card.set_avatar_from_local_file(&too_big),
            Err(CardError::Avatar(AvatarError::TooLarge { .. }))
        ));
        assert_eq!(card.profile().avatar(), None);
    }

    #[test]
    fn test_clear_avatar() {
        let (mut card, backend) = ProfileCard::mock();
        card.set_avatar_from_local_file(&png_bytes()).unwrap();
        assert!(backend.raw("profileCard_profileImage").is_some());

        card.open_avatar_picker().unwrap();
        card.clear_avatar();

        assert_eq!(card.profile().avatar(), None);
        assert_eq!(backend.raw("profileCard_profileImage"), None);
        assert_eq!(card.mode(), &Mode::Viewing);
        assert_eq!(reopen(&backend).profile().avatar(), None);
    }

    #[test]
    fn test_failed_writes_keep_session_state() {
        let (mut card, backend) = ProfileCard::mock();
        backend.reject_writes(true);

        card.toggle_like();
        card.toggle_follow();
        card.set_avatar_from_reference("https://example.com/me.png").unwrap();
        card.clear_avatar();

        assert!(card.engagement().is_liked());
        assert_eq!(card.engagement().likes(), DEFAULT_LIKES + 1);
        assert!(card.engagement().is_following());
        assert_eq!(card.profile().avatar(), None);

        let errors = card.take_sync_errors();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().all(|e| matches!(e, StorageError::Rejected(_))));
        assert!(card.take_sync_errors().is_empty());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_contact() {
        let (card, _) = ProfileCard::mock();

        assert_eq!(card.contact(ContactAction::Email), "mailto:invincible@gmail.com");
        assert_eq!(card.contact(ContactAction::Call), "tel:3418003822");
    }

    #[test]
    fn test_data_url_locator_rejected() {
        let (mut card, backend) = ProfileCard::mock();
        card.select_gallery_avatar(0).unwrap();
        let before = card.profile().avatar().cloned();

        card.open_avatar_picker().unwrap();
        assert!(matches!(
            card.set_avatar_from_reference("data:text/plain;base64,aGVsbG8="),
            Err(CardError::EmbeddedLocator)
        ));

        assert_eq!(card.profile().avatar().cloned(), before);
        assert_eq!(card.mode(), &Mode::AvatarPicking);
        assert_eq!(reopen(&backend).profile().avatar().cloned(), before);
    }

    #[test]
    fn test_locator_survives_reload() {
        let (mut card, backend) = ProfileCard::mock();
        card.set_avatar_from_reference("https://example.com/data:me.png").unwrap();

        assert_eq!(reopen(&backend).profile().avatar(), card.profile().avatar());
    }

    #[test]
    fn test_stored_like_without_count_is_cleared() {
        let (_, backend) = ProfileCard::mock();
        backend.insert_raw("profileCard_likes", "0");
        backend.insert_raw("profileCard_isLiked", "true");

        let mut card = reopen(&backend);
        assert!(!card.engagement().is_liked());
        assert_eq!(card.engagement().likes(), 0);

        card.toggle_like();
        card.toggle_like();
        assert!(!card.engagement().is_liked());
        assert_eq!(card.engagement().likes(), 0);
    }
}
