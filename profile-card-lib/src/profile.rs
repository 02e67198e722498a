//! The data shown on the card.

use getset::{CopyGetters, Getters};
use strum::{Display, EnumIter};

use crate::{avatar::AvatarReference, storage::Field};

pub const DEFAULT_NAME: &str = "Malatesha";
pub const DEFAULT_TITLE: &str = "Frontend Developer";
pub const DEFAULT_COMPANY: &str = "CSUEB";
pub const DEFAULT_LOCATION: &str = "San Francisco, CA";
pub const DEFAULT_BIO: &str = "Passionate about creating beautiful, accessible web experiences. React enthusiast and open source contributor.";
pub const DEFAULT_LIKES: u64 = 42;

const JOIN_DATE: &str = "March 2021";
const FOLLOWER_COUNT: u64 = 1250;
const FOLLOWING_COUNT: u64 = 340;

/// Identity and descriptive fields of the displayed user.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Profile {
    #[getset(get = "pub")]
    pub(crate) name: String,
    #[getset(get = "pub")]
    pub(crate) title: String,
    #[getset(get = "pub")]
    pub(crate) company: String,
    #[getset(get = "pub")]
    pub(crate) location: String,
    #[getset(get = "pub")]
    pub(crate) bio: String,
    #[getset(get = "pub")]
    join_date: String,
    #[getset(get_copy = "pub")]
    follower_count: u64,
    #[getset(get_copy = "pub")]
    following_count: u64,
    pub(crate) avatar: Option<AvatarReference>,
}

impl Profile {
    pub fn avatar(&self) -> Option<&AvatarReference> {
        self.avatar.as_ref()
    }

    /// First character of every word in the name, shown in place of a missing avatar.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }

    pub fn field(&self, field: EditableField) -> &str {
        match field {
            EditableField::Name => &self.name,
            EditableField::Title => &self.title,
            EditableField::Company => &self.company,
            EditableField::Location => &self.location,
            EditableField::Bio => &self.bio,
        }
    }

    /// Snapshot the editable fields.
    pub(crate) fn draft(&self) -> EditDraft {
        EditDraft {
            name: self.name.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            bio: self.bio.clone(),
        }
    }

    /// Replace every editable field at once.
    pub(crate) fn apply(&mut self, draft: EditDraft) {
        let EditDraft {
            name,
            title,
            company,
            location,
            bio,
        } = draft;

        self.name = name;
        self.title = title;
        self.company = company;
        self.location = location;
        self.bio = bio;
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            title: DEFAULT_TITLE.into(),
            company: DEFAULT_COMPANY.into(),
            location: DEFAULT_LOCATION.into(),
            bio: DEFAULT_BIO.into(),
            join_date: JOIN_DATE.into(),
            follower_count: FOLLOWER_COUNT,
            following_count: FOLLOWING_COUNT,
            avatar: None,
        }
    }
}

/// Follow and like state. `likes` only ever changes together with `is_liked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct EngagementState {
    pub(crate) is_following: bool,
    pub(crate) is_liked: bool,
    pub(crate) likes: u64,
}

impl EngagementState {
    pub(crate) fn toggle_follow(&mut self) {
        self.is_following = !self.is_following;
    }

    pub(crate) fn toggle_like(&mut self) {
        if self.is_liked {
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.likes = self.likes.saturating_add(1);
        }
        self.is_liked = !self.is_liked;
    }
}

impl Default for EngagementState {
    fn default() -> Self {
        Self {
            is_following: false,
            is_liked: false,
            likes: DEFAULT_LIKES,
        }
    }
}

/// The fields a user may change through the edit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum EditableField {
    Name,
    Title,
    Company,
    Location,
    Bio,
}

impl From<EditableField> for Field {
    fn from(field: EditableField) -> Self {
        match field {
            EditableField::Name => Field::Name,
            EditableField::Title => Field::Title,
            EditableField::Company => Field::Company,
            EditableField::Location => Field::Location,
            EditableField::Bio => Field::Bio,
        }
    }
}

/// In-progress copy of the editable fields, alive only while editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditDraft {
    name: String,
    title: String,
    company: String,
    location: String,
    bio: String,
}

impl EditDraft {
    pub fn get(&self, field: EditableField) -> &str {
        match field {
            EditableField::Name => &self.name,
            EditableField::Title => &self.title,
            EditableField::Company => &self.company,
            EditableField::Location => &self.location,
            EditableField::Bio => &self.bio,
        }
    }

    pub fn set(&mut self, field: EditableField, value: String) {
        let slot = match field {
            EditableField::Name => &mut self.name,
            EditableField::Title => &mut self.title,
            EditableField::Company => &mut self.company,
            EditableField::Location => &mut self.location,
            EditableField::Bio => &mut self.bio,
        };

        *slot = value;
    }
}
