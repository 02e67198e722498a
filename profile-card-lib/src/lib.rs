//! Core of the profile card: a namespaced key-value [`storage`] adapter and the
//! [`ProfileCard`] view-model that keeps it synchronized with in-session state.

pub mod avatar;
pub mod card;
pub mod config;
pub mod fs;
pub mod logging;
pub mod profile;
pub mod storage;

pub use avatar::{AvatarError, AvatarReference};
pub use card::{CardError, ContactAction, Mode, ProfileCard};
pub use config::CoreConfig;
pub use profile::{EditDraft, EditableField, EngagementState, Profile};
pub use storage::{Field, StorageAdapter, StorageError};
