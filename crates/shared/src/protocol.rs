//! Persisted record contract and the partial-update shape applied to it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ReadingStats, UserProfile};

/// Storage key holding the serialized [`UserProfile`].
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Profile form inputs the controller understands, by their `name` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    BirthDate,
    Bio,
    Interests,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Name,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::BirthDate,
        ProfileField::Bio,
        ProfileField::Interests,
    ];

    pub fn from_form_name(name: &str) -> Option<Self> {
        match name {
            "name" | "fullName" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "birthDate" => Some(Self::BirthDate),
            "bio" => Some(Self::Bio),
            "interests" => Some(Self::Interests),
            _ => None,
        }
    }

    /// Element id of the input on the profile page.
    pub fn input_id(self) -> &'static str {
        match self {
            Self::Name => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::BirthDate => "birthDate",
            Self::Bio => "bio",
            Self::Interests => "interests",
        }
    }

    pub fn read(self, profile: &UserProfile) -> &str {
        match self {
            Self::Name => &profile.name,
            Self::Email => &profile.email,
            Self::Phone => &profile.phone,
            Self::BirthDate => &profile.birth_date,
            Self::Bio => &profile.bio,
            Self::Interests => &profile.interests,
        }
    }
}

/// Shallow partial update: every `Some` field overrides, every `None` keeps
/// the stored value. `username` and `join_date` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<String>,
    pub avatar: Option<String>,
    pub stats: Option<ReadingStats>,
}

impl ProfilePatch {
    pub fn avatar(data_url: impl Into<String>) -> Self {
        Self {
            avatar: Some(data_url.into()),
            ..Self::default()
        }
    }

    /// Builds a patch from flat form entries. Later duplicates win and
    /// unrecognized names are dropped.
    pub fn from_form_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut patch = Self::default();
        for (key, value) in fields {
            let key = key.as_ref();
            match ProfileField::from_form_name(key) {
                Some(field) => patch.set(field, value.into()),
                None => debug!(field = key, "ignoring unrecognized profile form field"),
            }
        }
        patch
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::BirthDate => &mut self.birth_date,
            ProfileField::Bio => &mut self.bio,
            ProfileField::Interests => &mut self.interests,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, mut profile: UserProfile) -> UserProfile {
        if let Some(v) = self.name {
            profile.name = v;
        }
        if let Some(v) = self.email {
            profile.email = v;
        }
        if let Some(v) = self.phone {
            profile.phone = v;
        }
        if let Some(v) = self.birth_date {
            profile.birth_date = v;
        }
        if let Some(v) = self.bio {
            profile.bio = v;
        }
        if let Some(v) = self.interests {
            profile.interests = v;
        }
        if let Some(v) = self.avatar {
            profile.avatar = Some(v);
        }
        if let Some(v) = self.stats {
            profile.stats = v;
        }
        profile
    }
}
