//! Post record types

use serde::{Deserialize, Serialize};

/// A stored post.
///
/// Every field is always present on a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl Post {
    pub fn new(id: u64, title: impl Into<String>, body: impl Into<String>, user_id: u64) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            user_id,
        }
    }

    /// Overwrites the fields carried by `update`, keeping the rest.
    pub fn merge(&mut self, update: PostUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(body) = update.body {
            self.body = body;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
    }
}

/// An update addressed to an existing post.
///
/// `None` fields keep the stored value, so the same type backs both full
/// replacement and partial patches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub id: u64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_id: Option<u64>,
}

impl PostUpdate {
    /// An update that touches no fields.
    pub fn for_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}
