//! Knowledge-base records used to ground chat answers.
//!
//! Records are flattened from the content provider's objects; every field
//! other than the display name is optional because editors may leave
//! metafields empty.

use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    /// May contain HTML markup.
    pub ingredients: Option<String>,
    /// May contain HTML markup.
    pub instructions: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub bio: Option<String>,
    pub specialty: Option<String>,
}

/// Moderation state of a user review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Approved,
    #[default]
    Pending,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Rejected => write!(f, "rejected"),
            ModerationStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl ModerationStatus {
    /// Lenient parse used when mapping provider metafields.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "approved" => ModerationStatus::Approved,
            "pending" => ModerationStatus::Pending,
            "rejected" => ModerationStatus::Rejected,
            _ => ModerationStatus::Unknown,
        }
    }
}

/// A user review of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author_name: String,
    pub content: String,
    pub rating: Option<u8>,
    pub recipe: Option<String>,
    #[serde(default)]
    pub status: ModerationStatus,
}

/// The four collections feeding the knowledge context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub recipes: Vec<Recipe>,
    pub categories: Vec<Category>,
    pub authors: Vec<Author>,
    pub comments: Vec<Comment>,
}

impl KnowledgeBase {
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
            && self.categories.is_empty()
            && self.authors.is_empty()
            && self.comments.is_empty()
    }
}
