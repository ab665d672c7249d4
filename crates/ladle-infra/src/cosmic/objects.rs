//! Object queries and mapping Cosmic objects to knowledge records.
//!
//! Metafields are free-form JSON. Text fields may arrive as strings, numbers
//! or (for relations and select-dropdowns) nested objects, so every field is
//! read through [`meta_text`].

use serde_json::Value;

use ladle_core::knowledge::source::ContentSource;
use ladle_types::error::ContentError;
use ladle_types::knowledge::{Author, Category, Comment, ModerationStatus, Recipe};
use secrecy::ExposeSecret;

use super::client::CosmicClient;
use super::types::{CosmicObject, ObjectsResponse};

/// Cosmic object type slugs.
pub mod object_type {
    pub const RECIPES: &str = "recipes";
    pub const CATEGORIES: &str = "categories";
    pub const AUTHORS: &str = "authors";
    pub const COMMENTS: &str = "comments";
}

const OBJECT_PROPS: &str = "title,slug,metadata";

impl CosmicClient {
    /// Fetch up to `limit` objects of `object_type`, newest first.
    ///
    /// Cosmic answers 404 when a query matches nothing; that is an empty
    /// result, not an error.
    pub async fn fetch_objects(
        &self,
        object_type: &str,
        limit: usize,
    ) -> Result<Vec<CosmicObject>, ContentError> {
        let query = serde_json::json!({ "type": object_type }).to_string();
        let limit = limit.to_string();

        let response = self
            .http
            .get(self.api_url("/objects"))
            .query(&[
                ("query", query.as_str()),
                ("props", OBJECT_PROPS),
                ("limit", limit.as_str()),
                ("depth", "1"),
                ("sort", "-created_at"),
                ("read_key", self.read_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            tracing::debug!(object_type, "no objects found");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
            });
        }

        let body: ObjectsResponse = response
            .json()
            .await
            .map_err(|e| ContentError::InvalidResponse(e.to_string()))?;

        tracing::debug!(object_type, count = body.objects.len(), total = ?body.total, "fetched objects");
        Ok(body.objects)
    }
}

impl ContentSource for CosmicClient {
    async fn recipes(&self, limit: usize) -> Result<Vec<Recipe>, ContentError> {
        let objects = self.fetch_objects(object_type::RECIPES, limit).await?;
        Ok(objects.iter().map(recipe_from_object).collect())
    }

    async fn categories(&self, limit: usize) -> Result<Vec<Category>, ContentError> {
        let objects = self.fetch_objects(object_type::CATEGORIES, limit).await?;
        Ok(objects.iter().map(category_from_object).collect())
    }

    async fn authors(&self, limit: usize) -> Result<Vec<Author>, ContentError> {
        let objects = self.fetch_objects(object_type::AUTHORS, limit).await?;
        Ok(objects.iter().map(author_from_object).collect())
    }

    async fn comments(&self, limit: usize) -> Result<Vec<Comment>, ContentError> {
        let objects = self.fetch_objects(object_type::COMMENTS, limit).await?;
        Ok(objects.iter().map(comment_from_object).collect())
    }
}

/// Read a metafield as display text.
///
/// Strings are trimmed, numbers are formatted, and objects yield their
/// `title` or `value`. Empty values are `None`.
pub fn meta_text(metadata: &Value, key: &str) -> Option<String> {
    value_text(metadata.get(key)?)
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => return map.get("title").or_else(|| map.get("value")).and_then(value_text),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// First metafield among `keys` that has text.
fn meta_text_any(metadata: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| meta_text(metadata, key))
}

/// Star rating from a number, a numeric string or a select value like "4 stars".
pub fn meta_rating(metadata: &Value, key: &str) -> Option<u8> {
    let value = metadata.get(key)?;
    let rating = match value {
        Value::Number(n) => n.as_u64(),
        Value::Object(map) => map
            .get("key")
            .or_else(|| map.get("value"))
            .and_then(|v| leading_number(&value_text(v)?)),
        _ => leading_number(&value_text(value)?),
    }?;
    u8::try_from(rating).ok()
}

fn leading_number(text: &str) -> Option<u64> {
    let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn recipe_from_object(object: &CosmicObject) -> Recipe {
    let meta = &object.metadata;
    Recipe {
        title: object.title.clone(),
        slug: object.slug.clone(),
        description: meta_text(meta, "description"),
        ingredients: meta_text(meta, "ingredients"),
        instructions: meta_text(meta, "instructions"),
        prep_time: meta_text(meta, "prep_time"),
        cook_time: meta_text(meta, "cook_time"),
        servings: meta_text(meta, "servings"),
        difficulty: meta_text_any(meta, &["difficulty", "difficulty_level"]),
        category: meta_text(meta, "category"),
        author: meta_text_any(meta, &["author", "chef"]),
    }
}

pub fn category_from_object(object: &CosmicObject) -> Category {
    Category {
        name: meta_text(&object.metadata, "name").unwrap_or_else(|| object.title.clone()),
        slug: object.slug.clone(),
        description: meta_text(&object.metadata, "description"),
    }
}

pub fn author_from_object(object: &CosmicObject) -> Author {
    let meta = &object.metadata;
    Author {
        name: meta_text(meta, "name").unwrap_or_else(|| object.title.clone()),
        slug: object.slug.clone(),
        bio: meta_text(meta, "bio"),
        specialty: meta_text_any(meta, &["specialty", "specialties"]),
    }
}

pub fn comment_from_object(object: &CosmicObject) -> Comment {
    let meta = &object.metadata;
    Comment {
        author_name: meta_text_any(meta, &["author_name", "name"]).unwrap_or_else(|| object.title.clone()),
        content: meta_text_any(meta, &["comment", "content"]).unwrap_or_default(),
        rating: meta_rating(meta, "rating"),
        recipe: meta_text(meta, "recipe"),
        status: meta_text(meta, "status")
            .map(|s| ModerationStatus::from_label(&s))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(title: &str, metadata: Value) -> CosmicObject {
        CosmicObject {
            title: title.into(),
            slug: title.to_lowercase().replace(' ', "-"),
            metadata,
        }
    }

    #[test]
    fn test_meta_text_shapes() {
        let meta = json!({
            "plain": "  Easy ",
            "number": 4,
            "relation": { "title": "Italian", "slug": "italian" },
            "select": { "key": "hard", "value": "Hard" },
            "blank": "",
            "list": ["a"],
        });
        assert_eq!(meta_text(&meta, "plain").as_deref(), Some("Easy"));
        assert_eq!(meta_text(&meta, "number").as_deref(), Some("4"));
        assert_eq!(meta_text(&meta, "relation").as_deref(), Some("Italian"));
        assert_eq!(meta_text(&meta, "select").as_deref(), Some("Hard"));
        assert_eq!(meta_text(&meta, "blank"), None);
        assert_eq!(meta_text(&meta, "list"), None);
        assert_eq!(meta_text(&meta, "missing"), None);
    }

    #[test]
    fn test_meta_rating_shapes() {
        assert_eq!(meta_rating(&json!({"rating": 5}), "rating"), Some(5));
        assert_eq!(meta_rating(&json!({"rating": "4"}), "rating"), Some(4));
        assert_eq!(meta_rating(&json!({"rating": "3 stars"}), "rating"), Some(3));
        assert_eq!(
            meta_rating(&json!({"rating": {"key": "2", "value": "2 Stars"}}), "rating"),
            Some(2)
        );
        assert_eq!(meta_rating(&json!({"rating": "great"}), "rating"), None);
        assert_eq!(meta_rating(&json!({"rating": 900}), "rating"), None);
    }

    #[test]
    fn test_recipe_mapping() {
        let recipe = recipe_from_object(&object(
            "Tomato Soup",
            json!({
                "description": "Warm and simple",
                "ingredients": "<ul><li>Tomatoes</li></ul>",
                "prep_time": "10 min",
                "servings": 4,
                "difficulty": { "key": "easy", "value": "Easy" },
                "category": { "title": "Soups" },
                "author": { "title": "Ana" },
            }),
        ));
        assert_eq!(recipe.title, "Tomato Soup");
        assert_eq!(recipe.slug, "tomato-soup");
        assert_eq!(recipe.servings.as_deref(), Some("4"));
        assert_eq!(recipe.difficulty.as_deref(), Some("Easy"));
        assert_eq!(recipe.category.as_deref(), Some("Soups"));
        assert_eq!(recipe.author.as_deref(), Some("Ana"));
        assert!(recipe.cook_time.is_none());
        assert!(recipe.instructions.is_none());
    }

    #[test]
    fn test_category_and_author_fall_back_to_title() {
        let category = category_from_object(&object("Desserts", Value::Null));
        assert_eq!(category.name, "Desserts");
        assert!(category.description.is_none());

        let author = author_from_object(&object(
            "chef-ana",
            json!({ "name": "Ana Lima", "specialties": "Baking" }),
        ));
        assert_eq!(author.name, "Ana Lima");
        assert_eq!(author.specialty.as_deref(), Some("Baking"));
    }

    #[test]
    fn test_comment_mapping() {
        let comment = comment_from_object(&object(
            "Review 1",
            json!({
                "author_name": "Sam",
                "comment": "Loved it",
                "rating": "5",
                "recipe": { "title": "Tomato Soup" },
                "status": { "key": "approved", "value": "Approved" },
            }),
        ));
        assert_eq!(comment.author_name, "Sam");
        assert_eq!(comment.content, "Loved it");
        assert_eq!(comment.rating, Some(5));
        assert_eq!(comment.recipe.as_deref(), Some("Tomato Soup"));
        assert_eq!(comment.status, ModerationStatus::Approved);

        let pending = comment_from_object(&object("Review 2", json!({ "content": "ok" })));
        assert_eq!(pending.author_name, "Review 2");
        assert_eq!(pending.status, ModerationStatus::Pending);
    }
}
