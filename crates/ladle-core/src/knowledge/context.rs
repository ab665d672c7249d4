//! Knowledge-context gathering and rendering.
//!
//! Gathering fans out four independent fetches; rendering is a pure function
//! of the gathered collections, so identical inputs always produce
//! byte-identical context text.

use std::fmt::Write;
use std::sync::LazyLock;

use ladle_types::knowledge::{Author, Category, Comment, KnowledgeBase, ModerationStatus, Recipe};
use regex::Regex;

use super::source::ContentSource;

pub const RECIPE_LIMIT: usize = 50;
pub const CATEGORY_LIMIT: usize = 20;
pub const AUTHOR_LIMIT: usize = 20;
pub const COMMENT_LIMIT: usize = 30;

/// Approved reviews rendered into the context.
pub const MAX_REVIEWS: usize = 10;

/// Instruction text beyond this many characters is cut and marked with `...`.
pub const INSTRUCTION_PREVIEW_CHARS: usize = 200;

const MISSING: &str = "N/A";
const NONE_AVAILABLE: &str = "none available";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Fetch all four collections concurrently.
///
/// A failed fetch is logged and replaced by an empty collection; it never
/// aborts the others.
pub async fn gather_knowledge<C: ContentSource>(source: &C) -> KnowledgeBase {
    let (recipes, categories, authors, comments) = tokio::join!(
        source.recipes(RECIPE_LIMIT),
        source.categories(CATEGORY_LIMIT),
        source.authors(AUTHOR_LIMIT),
        source.comments(COMMENT_LIMIT),
    );

    KnowledgeBase {
        recipes: settle("recipes", recipes),
        categories: settle("categories", categories),
        authors: settle("authors", authors),
        comments: settle("comments", comments),
    }
}

fn settle<T, E: std::fmt::Display>(collection: &str, result: Result<Vec<T>, E>) -> Vec<T> {
    match result {
        Ok(items) => {
            tracing::debug!(collection, count = items.len(), "fetched knowledge collection");
            items
        }
        Err(e) => {
            tracing::warn!(collection, error = %e, "knowledge fetch failed, using empty collection");
            Vec::new()
        }
    }
}

/// Gather and render the context block. Regenerated on every call.
pub async fn generate_context<C: ContentSource>(source: &C) -> String {
    render_context(&gather_knowledge(source).await)
}

/// Render the knowledge base as a prompt block.
///
/// Sections appear in fixed order (recipes, categories, authors, reviews).
/// Only approved reviews are included, at most [`MAX_REVIEWS`] in fetch
/// order.
pub fn render_context(kb: &KnowledgeBase) -> String {
    let mut out = String::new();
    out.push_str("=== RECIPE KNOWLEDGE BASE ===\n");
    out.push_str(
        "Use the following information about our recipes, categories, chefs and reviews \
         to answer questions accurately.\n",
    );

    out.push_str(&format!("\nRECIPES ({}):\n", kb.recipes.len()));
    if kb.recipes.is_empty() {
        out.push_str(NONE_AVAILABLE);
        out.push('\n');
    }
    for recipe in &kb.recipes {
        render_recipe(&mut out, recipe);
    }

    out.push_str(&format!("\nCATEGORIES ({}):\n", kb.categories.len()));
    if kb.categories.is_empty() {
        out.push_str(NONE_AVAILABLE);
        out.push('\n');
    }
    for category in &kb.categories {
        render_category(&mut out, category);
    }

    out.push_str(&format!("\nCHEFS & AUTHORS ({}):\n", kb.authors.len()));
    if kb.authors.is_empty() {
        out.push_str(NONE_AVAILABLE);
        out.push('\n');
    }
    for author in &kb.authors {
        render_author(&mut out, author);
    }

    let reviews: Vec<&Comment> = kb
        .comments
        .iter()
        .filter(|c| c.status == ModerationStatus::Approved)
        .take(MAX_REVIEWS)
        .collect();
    out.push_str(&format!("\nRECENT REVIEWS ({}):\n", reviews.len()));
    if reviews.is_empty() {
        out.push_str(NONE_AVAILABLE);
        out.push('\n');
    }
    for review in reviews {
        render_review(&mut out, review);
    }

    out.push_str("=== END KNOWLEDGE BASE ===");
    out
}

fn render_recipe(out: &mut String, recipe: &Recipe) {
    let instructions = recipe
        .instructions
        .as_deref()
        .map(strip_html)
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(&s, INSTRUCTION_PREVIEW_CHARS));

    // Writing to a String cannot fail.
    let _ = writeln!(out, "- {}", recipe.title);
    let _ = writeln!(out, "  Description: {}", text_or_missing(recipe.description.as_deref()));
    let _ = writeln!(
        out,
        "  Category: {} | Author: {}",
        field_or_missing(recipe.category.as_deref()),
        field_or_missing(recipe.author.as_deref()),
    );
    let _ = writeln!(
        out,
        "  Prep: {} | Cook: {} | Servings: {} | Difficulty: {}",
        field_or_missing(recipe.prep_time.as_deref()),
        field_or_missing(recipe.cook_time.as_deref()),
        field_or_missing(recipe.servings.as_deref()),
        field_or_missing(recipe.difficulty.as_deref()),
    );
    let _ = writeln!(out, "  Ingredients: {}", text_or_missing(recipe.ingredients.as_deref()));
    let _ = writeln!(
        out,
        "  Instructions: {}",
        instructions.as_deref().unwrap_or(MISSING)
    );
}

fn render_category(out: &mut String, category: &Category) {
    let _ = writeln!(
        out,
        "- {}: {}",
        category.name,
        text_or_missing(category.description.as_deref())
    );
}

fn render_author(out: &mut String, author: &Author) {
    let _ = writeln!(
        out,
        "- {} (Specialty: {}): {}",
        author.name,
        field_or_missing(author.specialty.as_deref()),
        text_or_missing(author.bio.as_deref()),
    );
}

fn render_review(out: &mut String, review: &Comment) {
    let rating = review
        .rating
        .map(|r| format!("{r}/5"))
        .unwrap_or_else(|| MISSING.to_string());
    let _ = writeln!(
        out,
        "- {} on \"{}\" (Rating: {}): {}",
        review.author_name,
        field_or_missing(review.recipe.as_deref()),
        rating,
        text_or_missing(Some(review.content.as_str())),
    );
}

fn field_or_missing(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => MISSING,
    }
}

fn text_or_missing(value: Option<&str>) -> String {
    value
        .map(strip_html)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Remove markup, decode common entities and collapse whitespace.
pub fn strip_html(input: &str) -> String {
    let without_tags = TAG_RE.replace_all(input, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&");
    SPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Cut `input` to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &input[..byte_idx]),
        None => input.to_string(),
    }
}
