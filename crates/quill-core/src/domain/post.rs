use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length, in characters, of a title in either language.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum length, in characters, of an excerpt in either language.
pub const EXCERPT_MAX_CHARS: usize = 500;

/// Image reference stored when a post is created without one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// A pair of Spanish and English values for the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub es: String,
    pub en: String,
}

impl Localized {
    pub fn new(es: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            es: es.into(),
            en: en.into(),
        }
    }
}

/// Post byline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub role: Localized,
}

/// Post entity - a bilingual blog article addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub title: Localized,
    pub excerpt: Localized,
    pub content: Localized,
    pub image: String,
    pub date: String,
    pub author: Author,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-language optional values.
///
/// Used both for create payloads (where a missing language is reported as a
/// validation failure) and for updates (where a missing language keeps the
/// stored value).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedPatch {
    pub es: Option<String>,
    pub en: Option<String>,
}

impl LocalizedPatch {
    pub fn both(es: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            es: Some(es.into()),
            en: Some(en.into()),
        }
    }

    fn merge_into(self, target: &mut Localized) {
        if let Some(es) = self.es {
            target.es = es.trim().to_string();
        }
        if let Some(en) = self.en {
            target.en = en.trim().to_string();
        }
    }
}

/// Optional byline fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub role: Option<LocalizedPatch>,
}

impl AuthorPatch {
    fn merge_into(self, target: &mut Author) {
        if let Some(name) = self.name {
            target.name = name.trim().to_string();
        }
        if let Some(role) = self.role {
            role.merge_into(&mut target.role);
        }
    }
}

/// Payload for creating a post.
///
/// Every field is optional at the type level so that validation can report
/// all missing fields at once instead of failing on the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPost {
    pub slug: Option<String>,
    pub title: Option<LocalizedPatch>,
    pub excerpt: Option<LocalizedPatch>,
    pub content: Option<LocalizedPatch>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub author: Option<AuthorPatch>,
    pub published: Option<bool>,
}

/// Partial update of a post. `None` leaves the stored value untouched.
///
/// Nested bilingual fields merge per language: sending only `title.en`
/// replaces the English title and keeps the Spanish one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostUpdate {
    pub slug: Option<String>,
    pub title: Option<LocalizedPatch>,
    pub excerpt: Option<LocalizedPatch>,
    pub content: Option<LocalizedPatch>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub author: Option<AuthorPatch>,
    pub published: Option<bool>,
}

/// Trim and lower-case a slug, then check it is URL-safe.
pub fn normalize_slug(raw: &str) -> Result<String, String> {
    let slug = raw.trim().to_lowercase();
    if slug.is_empty() {
        return Err("slug is required".to_string());
    }
    let url_safe = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !url_safe {
        return Err("slug may only contain a-z, 0-9, '-' and '_'".to_string());
    }
    Ok(slug)
}

fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_lengths(post: &Post, errors: &mut Vec<String>) {
    let limits = [
        ("title.es", &post.title.es, TITLE_MAX_CHARS),
        ("title.en", &post.title.en, TITLE_MAX_CHARS),
        ("excerpt.es", &post.excerpt.es, EXCERPT_MAX_CHARS),
        ("excerpt.en", &post.excerpt.en, EXCERPT_MAX_CHARS),
    ];
    for (field, value, max) in limits {
        if value.chars().count() > max {
            errors.push(format!("{field} must be at most {max} characters"));
        }
    }
}

impl NewPost {
    /// Validate the payload and build a post with fresh id and timestamps.
    ///
    /// Returns one message per failed rule; missing fields are named by
    /// their dotted path (`title.es`, `content.en`, ...).
    pub fn into_post(self) -> Result<Post, Vec<String>> {
        let mut errors = Vec::new();

        let slug = match self.slug.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("slug".to_string());
                None
            }
            Some(raw) => match normalize_slug(raw) {
                Ok(slug) => Some(slug),
                Err(msg) => {
                    errors.push(msg);
                    None
                }
            },
        };

        let mut required = |group: &Option<LocalizedPatch>, name: &str| -> Localized {
            let es = present(group.as_ref().and_then(|g| g.es.as_ref()));
            let en = present(group.as_ref().and_then(|g| g.en.as_ref()));
            if es.is_none() {
                errors.push(format!("{name}.es"));
            }
            if en.is_none() {
                errors.push(format!("{name}.en"));
            }
            Localized {
                es: es.unwrap_or_default(),
                en: en.unwrap_or_default(),
            }
        };
        let title = required(&self.title, "title");
        let excerpt = required(&self.excerpt, "excerpt");
        let content = required(&self.content, "content");

        let mut author = Author::default();
        if let Some(patch) = self.author {
            patch.merge_into(&mut author);
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            slug: slug.unwrap_or_default(),
            title,
            excerpt,
            content,
            image: present(self.image.as_ref()).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            date: present(self.date.as_ref()).unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
            author,
            published: self.published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        check_lengths(&post, &mut errors);

        if errors.is_empty() {
            Ok(post)
        } else {
            Err(errors)
        }
    }
}

impl PostUpdate {
    /// The normalised new slug, if the update carries one.
    pub fn normalized_slug(&self) -> Option<Result<String, String>> {
        self.slug.as_deref().map(normalize_slug)
    }
}

impl Post {
    /// Apply a partial update in place and refresh `updated_at`.
    ///
    /// Required bilingual fields cannot be blanked, and the length limits
    /// are re-checked against the merged result. On error `self` is left
    /// unchanged.
    pub fn apply(&mut self, update: PostUpdate) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let mut next = self.clone();

        if let Some(result) = update.normalized_slug() {
            match result {
                Ok(slug) => next.slug = slug,
                Err(msg) => errors.push(msg),
            }
        }
        if let Some(title) = update.title {
            title.merge_into(&mut next.title);
        }
        if let Some(excerpt) = update.excerpt {
            excerpt.merge_into(&mut next.excerpt);
        }
        if let Some(content) = update.content {
            content.merge_into(&mut next.content);
        }
        if let Some(image) = update.image {
            let image = image.trim();
            next.image = if image.is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                image.to_string()
            };
        }
        if let Some(date) = update.date {
            next.date = date.trim().to_string();
        }
        if let Some(author) = update.author {
            author.merge_into(&mut next.author);
        }
        if let Some(published) = update.published {
            next.published = published;
        }

        let required = [
            ("title.es", &next.title.es),
            ("title.en", &next.title.en),
            ("excerpt.es", &next.excerpt.es),
            ("excerpt.en", &next.excerpt.en),
            ("content.es", &next.content.es),
            ("content.en", &next.content.en),
        ];
        for (field, value) in required {
            if value.is_empty() {
                errors.push(format!("{field} cannot be empty"));
            }
        }
        check_lengths(&next, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}
