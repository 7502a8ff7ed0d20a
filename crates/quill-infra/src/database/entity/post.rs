//! Post entity for SeaORM. Bilingual fields are stored as one column per
//! language.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{Author, Localized};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title_es: String,
    pub title_en: String,
    pub excerpt_es: String,
    pub excerpt_en: String,
    #[sea_orm(column_type = "Text")]
    pub content_es: String,
    #[sea_orm(column_type = "Text")]
    pub content_en: String,
    pub image: String,
    pub date: String,
    pub author_name: String,
    pub author_role_es: String,
    pub author_role_en: String,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            title: Localized::new(model.title_es, model.title_en),
            excerpt: Localized::new(model.excerpt_es, model.excerpt_en),
            content: Localized::new(model.content_es, model.content_en),
            image: model.image,
            date: model.date,
            author: Author {
                name: model.author_name,
                role: Localized::new(model.author_role_es, model.author_role_en),
            },
            published: model.published,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<quill_core::domain::Post> for ActiveModel {
    fn from(post: quill_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            slug: Set(post.slug),
            title_es: Set(post.title.es),
            title_en: Set(post.title.en),
            excerpt_es: Set(post.excerpt.es),
            excerpt_en: Set(post.excerpt.en),
            content_es: Set(post.content.es),
            content_en: Set(post.content.en),
            image: Set(post.image),
            date: Set(post.date),
            author_name: Set(post.author.name),
            author_role_es: Set(post.author.role.es),
            author_role_en: Set(post.author.role.en),
            published: Set(post.published),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
