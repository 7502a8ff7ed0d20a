use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(uuid(Posts::Id).primary_key())
                    // The unique index is the authority on slug uniqueness.
                    .col(string_uniq(Posts::Slug))
                    .col(string_len(Posts::TitleEs, 200))
                    .col(string_len(Posts::TitleEn, 200))
                    .col(string_len(Posts::ExcerptEs, 500))
                    .col(string_len(Posts::ExcerptEn, 500))
                    .col(text(Posts::ContentEs))
                    .col(text(Posts::ContentEn))
                    .col(string(Posts::Image))
                    .col(string(Posts::Date))
                    .col(string(Posts::AuthorName))
                    .col(string(Posts::AuthorRoleEs))
                    .col(string(Posts::AuthorRoleEn))
                    .col(boolean(Posts::Published).default(true))
                    .col(timestamp_with_time_zone(Posts::CreatedAt))
                    .col(timestamp_with_time_zone(Posts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_created_at")
                    .table(Posts::Table)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Slug,
    TitleEs,
    TitleEn,
    ExcerptEs,
    ExcerptEn,
    ContentEs,
    ContentEn,
    Image,
    Date,
    AuthorName,
    AuthorRoleEs,
    AuthorRoleEn,
    Published,
    CreatedAt,
    UpdatedAt,
}
