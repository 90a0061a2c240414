//! Create `note_tag` junction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NoteTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteTag::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NoteTag::NoteId).string_len(32).not_null())
                    .col(ColumnDef::new(NoteTag::TagId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(NoteTag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_tag_note")
                            .from(NoteTag::Table, NoteTag::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_tag_tag")
                            .from(NoteTag::Table, NoteTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (note_id, tag_id) - a tag is applied to a note at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_note_tag_note_id_tag_id")
                    .table(NoteTag::Table)
                    .col(NoteTag::NoteId)
                    .col(NoteTag::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: tag_id (for tag-filtered note listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_note_tag_tag_id")
                    .table(NoteTag::Table)
                    .col(NoteTag::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NoteTag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NoteTag {
    Table,
    Id,
    NoteId,
    TagId,
    CreatedAt,
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
}
