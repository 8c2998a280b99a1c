//! 创建 games / users / reviews 三张表
//!
//! 1. games 表，title 唯一
//! 2. users 表，name 唯一，只保存 bcrypt 哈希
//! 3. reviews 表，外键指向 games 与 users
//! 4. 唯一索引 uq_user_game：每个用户对每个游戏最多一条评论

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::Title).string().not_null().unique_key())
                    .col(ColumnDef::new(Games::Genre).string().not_null())
                    .col(ColumnDef::new(Games::Platform).string().not_null())
                    .col(ColumnDef::new(Games::Price).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::Score).integer().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().not_null())
                    .col(ColumnDef::new(Reviews::GameId).integer().not_null())
                    .col(ColumnDef::new(Reviews::UserId).integer().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_game_id_games")
                            .from(Reviews::Table, Reviews::GameId)
                            .to(Games::Table, Games::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_user_id_users")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_user_game")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .col(Reviews::GameId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按游戏筛选是最常见的列表查询
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_game_id")
                    .table(Reviews::Table)
                    .col(Reviews::GameId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    Title,
    Genre,
    Platform,
    Price,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    Score,
    Comment,
    GameId,
    UserId,
    CreatedAt,
    UpdatedAt,
}
