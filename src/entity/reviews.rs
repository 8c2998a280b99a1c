//! 评论实体
//!
//! 写入前在 `before_save` 中校验分数范围并维护时间戳，
//! 因此经由 ActiveModel 的插入与更新都会经过同一套规则。

use std::ops::RangeInclusive;

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{self, Set};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// 合法分数区间
pub const SCORE_RANGE: RangeInclusive<i32> = 0..=10;
pub const SCORE_RANGE_MESSAGE: &str = "Score must be between 0 and 10.";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub score: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub game_id: i32,
    pub user_id: i32,

    // === 时间戳（unix 秒）===
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Games,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Games.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

/// 校验分数，越界时返回 `DbErr::Custom`
pub fn validate_score(score: i32) -> Result<i32, DbErr> {
    if SCORE_RANGE.contains(&score) {
        Ok(score)
    } else {
        Err(DbErr::Custom(SCORE_RANGE_MESSAGE.to_string()))
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // 只校验本次写入的字段
        if let ActiveValue::Set(score) = &self.score {
            validate_score(*score)?;
        }

        let now = chrono::Utc::now().timestamp();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);

        Ok(self)
    }
}
