//! 游戏数据仓库

use crate::database::dto::InsertGameData;
use crate::entity::games;
use crate::entity::prelude::*;
use sea_orm::*;

/// 游戏数据仓库
pub struct GamesRepository;

impl GamesRepository {
    /// 插入游戏数据
    pub async fn insert<C>(db: &C, game: InsertGameData) -> Result<games::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        games::ActiveModel {
            id: NotSet,
            title: Set(game.title),
            genre: Set(game.genre),
            platform: Set(game.platform),
            price: Set(game.price),
        }
        .insert(db)
        .await
    }

    /// 获取游戏总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::find().count(db).await
    }

    /// 清空游戏表
    pub async fn delete_all<C>(db: &C) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::delete_many().exec(db).await
    }
}
