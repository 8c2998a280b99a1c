//! 用户数据仓库

use crate::entity::prelude::*;
use crate::entity::users;
use sea_orm::*;

/// 用户数据仓库
pub struct UsersRepository;

impl UsersRepository {
    /// 插入用户（调用方负责提供 bcrypt 哈希）
    pub async fn insert<C>(db: &C, name: &str, password_hash: String) -> Result<users::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        users::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            password_hash: Set(password_hash),
        }
        .insert(db)
        .await
    }

    /// 根据 ID 查询用户
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<users::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Users::find_by_id(id).one(db).await
    }

    /// 根据唯一用户名查询
    pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<users::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Users::find()
            .filter(users::Column::Name.eq(name))
            .one(db)
            .await
    }

    /// 获取用户总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Users::find().count(db).await
    }

    /// 清空用户表
    pub async fn delete_all<C>(db: &C) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        Users::delete_many().exec(db).await
    }
}
