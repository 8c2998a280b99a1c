//! 评论数据仓库
//!
//! 列表查询统一走 `build_base_query` 做筛选，再叠加排序与分页。

use crate::database::dto::{NewReview, ReviewPatch, ReviewQuery, ReviewView, SortField, SortOrder};
use crate::entity::prelude::*;
use crate::entity::reviews;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::*;

/// 固定分页大小
pub const PAGE_SIZE: u64 = 10;

/// 评论数据仓库
pub struct ReviewsRepository;

impl ReviewsRepository {
    // ==================== 评论 CRUD 操作 ====================

    /// 插入评论
    ///
    /// 分数校验与时间戳由实体的 `before_save` 负责
    pub async fn insert<C>(db: &C, user_id: i32, review: NewReview) -> Result<reviews::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        reviews::ActiveModel {
            id: NotSet,
            score: Set(review.score),
            comment: Set(review.comment),
            game_id: Set(review.game_id),
            user_id: Set(user_id),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(db)
        .await
    }

    /// 部分更新评论，未提供的字段保持不变
    pub async fn update<C>(
        db: &C,
        review: reviews::Model,
        patch: ReviewPatch,
    ) -> Result<reviews::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active: reviews::ActiveModel = review.into();

        if let Some(score) = patch.score {
            active.score = Set(score);
        }
        if let Some(comment) = patch.comment {
            active.comment = Set(comment);
        }

        active.update(db).await
    }

    /// 删除评论
    pub async fn delete<C>(db: &C, id: i32) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        Reviews::delete_by_id(id).exec(db).await
    }

    /// 清空评论表
    pub async fn delete_all<C>(db: &C) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        Reviews::delete_many().exec(db).await
    }

    // ==================== 查询操作 ====================

    /// 根据 ID 查询评论
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<reviews::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Reviews::find_by_id(id).one(db).await
    }

    /// 获取评论总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Reviews::find().count(db).await
    }

    /// 按条件筛选、排序并取出一页，同时返回总页数
    pub async fn find_page<C>(
        db: &C,
        query: &ReviewQuery,
    ) -> Result<(Vec<reviews::Model>, u64), DbErr>
    where
        C: ConnectionTrait,
    {
        let order = match query.order.unwrap_or_default() {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let sort = query.sort.unwrap_or_default();

        let mut select = Self::build_base_query(query).order_by(sort.column(), order.clone());
        // 以 id 兜底，保证分页之间没有重叠或遗漏
        if sort != SortField::Id {
            select = select.order_by(reviews::Column::Id, order);
        }

        let paginator = select.paginate(db, PAGE_SIZE);
        let total_pages = paginator.num_pages().await?;

        // 超出末页直接返回空列表，过大的页码换算成 OFFSET 会溢出
        let page = query.page();
        if page > total_pages {
            return Ok((Vec::new(), total_pages));
        }
        let items = paginator.fetch_page(page - 1).await?;

        Ok((items, total_pages))
    }

    /// 为评论批量加载作者与游戏，组装响应结构
    pub async fn load_views<C>(
        db: &C,
        items: Vec<reviews::Model>,
    ) -> Result<Vec<ReviewView>, DbErr>
    where
        C: ConnectionTrait,
    {
        let users = items.load_one(Users, db).await?;
        let games = items.load_one(Games, db).await?;

        Ok(items
            .into_iter()
            .zip(users)
            .zip(games)
            .map(|((review, user), game)| ReviewView::new(review, user, game))
            .collect())
    }

    /// 单条评论的响应结构
    pub async fn load_view<C>(db: &C, review: reviews::Model) -> Result<ReviewView, DbErr>
    where
        C: ConnectionTrait,
    {
        Self::load_views(db, vec![review])
            .await?
            .pop()
            .ok_or_else(|| DbErr::RecordNotFound("Review view not built".to_string()))
    }

    // ==================== 私有方法 ====================

    /// 通用的查询构建器：应用游戏与关键字筛选
    fn build_base_query(query: &ReviewQuery) -> Select<Reviews> {
        let mut select = Reviews::find();

        if let Some(game_id) = query.game_id {
            select = select.filter(reviews::Column::GameId.eq(game_id));
        }

        if let Some(term) = query.search_term() {
            // SQLite 的 LIKE 对 ASCII 不区分大小写，其余字符按原样比较
            let pattern = format!("%{}%", escape_like(term));
            select = select.filter(
                Expr::col(reviews::Column::Comment).like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        select
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
