//! 业务操作
//!
//! 路由层只负责提取会话与请求体，鉴权、所有权检查和错误分类都在这里完成。

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::database::dto::{NewReview, ReviewPage, ReviewPatch, ReviewQuery, ReviewView};
use crate::database::repository::{
    reviews_repository::ReviewsRepository, users_repository::UsersRepository,
};
use crate::entity::{reviews, users};
use crate::error::AppError;
use crate::utils::password::verify_password;

pub const INVALID_CREDENTIALS: &str = "Invalid name or password";
pub const NOT_LOGGED_IN: &str = "Not logged in";
pub const LOGIN_REQUIRED: &str = "Login required";

// ==================== 会话相关 ====================

/// 校验用户名与密码
///
/// 用户不存在与密码错误返回同一个错误，避免枚举用户名
pub async fn login(
    db: &DatabaseConnection,
    name: &str,
    password: &str,
) -> Result<users::Model, AppError> {
    let Some(user) = UsersRepository::find_by_name(db, name).await? else {
        log::debug!("登录失败，用户不存在: {}", name);
        return Err(AppError::Authentication(INVALID_CREDENTIALS));
    };

    if verify_password(password, &user.password_hash).await? {
        log::info!("用户登录: {} (id={})", user.name, user.id);
        Ok(user)
    } else {
        log::debug!("登录失败，密码错误: {}", name);
        Err(AppError::Authentication(INVALID_CREDENTIALS))
    }
}

/// 解析会话中的用户
pub async fn current_user(
    db: &DatabaseConnection,
    session_user: Option<i32>,
) -> Result<users::Model, AppError> {
    let Some(user_id) = session_user else {
        return Err(AppError::Authentication(NOT_LOGGED_IN));
    };

    UsersRepository::find_by_id(db, user_id)
        .await?
        .ok_or(AppError::Authentication(NOT_LOGGED_IN))
}

// ==================== 评论相关 ====================

/// 筛选、排序、分页后的评论列表
pub async fn list_reviews(
    db: &DatabaseConnection,
    query: &ReviewQuery,
) -> Result<ReviewPage, AppError> {
    let (items, total_pages) = ReviewsRepository::find_page(db, query).await?;
    let reviews = ReviewsRepository::load_views(db, items).await?;

    Ok(ReviewPage {
        reviews,
        total_pages,
    })
}

/// 要求存在会话，返回会话中的用户 ID
pub fn require_session(session_user: Option<i32>) -> Result<i32, AppError> {
    session_user.ok_or(AppError::Authentication(LOGIN_REQUIRED))
}

/// 创建评论
///
/// 校验失败或违反唯一约束时事务被丢弃（回滚）
pub async fn create_review(
    db: &DatabaseConnection,
    user_id: i32,
    review: NewReview,
) -> Result<ReviewView, AppError> {
    let txn = db.begin().await?;
    let created = ReviewsRepository::insert(&txn, user_id, review).await?;
    let view = ReviewsRepository::load_view(&txn, created).await?;
    txn.commit().await?;

    log::info!(
        "用户 {} 为游戏 {} 创建评论 {}",
        view.user_id,
        view.game_id,
        view.id
    );
    Ok(view)
}

/// 查找评论并检查所有权
///
/// 先判断存在（404），再判断所有者（403），此时还未读取请求体
pub async fn owned_review(
    db: &DatabaseConnection,
    review_id: i32,
    session_user: Option<i32>,
) -> Result<reviews::Model, AppError> {
    let review = ReviewsRepository::find_by_id(db, review_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if session_user != Some(review.user_id) {
        log::debug!(
            "拒绝修改评论 {}：会话用户 {:?} 不是所有者 {}",
            review.id,
            session_user,
            review.user_id
        );
        return Err(AppError::Authorization);
    }

    Ok(review)
}

/// 按白名单字段更新评论
pub async fn update_review(
    db: &DatabaseConnection,
    review: reviews::Model,
    patch: ReviewPatch,
) -> Result<ReviewView, AppError> {
    let txn = db.begin().await?;
    let updated = ReviewsRepository::update(&txn, review, patch).await?;
    let view = ReviewsRepository::load_view(&txn, updated).await?;
    txn.commit().await?;

    log::info!("评论 {} 已更新", view.id);
    Ok(view)
}

/// 删除评论
pub async fn delete_review(
    db: &DatabaseConnection,
    review: reviews::Model,
) -> Result<(), AppError> {
    ReviewsRepository::delete(db, review.id).await?;
    log::info!("评论 {} 已删除", review.id);
    Ok(())
}
