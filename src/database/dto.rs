//! 数据传输对象 (DTO)
//!
//! 用于 HTTP 请求与响应的数据结构定义。

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::entity::{games, reviews, users};

/// 辅助函数：查询参数中的空字符串按"未提供"处理
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

// ==================== 请求 ====================

/// 登录请求
#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// 创建评论（user_id 取自会话）
#[derive(Clone, Debug, Deserialize)]
pub struct NewReview {
    pub score: i32,
    pub comment: String,
    pub game_id: i32,
}

/// 更新评论
///
/// 只允许修改 score 与 comment，其他字段（包括 id、外键）一律拒绝。
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewPatch {
    pub score: Option<i32>,
    pub comment: Option<String>,
}

/// 评论排序字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Id,
    Score,
    Comment,
    GameId,
    UserId,
}

impl SortField {
    pub const ALLOWED: &'static str = "created_at, id, score, comment, game_id, user_id";

    pub fn column(self) -> reviews::Column {
        match self {
            SortField::CreatedAt => reviews::Column::CreatedAt,
            SortField::Id => reviews::Column::Id,
            SortField::Score => reviews::Column::Score,
            SortField::Comment => reviews::Column::Comment,
            SortField::GameId => reviews::Column::GameId,
            SortField::UserId => reviews::Column::UserId,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "id" => Ok(SortField::Id),
            "score" => Ok(SortField::Score),
            "comment" => Ok(SortField::Comment),
            "game_id" => Ok(SortField::GameId),
            "user_id" => Ok(SortField::UserId),
            other => Err(format!(
                "unsupported sort field `{}`, expected one of: {}",
                other,
                Self::ALLOWED
            )),
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unsupported order `{}`, expected asc or desc", other)),
        }
    }
}

/// 评论列表查询参数
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub game_id: Option<i32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort: Option<SortField>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub order: Option<SortOrder>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u64>,
}

impl ReviewQuery {
    /// 1 起始的页码，0 视为 1
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

// ==================== 响应 ====================

/// 对外公开的用户字段
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i32,
    pub name: String,
}

impl From<users::Model> for UserView {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// 嵌入评论中的游戏摘要（不再反向嵌入评论）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub platform: String,
    pub price: i32,
}

impl From<games::Model> for GameSummary {
    fn from(game: games::Model) -> Self {
        Self {
            id: game.id,
            title: game.title,
            genre: game.genre,
            platform: game.platform,
            price: game.price,
        }
    }
}

/// 评论响应，附带作者与游戏的一层摘要
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: i32,
    pub score: i32,
    pub comment: String,
    pub game_id: i32,
    pub user_id: i32,
    pub created_at: i64,
    pub updated_at: i64,
    pub user: Option<UserView>,
    pub game: Option<GameSummary>,
}

impl ReviewView {
    pub fn new(
        review: reviews::Model,
        user: Option<users::Model>,
        game: Option<games::Model>,
    ) -> Self {
        Self {
            id: review.id,
            score: review.score,
            comment: review.comment,
            game_id: review.game_id,
            user_id: review.user_id,
            created_at: review.created_at,
            updated_at: review.updated_at,
            user: user.map(UserView::from),
            game: game.map(GameSummary::from),
        }
    }
}

/// 分页后的评论列表
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewView>,
    pub total_pages: u64,
}

/// 用于插入游戏的数据结构（种子程序使用）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertGameData {
    pub title: String,
    pub genre: String,
    pub platform: String,
    pub price: i32,
}
