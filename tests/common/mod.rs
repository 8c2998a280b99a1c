#![allow(dead_code)]

use std::collections::HashMap;

use axum_test::TestServer;
use review_hub_lib::config::Config;
use review_hub_lib::connect_and_migrate;
use review_hub_lib::create_app;
use review_hub_lib::database::dto::{InsertGameData, NewReview};
use review_hub_lib::database::repository::{
    games_repository::GamesRepository, reviews_repository::ReviewsRepository,
    users_repository::UsersRepository,
};
use review_hub_lib::entity::{games, reviews, users};
use review_hub_lib::state::AppState;
use review_hub_lib::utils::password::{MIN_COST, hash_password};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

pub const PASSWORD: &str = "password123";
pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn test_config() -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "sqlite::memory:".to_string()),
        ("SESSION_SECRET", SECRET.to_string()),
        ("BCRYPT_COST", MIN_COST.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// 全新的内存数据库，已执行迁移
pub async fn memory_db() -> DatabaseConnection {
    connect_and_migrate(&test_config()).await.unwrap()
}

pub async fn user(db: &DatabaseConnection, name: &str) -> users::Model {
    let hash = hash_password(PASSWORD, MIN_COST).await.unwrap();
    UsersRepository::insert(db, name, hash).await.unwrap()
}

pub async fn game(db: &DatabaseConnection, title: &str) -> games::Model {
    GamesRepository::insert(
        db,
        InsertGameData {
            title: title.to_string(),
            genre: "RPG".to_string(),
            platform: "PC".to_string(),
            price: 40,
        },
    )
    .await
    .unwrap()
}

pub async fn review(
    db: &DatabaseConnection,
    user: &users::Model,
    game: &games::Model,
    score: i32,
    comment: &str,
) -> reviews::Model {
    ReviewsRepository::insert(
        db,
        user.id,
        NewReview {
            score,
            comment: comment.to_string(),
            game_id: game.id,
        },
    )
    .await
    .unwrap()
}

/// 两个用户、两个游戏的基础数据
pub struct Fixture {
    pub state: AppState,
    pub alice: users::Model,
    pub bob: users::Model,
    pub elden: games::Model,
    pub hades: games::Model,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = memory_db().await;
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let elden = game(&db, "Elden Ring").await;
        let hades = game(&db, "Hades").await;

        Self {
            state: AppState::new(db, test_config()),
            alice,
            bob,
            elden,
            hades,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// 保存 Cookie 的测试客户端，未登录
    pub fn server(&self) -> TestServer {
        TestServer::builder()
            .save_cookies()
            .build(create_app(self.state.clone()))
            .unwrap()
    }

    /// 以指定用户登录后的测试客户端
    pub async fn server_as(&self, user: &users::Model) -> TestServer {
        let server = self.server();
        server
            .post("/login")
            .json(&json!({ "name": user.name, "password": PASSWORD }))
            .await
            .assert_status_ok();
        server
    }
}

pub fn ids(page: &Value) -> Vec<i64> {
    page["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|review| review["id"].as_i64().unwrap())
        .collect()
}
