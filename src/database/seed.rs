//! 种子数据
//!
//! 清空三张表后写入随机测试数据，供手动测试使用。
//! 固定包含测试用户 `Raphie` / `password123`。

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::database::dto::{InsertGameData, NewReview};
use crate::database::repository::{
    games_repository::GamesRepository, reviews_repository::ReviewsRepository,
    users_repository::UsersRepository,
};
use crate::entity::{games, users};
use crate::error::AppError;
use crate::utils::password::{DEFAULT_COST, hash_password};

pub const TEST_USER_NAME: &str = "Raphie";
pub const TEST_USER_PASSWORD: &str = "password123";

const GENRES: &[&str] = &["RPG", "Action", "Indie", "Strategy"];
const PLATFORMS: &[&str] = &["PC", "PS5", "Switch"];

const FIRST_NAMES: &[&str] = &[
    "Avery", "Blake", "Casey", "Devon", "Emery", "Finley", "Harper", "Jordan", "Kendall", "Logan",
    "Morgan", "Parker", "Quinn", "Riley", "Rowan", "Sawyer", "Skyler", "Taylor",
];
const LAST_NAMES: &[&str] = &[
    "Alvarez", "Bennett", "Chen", "Dubois", "Eriksen", "Fischer", "Garcia", "Haddad", "Ito",
    "Kowalski", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi", "Silva", "Tanaka", "Weber",
];

const TITLE_ADJECTIVES: &[&str] = &[
    "Crimson", "Silent", "Hollow", "Golden", "Broken", "Distant", "Frozen", "Lost", "Neon",
    "Savage", "Hidden", "Endless", "Iron", "Pale", "Wild",
];
const TITLE_NOUNS: &[&str] = &[
    "Forest", "Empire", "Signal", "Harbor", "Crown", "Engine", "Garden", "Legion", "Orbit",
    "River", "Tower", "Voyage", "Citadel", "Comet", "Desert",
];
const TITLE_SUFFIXES: &[&str] = &[
    "Saga", "Chronicles", "Tactics", "Legends", "Odyssey", "Rising", "Protocol", "Frontier",
    "Requiem", "Online",
];

const COMMENT_WORDS: &[&str] = &[
    "great", "story", "combat", "feels", "slow", "beautiful", "soundtrack", "boss", "fights",
    "are", "too", "easy", "hard", "worth", "the", "price", "controls", "level", "design",
    "really", "shines", "ending", "was", "disappointing", "replay", "value", "multiplayer",
    "broken", "charming", "art", "style", "grind", "fun", "with", "friends",
];

/// 种子选项
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub bcrypt_cost: u32,
    /// 额外生成的随机用户数量（不含测试用户）
    pub extra_users: usize,
    pub games: usize,
    /// 固定随机种子，便于复现
    pub rng_seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
            extra_users: 10,
            games: 20,
            rng_seed: None,
        }
    }
}

/// 种子结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: usize,
    pub games: usize,
    pub reviews: usize,
    /// 因 (user, game) 唯一约束被跳过的评论数
    pub skipped_reviews: usize,
}

/// 清空并重新写入种子数据
pub async fn run(db: &DatabaseConnection, options: &SeedOptions) -> Result<SeedReport, AppError> {
    let mut rng = match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut report = SeedReport::default();

    log::info!("清空数据库...");
    ReviewsRepository::delete_all(db).await?;
    UsersRepository::delete_all(db).await?;
    GamesRepository::delete_all(db).await?;

    log::info!("写入用户...");
    let users = seed_users(db, options, &mut rng).await?;
    report.users = users.len();

    log::info!("写入游戏...");
    let games = seed_games(db, options, &mut rng).await?;
    report.games = games.len();

    log::info!("写入评论...");
    if !games.is_empty() {
        for user in &users {
            for _ in 0..rng.gen_range(1..=3) {
                let game = &games[rng.gen_range(0..games.len())];
                let review = NewReview {
                    score: rng.gen_range(1..=10),
                    comment: random_sentence(&mut rng),
                    game_id: game.id,
                };

                // 随机选择可能撞上唯一约束，跳过即可
                match ReviewsRepository::insert(db, user.id, review).await {
                    Ok(_) => report.reviews += 1,
                    Err(err) => match AppError::from(err) {
                        AppError::Integrity(msg) => {
                            log::debug!("跳过重复评论 ({}, {}): {}", user.id, game.id, msg);
                            report.skipped_reviews += 1;
                        }
                        other => return Err(other),
                    },
                }
            }
        }
    }

    log::info!(
        "种子数据写入完成: {} 个用户, {} 个游戏, {} 条评论",
        report.users,
        report.games,
        report.reviews
    );
    Ok(report)
}

async fn seed_users(
    db: &DatabaseConnection,
    options: &SeedOptions,
    rng: &mut StdRng,
) -> Result<Vec<users::Model>, AppError> {
    let mut names = vec![TEST_USER_NAME.to_string()];
    let mut seen: HashSet<String> = names.iter().cloned().collect();
    let capacity = FIRST_NAMES.len() * LAST_NAMES.len();

    while names.len() < options.extra_users.min(capacity) + 1 {
        let name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    let mut users = Vec::with_capacity(names.len());
    for name in names {
        // 所有用户共用同一个密码，方便测试
        let hash = hash_password(TEST_USER_PASSWORD, options.bcrypt_cost).await?;
        users.push(UsersRepository::insert(db, &name, hash).await?);
    }
    Ok(users)
}

async fn seed_games(
    db: &DatabaseConnection,
    options: &SeedOptions,
    rng: &mut StdRng,
) -> Result<Vec<games::Model>, AppError> {
    let capacity = TITLE_ADJECTIVES.len() * TITLE_NOUNS.len() * TITLE_SUFFIXES.len();
    let target = options.games.min(capacity);
    let mut titles = HashSet::new();
    let mut games = Vec::with_capacity(target);

    while games.len() < target {
        let title = format!(
            "{} {} {}",
            pick(rng, TITLE_ADJECTIVES),
            pick(rng, TITLE_NOUNS),
            pick(rng, TITLE_SUFFIXES)
        );
        if !titles.insert(title.clone()) {
            continue;
        }

        let game = InsertGameData {
            title,
            genre: pick(rng, GENRES).to_string(),
            platform: pick(rng, PLATFORMS).to_string(),
            price: rng.gen_range(10..=60),
        };
        games.push(GamesRepository::insert(db, game).await?);
    }
    Ok(games)
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn random_sentence(rng: &mut StdRng) -> String {
    let len = rng.gen_range(5..=10);
    let words: Vec<&str> = (0..len).map(|_| pick(rng, COMMENT_WORDS)).collect();
    let sentence = words.join(" ");

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
