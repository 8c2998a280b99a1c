mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use review_hub_lib::database::repository::reviews_repository::{PAGE_SIZE, ReviewsRepository};
use serde_json::{Value, json};

use common::{Fixture, ids, review};

// ==================== 列表 ====================

#[tokio::test]
async fn test_list_is_public_and_embeds_user_and_game() {
    let fixture = Fixture::new().await;
    review(fixture.db(), &fixture.alice, &fixture.elden, 9, "Great bosses").await;
    let server = fixture.server();

    let response = server.get("/reviews").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_pages"], 1);
    let first = &body["reviews"][0];
    assert_eq!(first["score"], 9);
    assert_eq!(first["user"], json!({ "id": fixture.alice.id, "name": "alice" }));
    assert_eq!(first["game"]["title"], "Elden Ring");
    assert_eq!(first["game"]["price"], 40);
    assert!(first["user"].get("password_hash").is_none());
    assert!(first["game"].get("reviews").is_none());
}

#[tokio::test]
async fn test_list_empty_has_zero_pages() {
    let fixture = Fixture::new().await;
    let server = fixture.server();

    let response = server.get("/reviews").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "reviews": [], "total_pages": 0 }));
}

#[tokio::test]
async fn test_list_filters_by_game_and_search() {
    let fixture = Fixture::new().await;
    review(fixture.db(), &fixture.alice, &fixture.elden, 9, "Great BOSSES").await;
    review(fixture.db(), &fixture.bob, &fixture.elden, 4, "Too hard").await;
    review(fixture.db(), &fixture.alice, &fixture.hades, 8, "boss rush heaven").await;
    let server = fixture.server();

    let by_game: Value = server
        .get("/reviews")
        .add_query_param("game_id", fixture.hades.id)
        .await
        .json();
    assert_eq!(by_game["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(by_game["reviews"][0]["game_id"], fixture.hades.id);

    let by_search: Value = server
        .get("/reviews")
        .add_query_param("search", "boss")
        .await
        .json();
    assert_eq!(by_search["reviews"].as_array().unwrap().len(), 2);

    let combined: Value = server
        .get("/reviews")
        .add_query_param("game_id", fixture.elden.id)
        .add_query_param("search", "Boss")
        .await
        .json();
    assert_eq!(combined["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(combined["reviews"][0]["comment"], "Great BOSSES");
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let fixture = Fixture::new().await;
    review(fixture.db(), &fixture.alice, &fixture.elden, 10, "100% worth it").await;
    review(fixture.db(), &fixture.bob, &fixture.elden, 5, "100 hours").await;
    let server = fixture.server();

    let body: Value = server
        .get("/reviews")
        .add_query_param("search", "100%")
        .await
        .json();

    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["reviews"][0]["comment"], "100% worth it");
}

#[tokio::test]
async fn test_list_sorts_by_score_desc() {
    let fixture = Fixture::new().await;
    review(fixture.db(), &fixture.alice, &fixture.elden, 3, "meh").await;
    review(fixture.db(), &fixture.bob, &fixture.elden, 9, "great").await;
    review(fixture.db(), &fixture.alice, &fixture.hades, 6, "fine").await;
    let server = fixture.server();

    let body: Value = server
        .get("/reviews")
        .add_query_param("sort", "score")
        .add_query_param("order", "desc")
        .await
        .json();

    let scores: Vec<i64> = body["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|review| review["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![9, 6, 3]);
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_and_order() {
    let fixture = Fixture::new().await;
    let server = fixture.server();

    let response = server
        .get("/reviews")
        .add_query_param("sort", "password_hash")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["errors"].is_array());

    server
        .get("/reviews")
        .add_query_param("order", "sideways")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pages_partition_the_result_set() {
    let fixture = Fixture::new().await;
    let mut games = Vec::new();
    for i in 0..23 {
        games.push(common::game(fixture.db(), &format!("Game {i}")).await);
    }
    for (i, game) in games.iter().enumerate() {
        let score = (i % 11) as i32;
        review(fixture.db(), &fixture.alice, game, score, "filler").await;
    }
    let server = fixture.server();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let body: Value = server
            .get("/reviews")
            .add_query_param("sort", "score")
            .add_query_param("page", page)
            .await
            .json();
        assert_eq!(body["total_pages"], 3);
        let page_ids = ids(&body);
        assert!(page_ids.len() as u64 <= PAGE_SIZE);
        seen.extend(page_ids);
    }

    let unique: HashSet<i64> = seen.iter().copied().collect();
    assert_eq!(seen.len(), 23);
    assert_eq!(unique.len(), 23);

    // 超出范围的页返回空列表
    let beyond: Value = server
        .get("/reviews")
        .add_query_param("page", 4)
        .await
        .json();
    assert!(ids(&beyond).is_empty());

    // 第 0 页按第 1 页处理
    let zero: Value = server.get("/reviews").add_query_param("page", 0).await.json();
    let first: Value = server.get("/reviews").await.json();
    assert_eq!(ids(&zero), ids(&first));
}

#[tokio::test]
async fn test_huge_page_is_empty_not_an_error() {
    let fixture = Fixture::new().await;
    review(fixture.db(), &fixture.alice, &fixture.elden, 7, "fine").await;
    let server = fixture.server();

    let response = server
        .get("/reviews")
        .add_query_param("page", "1000000000000000000")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(ids(&body).is_empty());
    assert_eq!(body["total_pages"], 1);

    let max: Value = server
        .get("/reviews")
        .add_query_param("page", u64::MAX)
        .await
        .json();
    assert!(ids(&max).is_empty());
}

#[tokio::test]
async fn test_search_matches_non_ascii_text() {
    let fixture = Fixture::new().await;
    review(fixture.db(), &fixture.alice, &fixture.elden, 8, "Élan vital").await;
    review(fixture.db(), &fixture.bob, &fixture.elden, 6, "Plain text").await;
    let server = fixture.server();

    let body: Value = server
        .get("/reviews")
        .add_query_param("search", "Élan")
        .await
        .json();
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["reviews"][0]["comment"], "Élan vital");

    let lower_ascii: Value = server
        .get("/reviews")
        .add_query_param("search", "VITAL")
        .await
        .json();
    assert_eq!(lower_ascii["reviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_game_filter_with_score_desc_first_page() {
    let fixture = Fixture::new().await;
    let scores = [5, 9, 5, 2, 9, 7, 5, 10, 0, 7, 5, 3, 9];
    for (i, score) in scores.iter().enumerate() {
        let author = common::user(fixture.db(), &format!("reviewer{i}")).await;
        review(fixture.db(), &author, &fixture.hades, *score, "ranked").await;
    }
    review(fixture.db(), &fixture.alice, &fixture.elden, 10, "other game").await;
    review(fixture.db(), &fixture.bob, &fixture.elden, 10, "other game").await;
    let server = fixture.server();

    let body: Value = server
        .get("/reviews")
        .add_query_param("game_id", fixture.hades.id)
        .add_query_param("sort", "score")
        .add_query_param("order", "desc")
        .add_query_param("page", 1)
        .await
        .json();

    assert_eq!(body["total_pages"], 2);
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len() as u64, PAGE_SIZE);
    assert!(
        reviews
            .iter()
            .all(|review| review["game_id"] == fixture.hades.id)
    );

    let keys: Vec<(i64, i64)> = reviews
        .iter()
        .map(|review| {
            (
                review["score"].as_i64().unwrap(),
                review["id"].as_i64().unwrap(),
            )
        })
        .collect();
    // 分数降序，同分按 id 降序
    for pair in keys.windows(2) {
        assert!(pair[0] > pair[1], "out of order: {:?}", keys);
    }
    assert_eq!(keys[0].0, 10);
}

// ==================== 创建 ====================

#[tokio::test]
async fn test_create_requires_login() {
    let fixture = Fixture::new().await;
    let server = fixture.server();

    let response = server
        .post("/reviews")
        .json(&json!({ "score": 7, "comment": "nice", "game_id": fixture.elden.id }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ReviewsRepository::count(fixture.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_uses_session_user() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;

    let response = server
        .post("/reviews")
        .json(&json!({
            "score": 8,
            "comment": "Solid",
            "game_id": fixture.hades.id,
            "user_id": fixture.bob.id,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user_id"], fixture.alice.id);
    assert_eq!(body["user"]["name"], "alice");
    assert_eq!(body["game"]["title"], "Hades");
    assert!(body["created_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_rejects_out_of_range_score() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;

    let response = server
        .post("/reviews")
        .json(&json!({ "score": 11, "comment": "x", "game_id": fixture.elden.id }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "errors": ["Score must be between 0 and 10."] }));
    assert_eq!(ReviewsRepository::count(fixture.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_accepts_boundary_scores() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;

    for (score, game) in [(0, &fixture.elden), (10, &fixture.hades)] {
        server
            .post("/reviews")
            .json(&json!({ "score": score, "comment": "edge", "game_id": game.id }))
            .await
            .assert_status(StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_second_review_for_same_game_is_rejected() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;
    let payload = json!({ "score": 6, "comment": "first", "game_id": fixture.elden.id });

    server
        .post("/reviews")
        .json(&payload)
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.post("/reviews").json(&payload).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["errors"].is_array());
    assert_eq!(ReviewsRepository::count(fixture.db()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_for_missing_game_is_rejected() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;

    server
        .post("/reviews")
        .json(&json!({ "score": 6, "comment": "ghost", "game_id": 9999 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_missing_fields_is_bad_request() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;

    let response = server.post("/reviews").json(&json!({ "score": 6 })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["errors"].is_array());
}

// ==================== 更新 ====================

#[tokio::test]
async fn test_owner_can_patch_score_and_comment() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "ok").await;
    let server = fixture.server_as(&fixture.alice).await;

    let response = server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "score": 9, "comment": "grew on me" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], existing.id);
    assert_eq!(body["score"], 9);
    assert_eq!(body["comment"], "grew on me");
    assert_eq!(body["created_at"], existing.created_at);
}

#[tokio::test]
async fn test_partial_patch_keeps_other_fields() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "keep me").await;
    let server = fixture.server_as(&fixture.alice).await;

    let body: Value = server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "score": 6 }))
        .await
        .json();

    assert_eq!(body["score"], 6);
    assert_eq!(body["comment"], "keep me");
}

#[tokio::test]
async fn test_patch_rejects_ownership_fields() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "mine").await;
    let server = fixture.server_as(&fixture.alice).await;

    let response = server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "user_id": fixture.bob.id }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let stored = ReviewsRepository::find_by_id(fixture.db(), existing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_id, fixture.alice.id);
}

#[tokio::test]
async fn test_patch_rejects_out_of_range_score() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "mine").await;
    let server = fixture.server_as(&fixture.alice).await;

    server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "score": -1 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let stored = ReviewsRepository::find_by_id(fixture.db(), existing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.score, 5);
}

#[tokio::test]
async fn test_non_owner_patch_is_forbidden_before_body_checks() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "mine").await;
    let server = fixture.server_as(&fixture.bob).await;

    let valid = server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "score": 1 }))
        .await;
    valid.assert_status(StatusCode::FORBIDDEN);
    valid.assert_json(&json!({ "error": "Unauthorized" }));

    server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "score": 99, "user_id": fixture.bob.id }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patch_without_session_is_forbidden() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "mine").await;
    let server = fixture.server();

    server
        .patch(&format!("/reviews/{}", existing.id))
        .json(&json!({ "score": 1 }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patch_missing_review_is_not_found() {
    let fixture = Fixture::new().await;
    let server = fixture.server_as(&fixture.alice).await;

    let response = server
        .patch("/reviews/4242")
        .json(&json!({ "score": 1 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Not found" }));

    server
        .patch("/reviews/not-a-number")
        .json(&json!({ "score": 1 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ==================== 删除 ====================

#[tokio::test]
async fn test_owner_can_delete() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "bye").await;
    let server = fixture.server_as(&fixture.alice).await;

    server
        .delete(&format!("/reviews/{}", existing.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(
        ReviewsRepository::find_by_id(fixture.db(), existing.id)
            .await
            .unwrap()
            .is_none()
    );
    server
        .delete(&format!("/reviews/{}", existing.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_owner_cannot_delete() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "stay").await;
    let server = fixture.server_as(&fixture.bob).await;

    server
        .delete(&format!("/reviews/{}", existing.id))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert_eq!(ReviewsRepository::count(fixture.db()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleted_review_frees_the_pair() {
    let fixture = Fixture::new().await;
    let existing = review(fixture.db(), &fixture.alice, &fixture.elden, 5, "first").await;
    let server = fixture.server_as(&fixture.alice).await;

    server
        .delete(&format!("/reviews/{}", existing.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post("/reviews")
        .json(&json!({ "score": 7, "comment": "again", "game_id": fixture.elden.id }))
        .await
        .assert_status(StatusCode::CREATED);
}
