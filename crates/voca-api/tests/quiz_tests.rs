use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    self, TestStateBuilder, TestUser, db,
    fake_ai::{BrokenModel, FakeModel},
};

#[tokio::test]
async fn test_quiz_words_are_drawn_from_the_group() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();
    db::create_words(
        &state.pool,
        group_id,
        &[("apple", "사과"), ("run", "달리다"), ("book", "책")],
    )
    .await
    .unwrap();

    let two: serde_json::Value = client
        .get_with_auth(&format!("/api/tests/words/{group_id}/2"), &user.token)
        .await
        .json();
    assert_eq!(two["total_words"], 2);
    assert_eq!(two["words"].as_array().unwrap().len(), 2);

    // Asking for more than the group holds returns everything
    let all: serde_json::Value = client
        .get_with_auth(&format!("/api/tests/words/{group_id}/50"), &user.token)
        .await
        .json();
    assert_eq!(all["total_words"], 3);

    for count in [0, 501] {
        client
            .get_with_auth(&format!("/api/tests/words/{group_id}/{count}"), &user.token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    user.cleanup(&state).await;
}

#[tokio::test]
async fn test_quiz_on_empty_group_is_not_found() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "empty").await.unwrap();

    client
        .get_with_auth(&format!("/api/tests/words/{group_id}/10"), &user.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    user.cleanup(&state).await;
}

#[tokio::test]
async fn test_check_answer_uses_lenient_matching() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();
    let words = db::create_words(
        &state.pool,
        group_id,
        &[("apple", "사과"), ("glad", "기쁜, 행복하다"), ("study", "공부하다")],
    )
    .await
    .unwrap();

    let cases = [
        (words[0].id, "사과들", true),
        (words[1].id, "기쁜", true),
        (words[1].id, "행복", true),
        (words[2].id, "공부 함", true),
        (words[0].id, "배", false),
        (words[0].id, "", false),
    ];

    for (word_id, answer, expected) in cases {
        let response = client
            .post_json_with_auth(
                "/api/tests/check-answer",
                &json!({ "word_id": word_id, "user_answer": answer }),
                &user.token,
            )
            .await;
        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["is_correct"], expected, "answer {answer:?}");
    }

    let other = TestUser::create(&state).await;
    client
        .post_json_with_auth(
            "/api/tests/check-answer",
            &json!({ "word_id": words[0].id, "user_answer": "사과" }),
            &other.token,
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);

    user.cleanup(&state).await;
    other.cleanup(&state).await;
}

#[tokio::test]
async fn test_self_evaluation_stores_result() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();
    let words = db::create_words(
        &state.pool,
        group_id,
        &[("apple", "사과"), ("run", "달리다"), ("book", "책")],
    )
    .await
    .unwrap();

    let response = client
        .post_json_with_auth(
            "/api/tests/self-evaluation",
            &json!({
                "group_id": group_id,
                "answers": [
                    { "word_id": words[0].id, "user_answer": "사과" },
                    { "word_id": words[1].id, "user_answer": "달리다" },
                    { "word_id": words[2].id, "user_answer": "연필" }
                ]
            }),
            &user.token,
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_questions"], 3);
    assert_eq!(body["correct_answers"], 2);
    assert_eq!(body["score"], "2/3");
    assert_eq!(body["percentage"], 67);
    assert_eq!(body["grading_mode"], "self");
    assert_eq!(body["results"][2]["correct_answer"], "책");
    assert_eq!(body["results"][2]["is_correct"], false);

    let history: Vec<serde_json::Value> = client
        .get_with_auth("/api/tests/history", &user.token)
        .await
        .json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["group_name"], "day 1");
    assert_eq!(history[0]["grading_mode"], "self");

    user.cleanup(&state).await;
}

#[tokio::test]
async fn test_self_evaluation_rejects_words_from_other_groups() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();
    let other_group = db::create_group(&state.pool, user.id, "day 2").await.unwrap();
    let outsider = db::create_words(&state.pool, other_group, &[("tree", "나무")])
        .await
        .unwrap();

    client
        .post_json_with_auth(
            "/api/tests/self-evaluation",
            &json!({
                "group_id": group_id,
                "answers": [{ "word_id": outsider[0].id, "user_answer": "나무" }]
            }),
            &user.token,
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);

    client
        .post_json_with_auth(
            "/api/tests/self-evaluation",
            &json!({ "group_id": group_id, "answers": [] }),
            &user.token,
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    user.cleanup(&state).await;
}

#[tokio::test]
async fn test_save_result_validates_tally() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();

    let saved = client
        .post_json_with_auth(
            "/api/tests/results",
            &json!({ "group_id": group_id, "total_questions": 10, "correct_answers": 7 }),
            &user.token,
        )
        .await;
    saved.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = saved.json();
    assert_eq!(body["score"], "7/10");
    assert_eq!(body["percentage"], 70);
    assert_eq!(body["grading_mode"], "manual");

    for (total, correct) in [(0, 0), (5, 6), (5, -1)] {
        client
            .post_json_with_auth(
                "/api/tests/results",
                &json!({ "group_id": group_id, "total_questions": total, "correct_answers": correct }),
                &user.token,
            )
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let group_history: Vec<serde_json::Value> = client
        .get_with_auth(&format!("/api/tests/history/{group_id}"), &user.token)
        .await
        .json();
    assert_eq!(group_history.len(), 1);

    let other = TestUser::create(&state).await;
    client
        .get_with_auth(&format!("/api/tests/history/{group_id}"), &other.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    client
        .post_json_with_auth(
            "/api/tests/results",
            &json!({ "group_id": group_id, "total_questions": 1, "correct_answers": 1 }),
            &other.token,
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);

    user.cleanup(&state).await;
    other.cleanup(&state).await;
}

#[tokio::test]
async fn test_ai_evaluation() {
    let state = TestStateBuilder::new()
        .with_model(FakeModel)
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();
    let words = db::create_words(&state.pool, group_id, &[("apple", "사과"), ("run", "달리다")])
        .await
        .unwrap();

    let response = client
        .post_json_with_auth(
            "/api/tests/ai-evaluation",
            &json!({
                "group_id": group_id,
                "answers": [
                    { "word_id": words[0].id, "english": "apple", "expected": "사과", "user_answer": "사과" },
                    { "word_id": words[1].id, "english": "run", "expected": "달리다", "user_answer": "걷다" }
                ]
            }),
            &user.token,
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["grading_mode"], "ai");
    assert_eq!(body["correct_answers"], 1);
    assert_eq!(body["percentage"], 50);
    assert_eq!(body["evaluations"][0]["is_correct"], true);
    assert_eq!(body["evaluations"][1]["is_correct"], false);
    assert_eq!(body["evaluations"][1]["example_translation"], "이것은 예문입니다.");

    user.cleanup(&state).await;
}

#[tokio::test]
async fn test_ai_evaluation_failure_stores_nothing() {
    let state = TestStateBuilder::new()
        .with_model(BrokenModel)
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let group_id = db::create_group(&state.pool, user.id, "day 1").await.unwrap();

    let response = client
        .post_json_with_auth(
            "/api/tests/ai-evaluation",
            &json!({
                "group_id": group_id,
                "answers": [{ "word_id": 1, "english": "apple", "expected": "사과", "user_answer": "사과" }]
            }),
            &user.token,
        )
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);

    let history: Vec<serde_json::Value> = client
        .get_with_auth("/api/tests/history", &user.token)
        .await
        .json();
    assert!(history.is_empty());

    user.cleanup(&state).await;
}

#[tokio::test]
async fn test_ai_evaluation_without_ai_is_unavailable() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = common::app(&state);
    let user = TestUser::create(&state).await;

    let response = client
        .post_json_with_auth(
            "/api/tests/ai-evaluation",
            &json!({ "group_id": 1, "answers": [] }),
            &user.token,
        )
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    user.cleanup(&state).await;
}
