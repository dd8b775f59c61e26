use crate::e2e::helpers;

use chrono::{Duration, Utc};
use helpers::{generate_test_jwt, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

const OWNER: &str = "auth0|owner";
const STRANGER: &str = "auth0|stranger";

fn favorite_path(id: impl std::fmt::Display) -> String {
    format!("/api/podcasts/{}/favorite", id)
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_no_podcasts_for_a_new_user(ctx: &TestContext) {
    let token = generate_test_jwt(OWNER);

    let response = ctx.client.get_with_auth("/api/podcasts", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.unwrap(), json!({ "podcasts": [] }));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_only_the_callers_podcasts_newest_first(ctx: &TestContext) {
    let now = Utc::now();
    let oldest = ctx.podcasts.seed(OWNER, "oldest", now - Duration::hours(2));
    let newest = ctx.podcasts.seed(OWNER, "newest", now);
    let middle = ctx.podcasts.seed(OWNER, "middle", now - Duration::hours(1));
    ctx.podcasts.seed(STRANGER, "not-mine", now);

    let response = ctx
        .client
        .get_with_auth("/api/podcasts", &generate_test_jwt(OWNER))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let podcasts = response.body.as_ref().unwrap()["podcasts"]
        .as_array()
        .unwrap()
        .clone();
    let ids: Vec<String> = podcasts
        .iter()
        .map(|p| p["podcast_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        vec![
            newest.id.to_string(),
            middle.id.to_string(),
            oldest.id.to_string()
        ]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_expose_podcast_fields(ctx: &TestContext) {
    let token = generate_test_jwt(OWNER);
    ctx.client
        .post_with_auth(
            "/api/generate-from-text",
            &json!({ "text": "A short note to self." }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.get_with_auth("/api/podcasts", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let podcast = &response.body.as_ref().unwrap()["podcasts"][0];
    let stored = &ctx.podcasts.all()[0];
    assert_eq!(podcast["podcast_id"], json!(stored.id.to_string()));
    assert_eq!(podcast["title"], json!(stored.title));
    assert_eq!(podcast["source"], json!("text"));
    assert_eq!(podcast["audio_url"], json!(stored.audio_url));
    assert_eq!(podcast["is_favorite"], json!(false));
    assert!(podcast.get("created_at").is_some());
    assert!(podcast.get("source_url").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_toggle_favorite_back_and_forth(ctx: &TestContext) {
    let podcast = ctx.podcasts.seed(OWNER, "episode", Utc::now());
    let token = generate_test_jwt(OWNER);

    let response = ctx
        .client
        .post_with_auth(&favorite_path(podcast.id), &json!({}), &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.unwrap(),
        json!({ "message": "Favorite updated", "is_favorite": true })
    );
    assert!(ctx.podcasts.get(podcast.id).unwrap().is_favorite);

    let response = ctx
        .client
        .post_with_auth(&favorite_path(podcast.id), &json!({}), &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.unwrap()["is_favorite"], json!(false));
    assert!(!ctx.podcasts.get(podcast.id).unwrap().is_favorite);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forbid_toggling_another_users_podcast(ctx: &TestContext) {
    let podcast = ctx.podcasts.seed(OWNER, "episode", Utc::now());

    let response = ctx
        .client
        .post_with_auth(
            &favorite_path(podcast.id),
            &json!({}),
            &generate_test_jwt(STRANGER),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_error_message("Not authorized to modify this podcast");
    assert!(!ctx.podcasts.get(podcast.id).unwrap().is_favorite);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_podcasts(ctx: &TestContext) {
    let token = generate_test_jwt(OWNER);

    for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = ctx
            .client
            .post_with_auth(&favorite_path(&id), &json!({}), &token)
            .await
            .unwrap();

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_error_message("Podcast not found");
    }
}
