use crate::e2e::helpers;

use helpers::fakes::TEST_BUCKET_URL;
use helpers::{generate_test_jwt, TestContext};
use hyper::{Method, StatusCode};
use podcastify_backend::domain::podcast::{GenerateResponse, SourceKind};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

const SUBJECT: &str = "auth0|listener";

// Each sentence is longer than half the test chunk limit, so each becomes its own chunk
const S1: &str = "Podcasts turn long reads into listening.";
const S2: &str = "Each chunk is synthesized one at a time.";
const S3: &str = "The clips are merged in their given order.";

fn three_sentences() -> String {
    format!("{} {} {}", S1, S2, S3)
}

fn article_page(title: Option<&str>, paragraphs: &[&str]) -> String {
    let head = title
        .map(|t| format!(r#"<meta property="og:title" content="{}">"#, t))
        .unwrap_or_default();
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    format!(
        "<html><head>{}</head><body><nav>Home</nav><article>{}</article><footer>Footer</footer></body></html>",
        head, body
    )
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_audio_from_text(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    let response = ctx
        .client
        .post_with_auth(
            "/api/generate-from-text",
            &json!({ "text": three_sentences() }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body: GenerateResponse = response.json().unwrap();
    assert!(body.audio_url.starts_with(&format!("{}/text-", TEST_BUCKET_URL)));
    assert!(body.audio_url.ends_with("_full.mp3"));

    // One synthesis call per chunk, in order
    assert_eq!(ctx.tts.calls(), vec![S1, S2, S3]);

    // One merged object holding the clips back to back
    let objects = ctx.artifacts.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(
        String::from_utf8(objects[0].1.clone()).unwrap(),
        format!("<{}><{}><{}>", S1, S2, S3)
    );
    assert_eq!(format!("{}/{}", TEST_BUCKET_URL, objects[0].0), body.audio_url);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_leave_no_scratch_files_after_success(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    ctx.client
        .post_with_auth(
            "/api/generate-from-text",
            &json!({ "text": three_sentences() }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // Only the merged track is on disk while it uploads
    assert_eq!(ctx.artifacts.scratch_files_at_upload(), vec![1]);
    assert_eq!(ctx.scratch_file_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_podcast_and_user_metadata(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    let response = ctx
        .client
        .post_with_auth("/api/generate-from-text", &json!({ "text": S1 }), &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let body: GenerateResponse = response.json().unwrap();

    let podcasts = ctx.podcasts.all();
    assert_eq!(podcasts.len(), 1);
    let podcast = &podcasts[0];
    assert_eq!(podcast.user_id, SUBJECT);
    assert_eq!(podcast.source, SourceKind::Text);
    assert_eq!(podcast.source_url, None);
    assert_eq!(podcast.audio_url, body.audio_url);
    assert!(podcast.title.starts_with("text-"));
    assert!(!podcast.is_favorite);

    let user = ctx.users.get(SUBJECT).expect("user should be recorded");
    assert_eq!(user.email.as_deref(), Some("auth0_listener@example.com"));
    assert_eq!(user.name.as_deref(), Some("Test Listener"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_each_user_only_once(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    for text in [S1, S2] {
        ctx.client
            .post_with_auth("/api/generate-from-text", &json!({ "text": text }), &token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    assert_eq!(ctx.users.insert_count(), 1);
    assert_eq!(ctx.podcasts.all().len(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_text(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    let response = ctx
        .client
        .post_with_auth("/api/generate-from-text", &json!({ "text": "  \n\t " }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Text must not be empty");
    assert!(ctx.tts.calls().is_empty());
    assert!(ctx.podcasts.all().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_body_without_the_required_field(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    let response = ctx
        .client
        .post_with_auth("/api/generate-from-text", &json!({ "url": "https://x.test" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.message().is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let auth = format!("Bearer {}", generate_test_jwt(SUBJECT));

    let response = ctx
        .client
        .send(
            Method::POST,
            "/api/generate",
            &[
                ("Authorization", auth.as_str()),
                ("Content-Type", "application/json"),
            ],
            Some(b"{\"text\": ".to_vec()),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.message().is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_audio_from_an_article_url(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    let url = ctx
        .serve_article("/posts/deep-dive", &article_page(Some("Deep Dive: Rust"), &[S1, S2]))
        .await;

    let response = ctx
        .client
        .post_with_auth("/api/generate-from-url", &json!({ "url": url }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body: GenerateResponse = response.json().unwrap();
    assert!(body
        .audio_url
        .starts_with(&format!("{}/Deep_Dive_Rust_", TEST_BUCKET_URL)));

    assert_eq!(ctx.tts.calls(), vec![S1, S2]);

    let podcasts = ctx.podcasts.all();
    assert_eq!(podcasts.len(), 1);
    assert_eq!(podcasts[0].title, "Deep Dive: Rust");
    assert_eq!(podcasts[0].source, SourceKind::Url);
    assert_eq!(podcasts[0].source_url.as_deref(), Some(url.as_str()));
    assert_eq!(ctx.scratch_file_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_name_untitled_articles(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    let url = ctx
        .serve_article("/posts/untitled", &article_page(None, &[S1]))
        .await;

    let response = ctx
        .client
        .post_with_auth("/api/generate-from-url", &json!({ "url": url }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(ctx.podcasts.all()[0].title.starts_with("article-"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_articles_that_cannot_be_fetched(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    Mock::given(method("GET"))
        .and(path("/posts/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.mock_server)
        .await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/generate-from-url",
            &json!({ "url": format!("{}/posts/gone", ctx.mock_server.uri()) }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("could not extract article");
    assert!(ctx.tts.calls().is_empty());
    assert!(ctx.artifacts.objects().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_articles_without_readable_text(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    let url = ctx
        .serve_article(
            "/posts/empty",
            "<html><head><title>Empty</title></head><body><script>app()</script></body></html>",
        )
        .await;

    let response = ctx
        .client
        .post_with_auth("/api/generate-from-url", &json!({ "url": url }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("no readable text");
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_prefer_text_over_url(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    Mock::given(method("GET"))
        .and(path("/posts/ignored"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page(None, &[S2])))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/generate",
            &json!({
                "url": format!("{}/posts/ignored", ctx.mock_server.uri()),
                "text": S1
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.tts.calls(), vec![S1]);
    assert_eq!(ctx.podcasts.all()[0].source, SourceKind::Text);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_url_when_text_is_empty(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    let url = ctx
        .serve_article("/posts/fallback", &article_page(Some("Fallback"), &[S3]))
        .await;

    let response = ctx
        .client
        .post_with_auth("/api/generate", &json!({ "url": url, "text": "" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.tts.calls(), vec![S3]);
    assert_eq!(ctx.podcasts.all()[0].source, SourceKind::Url);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_url_or_text(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    for body in [json!({}), json!({ "url": null, "text": null }), json!({ "text": "" })] {
        let response = ctx
            .client
            .post_with_auth("/api/generate", &body, &token)
            .await
            .unwrap();

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_error_message("Either url or text must be provided");
    }
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_abort_on_the_first_failed_chunk(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    ctx.tts.fail_on_call(2);

    let response = ctx
        .client
        .post_with_auth(
            "/api/generate-from-text",
            &json!({ "text": three_sentences() }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_error_message("speech synthesis failed on chunk 2");
    assert!(!response.message().unwrap().contains("ThrottlingException"));

    // The third chunk is never attempted and nothing is stored or recorded
    assert_eq!(ctx.tts.calls(), vec![S1, S2]);
    assert!(ctx.artifacts.objects().is_empty());
    assert!(ctx.artifacts.scratch_files_at_upload().is_empty());
    assert!(ctx.podcasts.all().is_empty());
    assert_eq!(ctx.users.insert_count(), 0);
    assert_eq!(ctx.scratch_file_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clean_up_when_the_upload_fails(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);
    ctx.artifacts.fail_uploads();

    let response = ctx
        .client
        .post_with_auth(
            "/api/generate-from-text",
            &json!({ "text": three_sentences() }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_error_message("audio upload failed");
    assert!(!response.message().unwrap().contains("AccessDenied"));
    assert_eq!(ctx.artifacts.scratch_files_at_upload(), vec![1]);
    assert!(ctx.podcasts.all().is_empty());
    assert_eq!(ctx.scratch_file_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_produce_identical_audio_for_identical_text(ctx: &TestContext) {
    let token = generate_test_jwt(SUBJECT);

    for _ in 0..2 {
        ctx.client
            .post_with_auth(
                "/api/generate-from-text",
                &json!({ "text": three_sentences() }),
                &token,
            )
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let objects = ctx.artifacts.objects();
    assert_eq!(objects.len(), 2);
    assert_ne!(objects[0].0, objects[1].0, "each request gets its own object key");
    assert_eq!(objects[0].1, objects[1].1);
}
