mod common;

use axum::http::{header, StatusCode};
use common::{body_text, location, test_settings, TestApp};
use itinerary_service::models::Language;
use itinerary_service::services::prompts::PipelineMode;
use itinerary_service::services::providers::mock::MockTextProvider;
use std::time::Duration;

#[tokio::test]
async fn idle_page_shows_the_form() {
    let app = TestApp::spawn(MockTextProvider::echo());
    let mut client = app.client();

    let (status, body) = client.page("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/generate""#));
    assert!(body.contains("Telugu &amp; English Mix"));
    assert!(body.contains(r#"<option value="mix" selected>"#));
    assert!(!body.contains("/download"));
}

#[tokio::test]
async fn generate_holds_final_stage_output() {
    let app = TestApp::spawn(MockTextProvider::with_responses([
        "R1 route",
        "R2 fees",
        "# Day 1\n\nDashashwamedh Ghat aarti",
    ]));
    let mut client = app.client();

    let response = client
        .post_form("/generate", "query=4+days+trip+to+Kashi+and+Prayagraj&language=english")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let (status, body) = client.page("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Day 1</h1>"));
    assert!(body.contains("Dashashwamedh Ghat aarti"));
    assert!(body.contains(r#"href="/download""#));
    assert!(!body.contains(r#"action="/generate""#));

    let prompts = app.provider.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("4 days trip to Kashi and Prayagraj"));
    assert!(prompts[1].contains("R1 route"));
    assert!(prompts[2].contains("R2 fees"));
    assert!(prompts[2].contains(Language::English.instruction()));
}

#[tokio::test]
async fn download_matches_held_text() {
    let itinerary = "# Goa\n\n| Day | Plan |\n|---|---|\n| 1 | Baga beach |\n";
    let app = TestApp::new(
        {
            let mut settings = test_settings();
            settings.pipeline.mode = PipelineMode::Single;
            settings
        },
        MockTextProvider::with_responses([itinerary]),
    );
    let mut client = app.client();

    client.post_form("/generate", "query=Goa").await;
    let response = client.get("/download").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        r#"attachment; filename="travel_itinerary.md""#
    );
    assert_eq!(body_text(response).await, itinerary);
}

#[tokio::test]
async fn empty_query_warns_without_calling_provider() {
    let app = TestApp::spawn(MockTextProvider::echo());
    let mut client = app.client();

    let response = client.post_form("/generate", "query=+++&language=hindi").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.provider.call_count(), 0);

    let (_, body) = client.page("/").await;
    assert!(body.contains("Please describe your trip before generating"));
    assert!(body.contains(r#"action="/generate""#));

    // The notice is shown once.
    let (_, body) = client.page("/").await;
    assert!(!body.contains("Please describe your trip"));

    let (status, _) = client.page("/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_query_field_counts_as_empty() {
    let app = TestApp::spawn(MockTextProvider::echo());
    let mut client = app.client();

    let response = client.post_form("/generate", "language=english").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn provider_error_is_held_shown_and_downloadable() {
    let app = TestApp::spawn(MockTextProvider::failing("quota exceeded"));
    let mut client = app.client();

    client.post_form("/generate", "query=Ooty").await;

    let (_, body) = client.page("/").await;
    assert!(body.contains(r#"role="alert""#));
    assert!(body.contains("⚠️ Error: API error: quota exceeded"));
    assert!(!body.contains(r#"class="itinerary""#));

    let response = client.get("/download").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "⚠️ Error: API error: quota exceeded");
}

#[tokio::test]
async fn missing_credentials_flash_and_hold_nothing() {
    let app = TestApp::spawn(MockTextProvider::unconfigured());
    let mut client = app.client();

    client.post_form("/generate", "query=Munnar").await;

    let (_, body) = client.page("/").await;
    assert!(body.contains("Model provider is not configured"));
    assert!(body.contains(r#"action="/generate""#));

    let (status, _) = client.page("/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_returns_to_form_and_is_idempotent() {
    let app = TestApp::spawn(MockTextProvider::echo());
    let mut client = app.client();

    let response = client.post_form("/reset", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let (status, body) = client.page("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/generate""#));

    client.post_form("/generate", "query=Hampi").await;
    let (status, _) = client.page("/download").await;
    assert_eq!(status, StatusCode::OK);

    client.post_form("/reset", "").await;
    client.post_form("/reset", "").await;

    let (_, body) = client.page("/").await;
    assert!(body.contains(r#"action="/generate""#));
    let (status, _) = client.page("/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn new_generation_overwrites_held_result() {
    let mut settings = test_settings();
    settings.pipeline.mode = PipelineMode::Single;
    let app = TestApp::new(settings, MockTextProvider::with_responses(["first plan", "second plan"]));
    let mut client = app.client();

    client.post_form("/generate", "query=Goa").await;
    client.post_form("/generate", "query=Ooty").await;

    let response = client.get("/download").await;
    assert_eq!(body_text(response).await, "second plan");
}

#[tokio::test]
async fn notice_from_another_tab_survives_a_running_generation() {
    let app = TestApp::spawn(MockTextProvider::echo().with_delay(Duration::from_millis(100)));
    let mut client = app.client();
    client.post_form("/generate", "query=Goa").await;
    let mut tab = client.same_session();

    let running = tokio::spawn(async move {
        client.post_form("/generate", "query=Varanasi").await;
        client
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    tab.post_form("/generate", "query=").await;
    let mut client = running.await.unwrap();

    let (_, body) = client.page("/").await;
    assert!(body.contains("Please describe your trip before generating"));

    let (status, download) = client.page("/download").await;
    assert_eq!(status, StatusCode::OK);
    assert!(download.contains("Varanasi"));
}

#[tokio::test]
async fn sessions_do_not_share_results() {
    let app = TestApp::spawn(MockTextProvider::echo());
    let mut alice = app.client();
    let mut bob = app.client();

    alice.post_form("/generate", "query=Coorg").await;

    let (status, _) = alice.page("/download").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = bob.page("/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = bob.page("/").await;
    assert!(body.contains(r#"action="/generate""#));
}

#[tokio::test]
async fn selected_language_reaches_the_prompt() {
    let mut settings = test_settings();
    settings.pipeline.mode = PipelineMode::Single;
    let app = TestApp::new(settings, MockTextProvider::echo());
    let mut client = app.client();

    client.post_form("/generate", "query=Jaipur&language=hindi").await;

    let prompts = app.provider.prompts();
    assert!(prompts[0].contains(Language::Hindi.instruction()));
}

#[tokio::test]
async fn language_selection_can_be_disabled() {
    let mut settings = test_settings();
    settings.pipeline.mode = PipelineMode::Single;
    settings.features.language_selection = false;
    let app = TestApp::new(settings, MockTextProvider::echo());
    let mut client = app.client();

    let (_, body) = client.page("/").await;
    assert!(!body.contains("<select"));

    client.post_form("/generate", "query=Jaipur&language=hindi").await;

    let prompts = app.provider.prompts();
    assert!(prompts[0].contains(Language::TeluguEnglishMix.instruction()));
    assert!(!prompts[0].contains(Language::Hindi.instruction()));
}

#[tokio::test]
async fn model_html_is_escaped_on_the_page() {
    let mut settings = test_settings();
    settings.pipeline.mode = PipelineMode::Single;
    let app = TestApp::new(
        settings,
        MockTextProvider::with_responses(["Day 1 <script>alert('x')</script>"]),
    );
    let mut client = app.client();

    client.post_form("/generate", "query=Goa").await;

    let (_, body) = client.page("/").await;
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;"));
}
