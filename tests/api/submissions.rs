use std::sync::Arc;
use std::time::Duration;

use perfect_swing_waitlist::configuration::WaitlistSettings;
use perfect_swing_waitlist::locale::Locale;
use perfect_swing_waitlist::notification::FeedbackKind;
use perfect_swing_waitlist::page::PageVariant;
use perfect_swing_waitlist::widget::Phase;
use perfect_swing_waitlist::widget::SubmitOutcome;
use wiremock::matchers::any;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use secrecy::Secret;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

use crate::helpers::page_from_settings;
use crate::helpers::spawn_page;
use crate::helpers::spawn_unreachable_page;
use crate::helpers::API_KEY;

#[tokio::test]
async fn invalid_email_is_never_sent() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    for bad in ["bad-email", "user@example", "user example.com", ""] {
        widget.set_email(bad);
        assert!(!widget.is_submit_enabled(), "{bad:?}");
        // out-of-band click, i.e. the disabled button didn't stop it
        assert_eq!(widget.submit().await, SubmitOutcome::InvalidEmail, "{bad:?}");

        let s = widget.snapshot();
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.feedback.kind, FeedbackKind::Error);
        assert_eq!(s.feedback.text, "올바른 이메일 주소를 입력해주세요.");
        assert_eq!(s.email, bad);
    }
}

#[tokio::test]
async fn accepted() {
    let app = spawn_page(PageVariant {
        share_affordance: true,
        ..Default::default()
    })
    .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/waitlist"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .and(body_partial_json(
            serde_json::json!({ "email": "user@example.com" }),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");
    assert!(widget.is_submit_enabled());
    assert!(!widget.snapshot().share_visible);

    assert_eq!(widget.submit().await, SubmitOutcome::Accepted);

    let s = widget.snapshot();
    assert_eq!(s.phase, Phase::Success);
    assert_eq!(s.email, "");
    assert_eq!(s.feedback.kind, FeedbackKind::Success);
    assert_eq!(s.feedback.text, Locale::Korean.copy().success);
    assert!(s.share_visible);
    assert_eq!(s.signup_count, 501);
    assert!(!s.is_submitting());
}

#[tokio::test]
async fn english_variant_uses_its_own_collection() {
    let app = spawn_page(PageVariant {
        locale: Locale::English,
        ..Default::default()
    })
    .await;
    Mock::given(path("/rest/v1/waitlist_en"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("player@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::Accepted);
    assert_eq!(
        widget.snapshot().feedback.text,
        "You're on the list! We'll email you as soon as we launch."
    );
    // share affordance is off for this variant
    assert!(!widget.snapshot().share_visible);
}

#[tokio::test]
async fn rejected_message_is_shown_verbatim() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "Duplicate email" })),
        )
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::Rejected);

    let s = widget.snapshot();
    assert_eq!(s.feedback.kind, FeedbackKind::Error);
    assert_eq!(s.feedback.text, "Duplicate email");
    assert_eq!(s.email, "user@example.com");
    assert_eq!(s.phase, Phase::Error);
    assert!(!s.is_submitting());
    assert_eq!(s.signup_count, 500);
    // retryable straight away
    assert!(widget.is_submit_enabled());
}

#[tokio::test]
async fn rejected_without_message_falls_back() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::Rejected);
    assert_eq!(
        widget.snapshot().feedback.text,
        Locale::Korean.copy().submit_failed
    );
}

#[tokio::test]
async fn unreachable_collector() {
    let page = spawn_unreachable_page(PageVariant::default());

    let widget = &page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::NetworkError);

    let s = widget.snapshot();
    assert_eq!(s.feedback.kind, FeedbackKind::Error);
    assert_eq!(s.feedback.text, Locale::Korean.copy().network_error);
    assert_eq!(s.email, "user@example.com");
    assert!(!s.is_submitting());
}

#[tokio::test]
async fn slow_collector_times_out() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::NetworkError);
    assert_eq!(widget.snapshot().email, "user@example.com");
}

#[tokio::test]
async fn second_click_while_in_flight_is_ignored() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        // dropping the MockServer fails the test if more than one request
        // arrived
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = Arc::clone(&app.page.top);
    widget.set_email("user@example.com");

    let first = tokio::spawn({
        let widget = Arc::clone(&widget);
        async move { widget.submit().await }
    });
    while !widget.snapshot().is_submitting() {
        tokio::task::yield_now().await;
    }

    assert!(!widget.is_submit_enabled());
    assert_eq!(widget.submit_label(), Locale::Korean.copy().submit_busy);
    assert_eq!(widget.submit().await, SubmitOutcome::AlreadySubmitting);

    assert_eq!(first.await.unwrap(), SubmitOutcome::Accepted);
    assert_eq!(widget.submit_label(), Locale::Korean.copy().submit_idle);
    assert_eq!(widget.snapshot().signup_count, 501);
}

#[tokio::test]
async fn dropped_submission_resets_busy_state() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");

    let cut_short = tokio::time::timeout(Duration::from_millis(50), widget.submit()).await;
    assert!(cut_short.is_err());

    let s = widget.snapshot();
    assert!(!s.is_submitting());
    assert_eq!(s.phase, Phase::Idle);
    assert_eq!(s.email, "user@example.com");
    assert!(widget.is_submit_enabled());
}

#[tokio::test]
async fn consent_required_before_sending() {
    let app = spawn_page(PageVariant {
        privacy_consent: true,
        ..Default::default()
    })
    .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::ConsentMissing);
    assert_eq!(
        widget.snapshot().feedback.text,
        "개인정보 수집 및 이용에 동의해주세요."
    );

    widget.set_privacy_consent(true);
    assert_eq!(widget.submit().await, SubmitOutcome::Accepted);
    // the checkbox is reset along with the input
    assert!(!widget.snapshot().privacy_consent);
}

#[tokio::test]
async fn success_returns_to_idle_after_dismissal() {
    let app = spawn_page(PageVariant::default()).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.collector)
        .await;

    let widget = &app.page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::Accepted);

    // request is done; safe to fast-forward from here on
    tokio::time::pause();
    tokio::time::sleep(Duration::from_millis(4900)).await;
    assert_eq!(widget.snapshot().phase, Phase::Success);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let s = widget.snapshot();
    assert_eq!(s.phase, Phase::Idle);
    assert!(s.feedback.is_empty());
    assert_eq!(s.signup_count, 501);
}

#[tokio::test]
async fn blank_collector_key_is_a_network_error() {
    let collector = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&collector)
        .await;

    // e.g. `APP_WAITLIST__API_KEY=""`
    let settings = WaitlistSettings {
        base_url: Some(collector.uri()),
        api_key: Some(Secret::new(String::new())),
        timeout_milliseconds: 500,
    };
    assert!(!settings.is_configured());
    let page = page_from_settings(PageVariant::default(), &settings);

    let widget = &page.top;
    widget.set_email("user@example.com");
    assert_eq!(widget.submit().await, SubmitOutcome::NetworkError);

    let s = widget.snapshot();
    assert_eq!(s.feedback.kind, FeedbackKind::Error);
    assert_eq!(s.feedback.text, Locale::Korean.copy().network_error);
    assert_eq!(s.email, "user@example.com");
}
