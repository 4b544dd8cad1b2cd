use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION, USER_AGENT};
use http::{HeaderValue, Method, StatusCode};
use httpexpect::{
    CancelSignal, Config, DeliveryOptions, Expect, FailureKind, HandlerTransport, RecordingReporter, RedirectPolicy,
    RetryPolicy, StatusRange, Transport, TransportRequest, TransportResponse,
};

fn json(status: StatusCode, body: &'static str) -> TransportResponse {
    TransportResponse::new(status)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(body)
}

fn expect<T: Transport>(transport: T) -> (Expect<T>, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    let config = Config::new(transport)
        .base_url("http://api.test/v1")
        .reporter(reporter.clone())
        .delivery(DeliveryOptions::default().retry_delay(Duration::from_millis(1), Duration::from_millis(2)));
    (Expect::new(config), reporter)
}

/// In-process API used by most scenarios.
fn api(request: TransportRequest) -> TransportResponse {
    match (request.method.as_str(), request.url.path()) {
        ("GET", "/v1/users/7") => json(StatusCode::OK, r#"{"id": 7, "name": "Ann", "roles": ["admin", "dev"]}"#),
        ("POST", "/v1/users") => {
            let body = request.body_bytes();
            TransportResponse::new(StatusCode::SEE_OTHER)
                .header(LOCATION, HeaderValue::from_static("/v1/users/7"))
                .header(http::HeaderName::from_static("x-echo-len"), HeaderValue::from(body.len()))
        }
        ("GET", "/v1/whoami") => {
            let auth = request
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("anonymous")
                .to_owned();
            TransportResponse::new(StatusCode::OK).body(auth)
        }
        _ => TransportResponse::new(StatusCode::NOT_FOUND),
    }
}

#[tokio::test]
async fn test_json_round_trip() {
    let (e, reporter) = expect(HandlerTransport::new(|request: TransportRequest| async move {
        Ok::<_, io::Error>(api(request))
    }));

    let response = e.get("/users/{id}").path_param("id", 7).expect().await;
    response.status(200).status_range(StatusRange::Success).content_type("application/json");

    let user = response.json().object();
    user.value("id").number().is_equal(7.0);
    user.value("name").string().is_equal_fold("ANN");
    user.value("roles").array().contains(&"dev").length().is_equal(2.0);
    user.contains_subset(&serde_json::json!({"id": 7}));

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
    assert_eq!(response.attempts().len(), 1);
}

#[tokio::test]
async fn test_failures_report_once_with_paths() {
    let (e, reporter) = expect(HandlerTransport::new(|request: TransportRequest| async move {
        Ok::<_, io::Error>(api(request))
    }));

    let response = e.get("/users/7").expect().await;
    response.status(404);
    let missing = response.json().object().value("email");
    missing.string().has_suffix("@example.com");
    missing.string().is_empty();
    response.json().object().value("id").number().gt(100.0);

    let failures = reporter.failures();
    let paths: Vec<_> = failures.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            r#"Request("GET").Expect().Status(404)"#,
            r#"Request("GET").Expect().JSON().Object().Value("email")"#,
            r#"Request("GET").Expect().JSON().Object().Value("id").Number().Gt(100.0)"#,
        ]
    );
    assert!(failures.iter().all(|f| f.kind == FailureKind::Assertion));
}

#[tokio::test]
async fn test_alias_in_failure() {
    let (e, reporter) = expect(HandlerTransport::new(|request: TransportRequest| async move {
        Ok::<_, io::Error>(api(request))
    }));

    let response = e.get("/users/7").expect().await.alias("user");
    response.json().object().value("name").string().is_equal("Bob");

    let failure = &reporter.failures()[0];
    assert_eq!(failure.alias_path, r#"user.JSON().Object().Value("name").String().IsEqual("Bob")"#);
}

#[tokio::test]
async fn test_retries_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let (e, reporter) = expect(HandlerTransport::new(move |_request: TransportRequest| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            let status = if n < 2 { StatusCode::INTERNAL_SERVER_ERROR } else { StatusCode::OK };
            Ok::<_, io::Error>(TransportResponse::new(status))
        }
    }));

    let response = e
        .get("/flaky")
        .with_max_retries(2)
        .with_retry_policy(RetryPolicy::RetryAllErrors)
        .expect()
        .await;

    response.status(200);
    assert!(reporter.is_empty());
    assert_eq!(response.attempts().len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_post_redirected_as_get() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let (e, reporter) = expect(HandlerTransport::new(move |request: TransportRequest| {
        sink.lock().unwrap().push((request.method.clone(), request.body_bytes()));
        async move { Ok::<_, io::Error>(api(request)) }
    }));

    let response = e.post("/users").json(&serde_json::json!({"name": "Ann"})).expect().await;

    response.status(200);
    response.json().object().value("id").number().is_equal(7.0);
    assert!(reporter.is_empty());
    assert_eq!(response.redirects(), 1);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, Method::POST);
    assert_eq!(seen[0].1, Bytes::from_static(br#"{"name":"Ann"}"#));
    assert_eq!(seen[1], (Method::GET, Bytes::new()));
}

#[tokio::test]
async fn test_redirect_not_followed() {
    let (e, reporter) = expect(HandlerTransport::new(|request: TransportRequest| async move {
        Ok::<_, io::Error>(api(request))
    }));

    let response = e
        .post("/users")
        .text("name=Ann")
        .with_redirect_policy(RedirectPolicy::DontFollowRedirects)
        .expect()
        .await;

    response.status(303).status_range(StatusRange::Redirection);
    response.header("location").is_equal("/v1/users/7");
    response.header("x-echo-len").as_number().is_equal(8.0);
    assert!(reporter.is_empty());
    assert_eq!(response.redirects(), 0);
}

#[tokio::test]
async fn test_timeout_fails_once_and_silences_response() {
    let (e, reporter) = expect(HandlerTransport::new(|_request: TransportRequest| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok::<_, io::Error>(TransportResponse::new(StatusCode::OK))
    }));

    let response = e.get("/slow").with_timeout(Duration::from_millis(10)).expect().await;
    response.status(200);
    response.json().object().value("id").is_null();

    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Timeout);
    assert_eq!(failures[0].path, r#"Request("GET").Expect()"#);
    assert!(response.elapsed() < Duration::from_millis(900));
    assert!(response.chain().failed());
}

#[tokio::test]
async fn test_external_cancel() {
    let (e, reporter) = expect(HandlerTransport::new(|_request: TransportRequest| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, io::Error>(TransportResponse::new(StatusCode::OK))
    }));

    let signal = CancelSignal::new();
    let trigger = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let response = e.get("/hang").with_cancel(signal).expect().await;
    response.status(200);

    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Cancelled);
}

#[tokio::test]
async fn test_transport_error_is_reported() {
    let (e, reporter) = expect(HandlerTransport::new(|_request: TransportRequest| async {
        Err::<TransportResponse, _>(io::Error::new(io::ErrorKind::InvalidData, "malformed status line"))
    }));

    e.get("/broken").expect().await.status(200);

    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Transport);
    assert!(failures[0].errors.iter().any(|e| e.contains("malformed status line")));
}

#[tokio::test]
async fn test_construction_error_skips_transport() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let (e, reporter) = expect(HandlerTransport::new(move |_request: TransportRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, io::Error>(TransportResponse::new(StatusCode::OK)) }
    }));

    let response = e.get("/users/{id}").expect().await;
    response.status(200);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Usage);
    assert_eq!(failures[0].path, r#"Request("GET")"#);
}

#[tokio::test]
async fn test_streamed_body_replayed_on_retry() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let (e, reporter) = expect(HandlerTransport::new(move |request: TransportRequest| {
        let mut seen = sink.lock().unwrap();
        seen.push(request.body_bytes());
        let first = seen.len() == 1;
        async move {
            if first {
                Err(io::Error::from(io::ErrorKind::ConnectionReset))
            } else {
                Ok(TransportResponse::new(StatusCode::ACCEPTED))
            }
        }
    }));

    let chunks: Vec<io::Result<Bytes>> = vec![Ok(Bytes::from_static(b"chunk-1,")), Ok(Bytes::from_static(b"chunk-2"))];
    let response = e
        .put("/upload")
        .stream(Box::pin(futures_util::stream::iter(chunks)))
        .with_max_retries(1)
        .expect()
        .await;

    response.status(202);
    assert!(reporter.is_empty());
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|body| &body[..] == b"chunk-1,chunk-2"));
}

#[tokio::test]
async fn test_default_headers_and_auth() {
    let reporter = Arc::new(RecordingReporter::new());
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let transport = HandlerTransport::new(move |request: TransportRequest| {
        *sink.lock().unwrap() = request.headers.get(USER_AGENT).cloned();
        async move { Ok::<_, io::Error>(api(request)) }
    });
    let e = Expect::new(
        Config::new(transport)
            .base_url("http://api.test/v1/")
            .reporter(reporter.clone())
            .header(USER_AGENT, HeaderValue::from_static("suite/1.0")),
    );

    e.get("whoami").bearer_auth("t0k3n").expect().await.body().is_equal("Bearer t0k3n");
    e.get("whoami").basic_auth("ann", "pw").expect().await.text().has_prefix("Basic ");

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
    assert_eq!(seen.lock().unwrap().as_ref().unwrap(), "suite/1.0");
}
