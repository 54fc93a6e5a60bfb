use htserve::http::request::{Method, Request, RequestBuilder, Uri, UriState};

fn request(version: (u8, u8), headers: &[(&str, &str)]) -> Request {
    headers
        .iter()
        .fold(
            RequestBuilder::new()
                .method(Method::GET)
                .uri("/")
                .version(version.0, version.1),
            |b, (k, v)| b.header(*k, *v),
        )
        .build()
        .unwrap()
}

#[test]
fn test_request_header_retrieval() {
    let req = request(
        (1, 1),
        &[("Host", "example.com"), ("Content-Type", "application/json")],
    );

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let req = request((1, 1), &[("Content-Length", "42")]);
    assert_eq!(req.content_length(), Ok(42));
}

#[test]
fn test_request_content_length_missing() {
    let req = request((1, 1), &[]);
    assert_eq!(req.content_length(), Ok(0));
}

#[test]
fn test_request_content_length_invalid() {
    let req = request((1, 1), &[("Content-Length", "not-a-number")]);
    assert_eq!(req.content_length(), Err("not-a-number".to_string()));
}

#[test]
fn test_request_keep_alive_http11_default() {
    assert!(request((1, 1), &[]).keep_alive());
}

#[test]
fn test_request_keep_alive_http11_close() {
    assert!(!request((1, 1), &[("Connection", "close")]).keep_alive());
    assert!(!request((1, 1), &[("Connection", "Close")]).keep_alive());
}

#[test]
fn test_request_keep_alive_http10() {
    assert!(!request((1, 0), &[]).keep_alive());
    assert!(request((1, 0), &[("Connection", "keep-alive")]).keep_alive());
}

#[test]
fn test_new_request_is_empty() {
    let req = Request::new();

    assert_eq!(req.method, Method::UNDETERMINED);
    assert_eq!(req.uri.state, UriState::Start);
    assert!(req.headers().is_empty());
    assert!(req.body().is_empty());
}

#[test]
fn test_push_method_char_resolves_method() {
    let mut req = Request::new();

    req.push_method_char('P');
    req.push_method_char('U');
    assert_eq!(req.method, Method::UNDETERMINED);
    req.push_method_char('T');
    assert_eq!(req.method, Method::PUT);
    req.push_method_char('S');
    assert_eq!(req.method, Method::UNDETERMINED);
    assert_eq!(req.method_name, "PUTS");
}

#[test]
fn test_method_round_trips_through_str() {
    for m in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::CONNECT,
        Method::OPTIONS,
        Method::HEAD,
        Method::TRACE,
    ] {
        assert_eq!(Method::from_str(m.as_str()), Some(m));
    }
    assert_eq!(Method::from_str("UNDETERMINED"), None);
}

#[test]
fn test_uri_split() {
    let uri = Uri::from("/search?q=rust+lang&tag=a%26b#top");

    assert_eq!(uri.state, UriState::Fragment);
    assert_eq!(uri.path(), "/search");
    assert_eq!(uri.query(), Some("q=rust+lang&tag=a%26b"));
    assert_eq!(uri.fragment(), Some("top"));
    assert_eq!(uri.as_str(), "/search?q=rust+lang&tag=a%26b#top");
    assert_eq!(
        uri.query_pairs(),
        vec![
            ("q".to_string(), "rust lang".to_string()),
            ("tag".to_string(), "a&b".to_string()),
        ]
    );
}

#[test]
fn test_uri_without_query() {
    let uri = Uri::from("/a/b");

    assert_eq!(uri.state, UriState::Path);
    assert_eq!(uri.path(), "/a/b");
    assert_eq!(uri.query(), None);
    assert_eq!(uri.fragment(), None);
    assert!(uri.query_pairs().is_empty());
}

#[test]
fn test_question_mark_inside_fragment() {
    let uri = Uri::from("/a#b?c");

    assert_eq!(uri.query(), None);
    assert_eq!(uri.fragment(), Some("b?c"));
}

#[test]
fn test_builder_requires_method_and_uri() {
    assert!(RequestBuilder::new().uri("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_request_version_string() {
    assert_eq!(request((1, 0), &[]).version(), "1.0");
    assert_eq!(request((1, 1), &[]).version(), "1.1");
}

#[test]
fn test_new_and_default_agree() {
    assert_eq!(Request::new(), Request::default());
    assert_eq!(Request::default().version(), "0.0");
}

#[test]
fn test_request_content_length_requires_digits() {
    for raw in ["+5", "-5", "5 ", " 5", "0x5", "", "5,5"] {
        let req = request((1, 1), &[("Content-Length", raw)]);
        assert_eq!(req.content_length(), Err(raw.to_string()), "accepted {raw:?}");
    }
    let req = request((1, 1), &[("Content-Length", "99999999999999999999999999")]);
    assert!(req.content_length().is_err());
    assert_eq!(request((1, 1), &[("Content-Length", "007")]).content_length(), Ok(7));
}
