use htserve::http::request::{Method, RequestBuilder};
use htserve::http::response::StatusCode;
use htserve::router::Router;

fn router() -> Router {
    let mut router = Router::new();
    router
        .get("/", |ctx| ctx.response.write("root"))
        .get("/home/level2", |ctx| ctx.response.write("level2"))
        .post("/account/bar", |ctx| {
            let body = String::from_utf8_lossy(ctx.request.body()).into_owned();
            ctx.response.set_status_code(StatusCode::Created);
            ctx.response.write(body);
        });
    router
}

fn request(method: Method, uri: &str) -> htserve::http::request::Request {
    RequestBuilder::new().method(method).uri(uri).build().unwrap()
}

#[test]
fn test_dispatch_matches_method_and_path() {
    let router = router();

    let response = router.dispatch(&request(Method::GET, "/home/level2"));
    assert_eq!(response.status_code(), StatusCode::Ok);
    assert_eq!(response.body(), b"level2");
}

#[test]
fn test_dispatch_ignores_query_string() {
    let response = router().dispatch(&request(Method::GET, "/?q=1"));
    assert_eq!(response.body(), b"root");
}

#[test]
fn test_handler_sees_request_and_sets_status() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .uri("/account/bar")
        .body(b"payload".to_vec())
        .build()
        .unwrap();

    let response = router().dispatch(&req);
    assert_eq!(response.status_code(), StatusCode::Created);
    assert_eq!(response.body(), b"payload");
}

#[test]
fn test_unknown_path_is_not_found() {
    let response = router().dispatch(&request(Method::GET, "/nope"));
    assert_eq!(response.status_code(), StatusCode::NotFound);
}

#[test]
fn test_wrong_method_is_not_allowed() {
    let response = router().dispatch(&request(Method::DELETE, "/account/bar"));
    assert_eq!(response.status_code(), StatusCode::MethodNotAllowed);
}

#[test]
fn test_extension_method_is_not_implemented() {
    let mut req = request(Method::GET, "/");
    req.method = Method::UNDETERMINED;
    req.method_name = "BREW".to_string();

    let response = router().dispatch(&req);
    assert_eq!(response.status_code(), StatusCode::NotImplemented);
}

#[test]
fn test_head_falls_back_to_get() {
    let response = router().dispatch(&request(Method::HEAD, "/"));
    assert_eq!(response.status_code(), StatusCode::Ok);
    assert_eq!(response.header("Content-Length"), Some("4"));
}

#[test]
fn test_first_registration_wins() {
    let mut router = Router::new();
    router
        .get("/dup", |ctx| ctx.response.write("first"))
        .get("/dup", |ctx| ctx.response.write("second"));

    assert_eq!(router.route_count(), 1);
    assert_eq!(router.dispatch(&request(Method::GET, "/dup")).body(), b"first");
}

#[test]
fn test_display_lists_routes() {
    let listing = router().to_string();

    assert_eq!(
        listing,
        "GET     /\nGET     /home/level2\nPOST    /account/bar\n"
    );
}
