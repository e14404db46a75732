use http::{header, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use petrel::{shared, Router, SharedHandler};

type TestBody = Full<Bytes>;

fn text_handler(marker: &'static str) -> SharedHandler<TestBody> {
    shared(move |_req: Request<TestBody>| async move { petrel::text(StatusCode::OK, marker) })
}

async fn send(
    router: &Router<SharedHandler<TestBody>>,
    method: Method,
    path: &str,
) -> Response<petrel::Body> {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .body(Full::default())
        .unwrap();
    router.serve(req).await
}

async fn get(router: &Router<SharedHandler<TestBody>>, path: &str) -> (StatusCode, String) {
    let response = send(router, Method::GET, path).await;
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn dispatches_nested_subrouter_routes() {
    let mut router = Router::new("/");
    router.get("/investments", text_handler("/investments"));
    router.get("/investments/:id", text_handler("/investments/:id"));
    router.subrouter("/investments/:id/positions").get("/", text_handler("positions index"));
    router.get(
        "/investments/:investmentId/positions/:positionId",
        shared(|req: Request<TestBody>| async move {
            let params = petrel::params(&req);
            petrel::text(
                StatusCode::OK,
                format!(
                    "{}/{}",
                    params.get("investmentId").unwrap_or(""),
                    params.get("positionId").unwrap_or("")
                ),
            )
        }),
    );

    assert_eq!(get(&router, "/investments").await, (StatusCode::OK, "/investments".into()));
    assert_eq!(
        get(&router, "/investments/some-id").await,
        (StatusCode::OK, "/investments/:id".into())
    );
    assert_eq!(
        get(&router, "/investments/some-id/positions").await,
        (StatusCode::OK, "positions index".into())
    );
    assert_eq!(
        get(&router, "/investments/some-id/positions/other-id").await,
        (StatusCode::OK, "some-id/other-id".into())
    );
}

#[tokio::test]
async fn non_canonical_get_redirects_permanently() {
    let mut router = Router::new("/");
    router.get("/investments", text_handler("/investments"));

    let response = send(&router, Method::GET, "/investments/").await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_owned();
    assert_eq!(location, "/investments");

    // following the redirect lands on the handler
    assert_eq!(get(&router, &location).await, (StatusCode::OK, "/investments".into()));
}

#[tokio::test]
async fn redirects_keep_queries_and_downgrade_for_unsafe_methods() {
    let mut router = Router::new("/");
    router.post("/positions", text_handler("created"));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/positions///?page=2")
        .body(TestBody::default())
        .unwrap();
    let response = router.serve(req).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/positions?page=2");
}

#[tokio::test]
async fn unknown_paths_fall_back_through_the_router_chain() {
    let mut router = Router::new("/");
    router.get("/positions", text_handler("positions"));

    let (status, body) = get(&router, "/wallets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "404 page not found\n");

    let sub = router.subrouter("/investments");
    sub.get("/", text_handler("investments"));
    // configured after the subrouter exists, still inherited
    router.set_not_found(shared(|_req: Request<TestBody>| async {
        petrel::text(StatusCode::NOT_FOUND, "custom 404")
    }));

    assert_eq!(
        get(&router, "/investments/5/extra").await,
        (StatusCode::NOT_FOUND, "custom 404".into())
    );
    assert_eq!(get(&router, "/wallets").await, (StatusCode::NOT_FOUND, "custom 404".into()));
}

#[tokio::test]
async fn own_fallbacks_beat_inherited_ones() {
    let mut router = Router::new("/");
    router.set_not_found(shared(|_req: Request<TestBody>| async {
        petrel::text(StatusCode::NOT_FOUND, "root 404")
    }));
    let sub = router.subrouter("/investments");
    sub.set_not_found(shared(|_req: Request<TestBody>| async {
        petrel::text(StatusCode::NOT_FOUND, "investments 404")
    }));
    sub.get("/", text_handler("investments"));

    assert_eq!(
        get(&router, "/investments/5/extra").await,
        (StatusCode::NOT_FOUND, "investments 404".into())
    );
    assert_eq!(get(&router, "/wallets").await, (StatusCode::NOT_FOUND, "root 404".into()));
}

#[tokio::test]
async fn unbound_verbs_yield_405_not_404() {
    let mut router = Router::new("/");
    router.get("/positions", text_handler("positions"));

    let response = send(&router, Method::DELETE, "/positions").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    router.set_method_not_allowed(shared(|_req: Request<TestBody>| async {
        petrel::text(StatusCode::METHOD_NOT_ALLOWED, "use GET")
    }));
    let response = send(&router, Method::DELETE, "/positions").await;
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, "use GET");
}

#[tokio::test]
async fn params_ride_the_request_extensions() {
    let mut router = Router::new("/");
    router.get(
        "/plain",
        shared(|req: Request<TestBody>| async move {
            // no parameters bound, carrier still present
            assert!(petrel::params(&req).is_empty());
            petrel::text(StatusCode::OK, "ok")
        }),
    );

    assert_eq!(get(&router, "/plain").await, (StatusCode::OK, "ok".into()));
}

#[test]
#[should_panic(expected = "duplicate GET handler")]
fn rebinding_a_method_panics() {
    let mut router: Router<usize> = Router::new("/");
    router.get("/positions", 1);
    router.get("/positions", 2);
}

#[test]
#[should_panic(expected = "duplicate param")]
fn repeated_param_names_panic() {
    let mut router: Router<usize> = Router::new("/");
    router.get("/investments/:uuid/positions/:uuid", 1);
}

#[test]
#[should_panic(expected = "duplicate subrouter")]
fn duplicate_subrouter_prefixes_panic() {
    let mut router: Router<usize> = Router::new("/");
    router.subrouter("/positions");
    router.subrouter("/positions/");
}

#[test]
#[should_panic(expected = "ambiguous subrouter prefix")]
fn same_length_overlapping_prefixes_panic() {
    let mut router: Router<usize> = Router::new("/");
    router.subrouter("/positions/:id");
    router.subrouter("/:resource/new");
}
