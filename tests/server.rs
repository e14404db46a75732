use http::{Request, StatusCode};
use hyper::body::Incoming;
use petrel::{server, shared, Router, SharedHandler};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn ping_router() -> Arc<Router<SharedHandler<Incoming>>> {
    let mut router = Router::new("/");
    router.get(
        "/ping",
        shared(|_req: Request<Incoming>| async { petrel::text(StatusCode::OK, "pong") }),
    );
    Arc::new(router)
}

async fn request(addr: &SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let raw = format!("GET {} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n", path);
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn serves_connections_until_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel();
    let serving = tokio::spawn(server::serve(
        listener,
        ping_router(),
        Duration::from_secs(5),
        async {
            let _ = stopped.await;
        },
    ));

    let response = request(&addr, "/ping").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.ends_with("pong"), "{}", response);

    stop.send(()).unwrap();
    serving.await.unwrap();
}

#[tokio::test]
async fn finished_connections_are_reaped_while_serving() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel();
    let serving = tokio::spawn(server::serve(
        listener,
        ping_router(),
        Duration::from_secs(5),
        async {
            let _ = stopped.await;
        },
    ));

    for _ in 0..4 {
        request(&addr, "/ping").await;
    }
    // give the loop a beat to observe the closed connections
    tokio::time::sleep(Duration::from_millis(100)).await;
    stop.send(()).unwrap();

    // every closed connection left the task set before shutdown
    assert_eq!(serving.await.unwrap(), 0);
}
