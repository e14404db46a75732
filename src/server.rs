//! TCP accept loop bridging the router to hyper's http1 server.

use crate::handler::Handler;
use crate::router::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

/// Accepts connections and serves each over http1 until `shutdown`
/// completes, then drains the connections still open for up to
/// `drain_timeout` before aborting them.
///
/// Connections that finish while the loop runs are reaped as they close,
/// so the task set only ever holds open connections. Returns how many
/// connections were still open when shutdown began.
pub async fn serve<T>(
    listener: TcpListener,
    router: Arc<Router<T>>,
    drain_timeout: Duration,
    shutdown: impl Future<Output = ()>,
) -> usize
where
    T: Handler<Incoming> + 'static,
{
    tokio::pin!(shutdown);
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        log::warn!("accept failed: {}", err);
                        continue;
                    }
                };
                log::trace!("connection from {}", peer);

                let router = router.clone();
                connections.spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| {
                        let router = router.clone();
                        async move { Ok::<_, Infallible>(router.serve(req).await) }
                    });
                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        log::debug!("connection error: {}", err);
                    }
                });
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut shutdown => break,
        }
    }

    let open = connections.len();
    log::info!("received shutdown, draining {} open connection(s)", open);
    let drain = async {
        while connections.join_next().await.is_some() {}
    };
    if tokio::time::timeout(drain_timeout, drain).await.is_err() {
        log::warn!("drain timed out, aborting remaining connections");
        connections.shutdown().await;
    }
    open
}
