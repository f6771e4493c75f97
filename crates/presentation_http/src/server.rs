//! Serving with a bounded graceful shutdown

use std::{future::Future, sync::Arc, time::Duration};

use axum::Router;
use tokio::{net::TcpListener, sync::Notify};
use tracing::{info, warn};

/// Serve `app` until `shutdown` resolves, then drain for at most `drain_timeout`
///
/// Connections still open when the drain deadline passes are abandoned.
pub async fn serve<S>(
    listener: TcpListener,
    app: Router,
    shutdown: S,
    drain_timeout: Duration,
) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let trigger = Arc::clone(&draining);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            trigger.notify_one();
        })
        .into_future();

    let deadline = async {
        draining.notified().await;
        info!("⏳ Waiting up to {:?} for connections to close...", drain_timeout);
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = server => result,
        () = deadline => {
            warn!(timeout = ?drain_timeout, "Connections still open after shutdown timeout, exiting");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn bind() -> (TcpListener, std::net::SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    fn slow_app() -> Router {
        Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        )
    }

    #[tokio::test]
    async fn idle_server_stops_on_signal() {
        let (listener, _) = bind().await;
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            slow_app(),
            async move {
                let _ = rx.await;
            },
            Duration::from_secs(30),
        ));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.unwrap().unwrap().is_ok());
    }

    #[tokio::test]
    async fn hanging_request_is_cut_at_drain_timeout() {
        let (listener, addr) = bind().await;
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            slow_app(),
            async move {
                let _ = rx.await;
            },
            Duration::from_millis(200),
        ));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;

        assert!(result.unwrap().unwrap().is_ok());
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
