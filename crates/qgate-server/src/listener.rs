//! Listener lifecycle: bind the resolved address, report where the UI is
//! reachable, and serve until shutdown.

use axum::Router;
use qgate_core::{BindResolver, GatewayError, GatewayResult, ResolvedBind};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the listener. Failure here is fatal to the process.
pub async fn bind(bind: &ResolvedBind) -> GatewayResult<TcpListener> {
    let addr = bind.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| GatewayError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(addr = %addr, "listener bound");
    Ok(listener)
}

/// URL to show the operator for the address the OS actually bound.
pub fn display_url(resolver: &BindResolver, bound: SocketAddr) -> String {
    let shown = SocketAddr::new(resolver.display_address(bound.ip()), bound.port());
    format!("http://{shown}")
}

/// Serve `app` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> GatewayResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgate_core::StaticInterfaces;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind(&ResolvedBind {
            address: "127.0.0.1".into(),
            port: 0,
        })
        .await
        .unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_bind_error() {
        let first = bind(&ResolvedBind { address: "127.0.0.1".into(), port: 0 })
            .await
            .unwrap();
        let taken = first.local_addr().unwrap().port();
        match bind(&ResolvedBind { address: "127.0.0.1".into(), port: taken }).await {
            Err(GatewayError::Bind { addr, .. }) => assert_eq!(addr, format!("127.0.0.1:{taken}")),
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[test]
    fn test_display_url_for_wildcard() {
        let resolver = BindResolver::new(Box::new(StaticInterfaces(vec![Ipv4Addr::new(
            192, 168, 1, 10,
        )])));
        let bound: SocketAddr = "0.0.0.0:3000".parse().unwrap();
        assert_eq!(display_url(&resolver, bound), "http://192.168.1.10:3000");

        let bound: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        assert_eq!(display_url(&resolver, bound), "http://127.0.0.1:8080");
    }
}
