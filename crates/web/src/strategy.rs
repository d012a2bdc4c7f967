//! How accepted connections are scheduled.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::{debug, error};
use webby_http::connection::HttpConnection;
use webby_http::handler::Handler;

/// Runs the exchange of one accepted connection.
///
/// The accept loop awaits [`serve`](Strategy::serve) before accepting the next
/// connection, so a strategy that returns early is free to keep processing in
/// the background.
#[async_trait]
pub trait Strategy: Send + Sync {
    async fn serve(&self, stream: TcpStream, peer: SocketAddr, handler: Arc<dyn Handler>);
}

/// Serves connections one at a time: each connection is processed to completion
/// before the next is accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Single;

#[async_trait]
impl Strategy for Single {
    async fn serve(&self, stream: TcpStream, peer: SocketAddr, handler: Arc<dyn Handler>) {
        let (reader, writer) = stream.into_split();
        let connection = HttpConnection::new(reader, writer).with_peer(peer);

        match connection.process(handler.as_ref()).await {
            Ok(()) => debug!(%peer, "finished process, connection shutdown"),
            Err(e) => error!(%peer, cause = %e, "service has error, connection shutdown"),
        }
    }
}
