use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{lookup_host, TcpListener, TcpSocket};
use tracing::{error, info, warn};
use webby_http::handler::Handler;

use crate::config::{LogSink, ServerConfig};
use crate::router::Router;
use crate::strategy::{Single, Strategy};

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
}

/// Startup failures: the server never got to accept a connection.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("can't resolve {address}: {source}")]
    Resolve { address: String, source: io::Error },

    #[error("{address} resolved to no socket address")]
    NoAddress { address: String },

    #[error("can't listen on {address}: {source}")]
    Bind { address: SocketAddr, source: io::Error },

    #[error("can't open log sink {sink:?}: {source}")]
    LogSink { sink: LogSink, source: io::Error },

    #[error("can't set up logging: {reason}")]
    Logging { reason: String },
}

pub struct ServerBuilder {
    config: Option<ServerConfig>,
    router: Option<Router>,
    strategy: Option<Box<dyn Strategy>>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { config: None, router: None, strategy: None }
    }

    /// Defaults to [`ServerConfig::default`].
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Defaults to [`Single`].
    #[must_use]
    pub fn strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// # Errors
    ///
    /// Fails if no router was set.
    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        Ok(Server {
            config: self.config.unwrap_or_default(),
            handler: Arc::new(router),
            strategy: self.strategy.unwrap_or_else(|| Box::new(Single)),
        })
    }
}

/// A configured server that is not listening yet.
///
/// ```no_run
/// use webby::{FileHandler, Method, Router, Server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::new().with_port(8080);
///     webby::logging::init(&config)?;
///
///     let router = Router::new().add("/", Method::Get, FileHandler::new("./public"));
///     Server::builder().config(config).router(router).build()?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    config: ServerConfig,
    handler: Arc<dyn Handler>,
    strategy: Box<dyn Strategy>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Resolves the configured address and starts listening on the first
    /// socket address that can be bound.
    ///
    /// # Errors
    ///
    /// Fails if the address can't be resolved or none of its socket addresses can
    /// be bound.
    pub async fn bind(self) -> Result<Listening, ServerError> {
        let host = self.config.address();
        let port = self.config.port();
        let address = format!("{host}:{port}");

        let socket_addrs = lookup_host((host, port)).await.map_err(|source| {
            error!(%address, cause = %source, "can't resolve listen address");
            ServerError::Resolve { address: address.clone(), source }
        })?;

        let mut last_error = None;
        for socket_addr in socket_addrs {
            match listen(socket_addr, self.config.backlog()) {
                Ok(listener) => {
                    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { address: socket_addr, source })?;
                    info!(%local_addr, backlog = self.config.backlog(), "start listening");
                    return Ok(Listening { listener, local_addr, handler: self.handler, strategy: self.strategy });
                }
                Err(source) => {
                    warn!(%socket_addr, cause = %source, "can't listen on address");
                    last_error = Some(ServerError::Bind { address: socket_addr, source });
                }
            }
        }

        let e = last_error.unwrap_or(ServerError::NoAddress { address });
        error!(cause = %e, "bind server error");
        Err(e)
    }

    /// Binds and serves until the process ends.
    ///
    /// # Errors
    ///
    /// Returns the bind failure; once listening, this never returns.
    pub async fn run(self) -> Result<(), ServerError> {
        self.bind().await?.run().await;
        Ok(())
    }
}

fn listen(socket_addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if socket_addr.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };
    socket.set_reuseaddr(true)?;
    socket.bind(socket_addr)?;
    socket.listen(backlog)
}

/// A server bound to its listening socket.
pub struct Listening {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: Arc<dyn Handler>,
    strategy: Box<dyn Strategy>,
}

impl Listening {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections forever, handing each one to the strategy.
    ///
    /// Failed accepts and failed connections are logged; neither ends the loop.
    pub async fn run(self) {
        loop {
            let (tcp_stream, peer) = match self.listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            self.strategy.serve(tcp_stream, peer, Arc::clone(&self.handler)).await;
        }
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server").field("config", &self.config).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for Listening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listening").field("local_addr", &self.local_addr).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder").field("config", &self.config).field("router", &self.router).finish_non_exhaustive()
    }
}
