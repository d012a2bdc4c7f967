//! Serves a directory over HTTP.
//!
//! ```sh
//! cargo run --example file_server -- ./public webby.toml
//! ```

use std::env;

use tracing::error;
use webby::{FileHandler, Method, Router, Server, ServerConfig};

#[tokio::main]
async fn main() {
    let mut args = env::args().skip(1);
    let root = args.next().unwrap_or_else(|| ".".to_owned());

    let config = match args.next() {
        Some(path) => match ServerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        },
        None => ServerConfig::default(),
    };

    if let Err(e) = webby::logging::init(&config) {
        eprintln!("{e}");
        return;
    }

    let router = Router::new().add("/", Method::Get, FileHandler::new(root));
    let server = match Server::builder().config(config).router(router).build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server setup");
            return;
        }
    };

    if let Err(e) = server.run().await {
        error!(cause = %e, "server stopped");
    }
}
