//! A read-only REST collection.
//!
//! ```sh
//! cargo run --example rest_api
//! curl -i http://localhost:8080/item
//! curl -i http://localhost:8080/item/2
//! curl -i -X DELETE http://localhost:8080/item/2   # 501
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use webby::{MethodMask, Request, Resource, ResourceHandler, Response, Router, SendError, Server, ServerConfig};

#[derive(Serialize)]
struct Item<'a> {
    id: u32,
    name: &'a str,
}

struct Items {
    items: BTreeMap<u32, String>,
}

async fn write_json(resp: &mut Response, body: Vec<u8>) -> Result<(), SendError> {
    resp.set_status_code(200)?
        .set_header("Content-Type", "application/json")?
        .set_header("Content-Length", body.len().to_string())?;
    resp.write_block(&body).await
}

#[async_trait]
impl Resource for Items {
    async fn index(&self, _req: &Request, resp: &mut Response) -> Result<(), SendError> {
        let items: Vec<_> = self.items.iter().map(|(id, name)| Item { id: *id, name }).collect();
        let body = serde_json::to_vec(&items).unwrap_or_default();
        write_json(resp, body).await
    }

    async fn show(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        let item = req
            .subpath()
            .trim_start_matches('/')
            .parse::<u32>()
            .ok()
            .and_then(|id| self.items.get_key_value(&id))
            .map(|(id, name)| Item { id: *id, name });

        match item {
            Some(item) => write_json(resp, serde_json::to_vec(&item).unwrap_or_default()).await,
            None => {
                resp.set_status_code(404)?;
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::new().with_log_level("debug");
    webby::logging::init(&config)?;

    let items = Items { items: BTreeMap::from([(1, "First item".to_owned()), (2, "Second item".to_owned())]) };
    let router = Router::new().add("/item", MethodMask::REST, ResourceHandler::new(items));

    Server::builder().config(config).router(router).build()?.run().await?;
    Ok(())
}
