//! REST-style resources.
//!
//! A [`Resource`] implements any of the five collection operations; the
//! [`ResourceHandler`] wrapping it picks the operation from the request:
//!
//! | request                 | operation |
//! |-------------------------|-----------|
//! | `GET <prefix>`          | index     |
//! | `GET <prefix>/<id>`     | show      |
//! | `POST <prefix>`         | create    |
//! | `PUT <prefix>/<id>`     | update    |
//! | `DELETE <prefix>/<id>`  | destroy   |
//!
//! The response starts out as `501 Not Implemented`, so operations a resource
//! leaves alone, and methods outside the table, answer 501.

use async_trait::async_trait;
use http::StatusCode;
use tracing::trace;
use webby_http::handler::Handler;
use webby_http::protocol::{Method, Request, Response, SendError};

/// A collection served under one route prefix.
///
/// Every operation defaults to doing nothing, which leaves the `501` preset by
/// [`ResourceHandler`] in place.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Responds with the whole collection.
    async fn index(&self, _req: &Request, _resp: &mut Response) -> Result<(), SendError> {
        Ok(())
    }

    /// Responds with the element named by [`Request::subpath`].
    async fn show(&self, _req: &Request, _resp: &mut Response) -> Result<(), SendError> {
        Ok(())
    }

    async fn create(&self, _req: &Request, _resp: &mut Response) -> Result<(), SendError> {
        Ok(())
    }

    async fn update(&self, _req: &Request, _resp: &mut Response) -> Result<(), SendError> {
        Ok(())
    }

    async fn destroy(&self, _req: &Request, _resp: &mut Response) -> Result<(), SendError> {
        Ok(())
    }
}

/// Serves a [`Resource`].
#[derive(Debug)]
pub struct ResourceHandler<R> {
    resource: R,
}

impl<R: Resource> ResourceHandler<R> {
    pub fn new(resource: R) -> Self {
        Self { resource }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }
}

#[async_trait]
impl<R: Resource> Handler for ResourceHandler<R> {
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        resp.set_status(StatusCode::NOT_IMPLEMENTED)?;

        match req.method() {
            Method::Get if req.subpath().is_empty() => self.resource.index(req, resp).await,
            Method::Get => self.resource.show(req, resp).await,
            Method::Post => self.resource.create(req, resp).await,
            Method::Put => self.resource.update(req, resp).await,
            Method::Delete => self.resource.destroy(req, resp).await,
            method => {
                trace!(%method, "no resource operation for method");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use crate::test_support::request;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use webby_http::protocol::MethodMask;

    #[derive(Debug, Serialize)]
    struct Item<'a> {
        id: u32,
        name: &'a str,
    }

    /// Read-only items, only `index` and `show` are implemented.
    struct Items {
        items: BTreeMap<u32, String>,
    }

    impl Items {
        fn new() -> Self {
            let items = BTreeMap::from([(1, "First item".to_owned()), (2, "Second item".to_owned())]);
            Self { items }
        }
    }

    async fn write_json<T: Serialize + Sync>(resp: &mut Response, value: &T) -> Result<(), SendError> {
        let body = serde_json::to_vec(value).unwrap();
        resp.set_status(StatusCode::OK)?
            .set_header("Content-Type", "application/json")?
            .set_header("Content-Length", body.len().to_string())?;
        resp.write_block(&body).await
    }

    #[async_trait]
    impl Resource for Items {
        async fn index(&self, _req: &Request, resp: &mut Response) -> Result<(), SendError> {
            let items: Vec<_> = self.items.iter().map(|(id, name)| Item { id: *id, name }).collect();
            write_json(resp, &items).await
        }

        async fn show(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
            let id = req.subpath().trim_start_matches('/').parse::<u32>().ok();
            match id.and_then(|id| self.items.get_key_value(&id)) {
                Some((id, name)) => write_json(resp, &Item { id: *id, name }).await,
                None => {
                    resp.set_status(StatusCode::NOT_FOUND)?;
                    Ok(())
                }
            }
        }
    }

    fn router(methods: impl Into<MethodMask>) -> Router {
        Router::new().add("/item", methods, ResourceHandler::new(Items::new()))
    }

    #[tokio::test]
    async fn index_lists_all_items() {
        let resp = request(&router(MethodMask::REST), "GET", "/item").await;

        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!([{ "id": 1, "name": "First item" }, { "id": 2, "name": "Second item" }])
        );
    }

    #[tokio::test]
    async fn show_one_item() {
        let resp = request(&router(MethodMask::REST), "GET", "/item/2").await;

        assert_eq!(resp.status, 200);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body, serde_json::json!({ "id": 2, "name": "Second item" }));
        assert_eq!(resp.header("Content-Length"), Some(resp.body.len().to_string().as_str()));
    }

    #[tokio::test]
    async fn show_unknown_item() {
        let resp = request(&router(MethodMask::REST), "GET", "/item/7").await;
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn operations_left_alone_answer_501() {
        let router = router(MethodMask::ALL);

        for method in ["DELETE", "POST", "PUT", "HEAD", "OPTIONS"] {
            let resp = request(&router, method, "/item").await;
            assert_eq!(resp.status, 501, "{method}");
            assert!(resp.body.is_empty());
        }
    }

    #[tokio::test]
    async fn resource_in_nested_router() {
        let api = Router::new().add("/api/items", MethodMask::REST, ResourceHandler::new(Items::new()));
        let router = Router::new().add("/api", MethodMask::ALL, api);

        let resp = request(&router, "GET", "/api/items").await;
        assert_eq!(resp.status, 200);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let resp = request(&router, "GET", "/api/items/1").await;
        assert_eq!(resp.status, 200);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body, serde_json::json!({ "id": 1, "name": "First item" }));
    }

    #[tokio::test]
    async fn route_mask_is_checked_first() {
        let resp = request(&router(webby_http::protocol::Method::Get), "POST", "/item").await;

        assert_eq!(resp.status, 405);
        assert_eq!(resp.header("Allow"), Some("GET"));
    }
}
