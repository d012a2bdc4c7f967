//! Static file serving.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use http::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use http::StatusCode;
use mime::Mime;
use tracing::{debug, warn};
use webby_http::handler::Handler;
use webby_http::protocol::{Method, Request, Response, SendError};

const INDEX_FILE: &str = "index.html";

/// Serves the files below a root directory.
///
/// The request path is appended to the root; a path naming a directory serves
/// the `index.html` inside it. Only `GET` is allowed, and paths containing a
/// `..` segment are answered with 404 so nothing outside the root is reachable.
#[derive(Debug, Clone)]
pub struct FileHandler {
    root: PathBuf,
}

impl FileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path to a file path below the root.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let path = request_path.split_once('?').map_or(request_path, |(path, _query)| path);

        let mut resolved = self.root.clone();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                segment => resolved.push(segment),
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl Handler for FileHandler {
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        if req.method() != Method::Get {
            resp.set_status(StatusCode::METHOD_NOT_ALLOWED)?.set_header(ALLOW, Method::Get.as_str())?;
            return Ok(());
        }

        let Some(mut path) = self.resolve(req.path()) else {
            debug!(path = req.path(), "rejected path leaving the root");
            resp.set_status(StatusCode::NOT_FOUND)?;
            return Ok(());
        };

        if tokio::fs::metadata(&path).await.is_ok_and(|metadata| metadata.is_dir()) {
            path.push(INDEX_FILE);
        }

        match tokio::fs::read(&path).await {
            Ok(content) => {
                resp.set_status(StatusCode::OK)?
                    .set_header(CONTENT_LENGTH, content.len().to_string())?
                    .set_header(CONTENT_TYPE, content_type(&path).as_ref())?;
                resp.write_block(&content).await
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                debug!(path = %path.display(), "file not found");
                resp.set_status(StatusCode::NOT_FOUND)?;
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), cause = %e, "can't read file");
                resp.set_status(StatusCode::INTERNAL_SERVER_ERROR)?;
                Ok(())
            }
        }
    }
}

fn content_type(path: &Path) -> Mime {
    let extension = path.extension().and_then(|extension| extension.to_str()).map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html" | "htm") => mime::TEXT_HTML_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("js") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("json") => mime::APPLICATION_JSON,
        Some("txt") => mime::TEXT_PLAIN_UTF_8,
        Some("xml") => mime::TEXT_XML,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("svg") => mime::IMAGE_SVG,
        Some("pdf") => mime::APPLICATION_PDF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
