//! Drives handlers through a real connection over an in-memory pipe.

use tokio::io::{duplex, split, AsyncReadExt, AsyncWriteExt};
use webby_http::connection::HttpConnection;
use webby_http::handler::Handler;

/// A parsed response, as a client would receive it.
#[derive(Debug)]
pub(crate) struct TestResponse {
    pub(crate) status: u16,
    headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl TestResponse {
    fn parse(bytes: &[u8]) -> Self {
        let mut headers = [httparse::EMPTY_HEADER; 32];
        let mut response = httparse::Response::new(&mut headers);
        let httparse::Status::Complete(head_len) = response.parse(bytes).unwrap() else {
            panic!("incomplete response head: {:?}", String::from_utf8_lossy(bytes));
        };

        Self {
            status: response.code.unwrap(),
            headers: response
                .headers
                .iter()
                .map(|h| (h.name.to_owned(), String::from_utf8(h.value.to_vec()).unwrap()))
                .collect(),
            body: bytes[head_len..].to_vec(),
        }
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub(crate) fn body_text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

/// Sends `raw_request` on a fresh connection served by `handler` and returns the response.
pub(crate) async fn exchange<H: Handler + ?Sized>(handler: &H, raw_request: &str) -> TestResponse {
    let (client, server) = duplex(64 * 1024);
    let (server_read, server_write) = split(server);
    let (mut client_read, mut client_write) = split(client);

    client_write.write_all(raw_request.as_bytes()).await.unwrap();
    client_write.shutdown().await.unwrap();

    HttpConnection::new(server_read, server_write).process(handler).await.unwrap();

    let mut bytes = Vec::new();
    client_read.read_to_end(&mut bytes).await.unwrap();
    TestResponse::parse(&bytes)
}

/// Shortcut for a bodiless request line without headers.
pub(crate) async fn request<H: Handler + ?Sized>(handler: &H, method: &str, path: &str) -> TestResponse {
    exchange(handler, &format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n")).await
}
