//! Helpers shared by the unit tests of this crate.

use tokio::io::{duplex, AsyncReadExt, DuplexStream};

use crate::protocol::Response;

const PIPE_CAPACITY: usize = 64 * 1024;

/// A response whose connection is an in-memory pipe, plus the peer end of that pipe.
pub(crate) fn response_pair() -> (Response, DuplexStream) {
    let (client, server) = duplex(PIPE_CAPACITY);
    (Response::new(server), client)
}

pub(crate) async fn read_to_end(mut client: DuplexStream) -> Vec<u8> {
    let mut bytes = Vec::new();
    client.read_to_end(&mut bytes).await.unwrap();
    bytes
}

/// A response as seen by the client, split into its parts.
#[derive(Debug)]
pub(crate) struct RawResponse {
    status_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    pub(crate) fn parse(bytes: &[u8]) -> Self {
        let head_end = bytes.windows(4).position(|window| window == b"\r\n\r\n").expect("response head must end with a blank line");
        let head = std::str::from_utf8(&bytes[..head_end]).unwrap();

        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_owned();
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(": ").expect("header line must contain `: `");
                (name.to_owned(), value.to_owned())
            })
            .collect();

        Self { status_line, headers, body: bytes[head_end + 4..].to_vec() }
    }

    pub(crate) fn status_line(&self) -> &str {
        &self.status_line
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub(crate) fn header_count(&self, name: &str) -> usize {
        self.headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case(name)).count()
    }

    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }
}
