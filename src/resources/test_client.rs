//! Canned HTTP client shared by the resource tests.

use std::sync::Mutex;

use serde_json::Value;

use crate::time::InstantSleeper;
use crate::transport::{Credential, HttpClient, HttpError, HttpRequest, HttpResponse, Transport};

/// Answers every request with the same status and JSON body and records
/// what was sent.
#[derive(Debug)]
pub struct CannedClient {
    status: u16,
    body: Value,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedClient {
    pub fn ok(body: Value) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl HttpClient for CannedClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        Ok(HttpResponse::new(
            http::StatusCode::from_u16(self.status).unwrap(),
            http::HeaderMap::new(),
            self.body.to_string().into_bytes(),
        ))
    }
}

pub fn transport(client: CannedClient, credential: &Credential) -> Transport<CannedClient, InstantSleeper> {
    let base = url::Url::parse("https://api.payzcore.com").unwrap();
    Transport::new(client, &base, credential)
        .unwrap()
        .with_sleeper(InstantSleeper)
}

/// The single request the client received.
pub fn sent(transport: &Transport<CannedClient, InstantSleeper>) -> HttpRequest {
    let requests = transport.client().requests.lock().unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].clone()
}

/// The JSON body of `request`.
pub fn body_of(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
}

/// Number of requests the client received.
pub fn request_count(transport: &Transport<CannedClient, InstantSleeper>) -> usize {
    transport.client().requests.lock().unwrap().len()
}
