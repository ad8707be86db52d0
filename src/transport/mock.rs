//! In-memory transport that replays queued replies.

use super::{GatewayRequest, Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

type Reply = Result<TransportResponse, TransportError>;

/// Replays replies in the order they were queued and records every request.
///
/// A call with nothing queued fails with [`TransportError::Request`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP 200 reply with a JSON body.
    pub fn push_json(&self, body: serde_json::Value) -> &Self {
        self.push_reply(TransportResponse::new(200, body.to_string()))
    }

    pub fn push_reply(&self, reply: TransportResponse) -> &Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    pub fn push_error(&self, error: TransportError) -> &Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn pending_replies(&self) -> usize {
        lock(&self.replies).len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, request: &GatewayRequest) -> Result<TransportResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::request("no scripted reply queued")))
    }
}
