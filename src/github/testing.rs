//! In-memory transport for exercising the fetcher without a network.

use super::{SearchTransport, TransportResponse};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;

pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<TransportResponse>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<TransportResponse>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn ok(status: u16, body: &str) -> Result<TransportResponse> {
        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }

    /// Queries seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl SearchTransport for &ScriptedTransport {
    async fn search(&self, query: &str) -> Result<TransportResponse> {
        self.calls.borrow_mut().push(query.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response left")))
    }
}
