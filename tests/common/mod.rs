//! In-memory transport that answers from canned routes and records every call.
#![allow(dead_code)]

use countriesnow_rs::{Error, Method, Result, Transport};
use serde_json::Value;
use std::sync::Mutex;

struct Route {
    method: Method,
    path: String,
    body: Option<Value>,
    response: Result<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(mut self, path: &str, response: Value) -> Self {
        self.routes.push(Route {
            method: Method::Get,
            path: path.into(),
            body: None,
            response: Ok(response),
        });
        self
    }

    pub fn post(mut self, path: &str, body: Value, response: Value) -> Self {
        self.routes.push(Route {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            response: Ok(response),
        });
        self
    }

    pub fn fail(mut self, method: Method, path: &str, error: Error) -> Self {
        self.routes.push(Route {
            method,
            path: path.into(),
            body: None,
            response: Err(error),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn fetch(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        self.routes
            .iter()
            .find(|r| {
                r.method == method
                    && r.path == path
                    && (r.body.is_none() || r.body.as_ref() == body)
            })
            .map(|r| r.response.clone())
            .unwrap_or_else(|| {
                Err(Error::Transport {
                    method: method.as_str(),
                    url: path.to_string(),
                    reason: "request failed with HTTP 404 Not Found".into(),
                })
            })
    }
}

pub fn ok(data: Value) -> Value {
    serde_json::json!({ "error": false, "msg": "ok", "data": data })
}
