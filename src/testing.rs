//! In-memory [`RestBackend`] for tests.
//!
//! Stores records per collection path, assigns `_id`s on POST, honours the
//! `q=name=<value>` filter and records every call in order.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{HttpError, Result, SyncError};
use crate::http::RestBackend;

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct State {
    collections: BTreeMap<String, Vec<Value>>,
    documents: BTreeMap<String, Value>,
    failures: Vec<(String, String)>,
    calls: Vec<Call>,
    next_id: u64,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record into a collection. Records without `_id` get one.
    pub fn with_record(self, collection: &str, record: Value) -> Self {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            let record = state.assign_id(record);
            state
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(record);
        }
        self
    }

    /// Serves a fixed document for GETs on `path`.
    pub fn with_document(self, path: &str, document: Value) -> Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .documents
            .insert(path.to_string(), document);
        self
    }

    /// Makes `method path` answer with a 500.
    pub fn failing(self, method: &str, path: &str) -> Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .failures
            .push((method.to_string(), path.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().expect("lock poisoned").calls.clone()
    }

    pub fn calls_with_method(&self, method: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    /// Mutating calls only, rendered as `METHOD path`.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != "GET")
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    /// Names currently stored in a collection.
    pub fn names(&self, collection: &str) -> Vec<String> {
        self.state
            .lock()
            .expect("lock poisoned")
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|r| r["name"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Looks up a stored record by collection and name.
    pub fn record(&self, collection: &str, name: &str) -> Option<Value> {
        self.state
            .lock()
            .expect("lock poisoned")
            .collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| r["name"] == name).cloned())
    }

    fn begin(&self, method: &str, path: &str, query: Option<String>, body: Option<&Value>) -> Result<()> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.calls.push(Call {
            method: method.to_string(),
            path: path.to_string(),
            query,
            body: body.cloned(),
        });

        if state.failures.iter().any(|(m, p)| m == method && p == path) {
            return Err(SyncError::Http(HttpError::Status {
                method: method.to_string(),
                url: path.to_string(),
                status: 500,
                body: String::from("injected failure"),
            }));
        }
        Ok(())
    }
}

impl State {
    fn assign_id(&mut self, record: Value) -> Value {
        let mut object = match record {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        if !object.contains_key("_id") {
            self.next_id += 1;
            object.insert(String::from("_id"), Value::String(format!("id-{}", self.next_id)));
        }
        Value::Object(object)
    }

    fn split_item_path<'a>(&self, path: &'a str) -> Option<(String, &'a str)> {
        self.collections
            .keys()
            .find(|collection| path.starts_with(collection.as_str()) && path.len() > collection.len())
            .map(|collection| (collection.clone(), &path[collection.len()..]))
    }
}

fn not_found(method: &str, path: &str) -> SyncError {
    SyncError::Http(HttpError::Status {
        method: method.to_string(),
        url: path.to_string(),
        status: 404,
        body: String::from("not found"),
    })
}

#[async_trait]
impl RestBackend for FakeBackend {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let rendered = (!query.is_empty()).then(|| {
            query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&")
        });
        self.begin("GET", path, rendered, None)?;

        let state = self.state.lock().expect("lock poisoned");
        if let Some(document) = state.documents.get(path) {
            return Ok(document.clone());
        }

        let name_filter = query
            .iter()
            .find(|(k, _)| *k == "q")
            .and_then(|(_, v)| v.strip_prefix("name="));

        let records = state
            .collections
            .get(path)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| name_filter.is_none_or(|name| r["name"] == name))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Value::Array(records))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.begin("POST", path, None, Some(body))?;

        let mut state = self.state.lock().expect("lock poisoned");
        let record = state.assign_id(body.clone());
        state
            .collections
            .entry(path.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.begin("PUT", path, None, Some(body))?;

        let mut state = self.state.lock().expect("lock poisoned");
        let (collection, id) = state.split_item_path(path).ok_or_else(|| not_found("PUT", path))?;
        let records = state.collections.entry(collection).or_default();
        let record = records
            .iter_mut()
            .find(|r| r["_id"] == id)
            .ok_or_else(|| not_found("PUT", path))?;

        if let (Value::Object(target), Value::Object(fields)) = (record, body) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(body.clone())
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.begin("DELETE", path, None, None)?;

        let mut state = self.state.lock().expect("lock poisoned");
        let (collection, id) = state
            .split_item_path(path)
            .ok_or_else(|| not_found("DELETE", path))?;
        let records = state.collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| r["_id"] != id);

        if records.len() == before {
            return Err(not_found("DELETE", path));
        }
        Ok(Value::Null)
    }
}
