//! In-memory MyVR stand-in for synchronizer tests

use crate::error::ApiError;
use crate::myvr::MyVrApi;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    properties: Vec<Value>,
    collections: BTreeMap<String, Vec<Value>>,
    next_key: usize,
    calls: Vec<Call>,
    failures: Vec<(&'static str, String, u16)>,
}

impl State {
    fn new_key(&mut self, resource: &str) -> String {
        self.next_key += 1;
        format!("{}-{}", resource, self.next_key)
    }

    fn items(&mut self, resource: &str) -> &mut Vec<Value> {
        self.collections.entry(resource.to_string()).or_default()
    }
}

/// Keeps MyVR collections in memory and records every call
#[derive(Default)]
pub struct FakeMyVr {
    state: Mutex<State>,
}

fn not_found(path: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        path: path.to_string(),
        body: "Not Found".to_string(),
    }
}

/// `/rooms/key/?property=x` -> (["rooms", "key"], {"property": "x"})
fn split_path(path: &str) -> (Vec<String>, BTreeMap<String, String>) {
    let (route, query) = path.split_once('?').unwrap_or((path, ""));
    let segments = route
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let params = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    (segments, params)
}

impl FakeMyVr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collection item and return its key
    pub fn seed(&self, resource: &str, mut item: Value) -> String {
        let mut state = self.state.lock().unwrap();
        let key = state.new_key(resource);
        item["key"] = json!(key.clone());
        state.items(resource).push(item);
        key
    }

    pub fn seed_property(&self, property: Value) {
        self.state.lock().unwrap().properties.push(property);
    }

    /// Answer every matching call with the given status
    pub fn fail(&self, method: &'static str, path_prefix: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((method, path_prefix.to_string(), status));
    }

    pub fn property(&self, external_id: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .properties
            .iter()
            .find(|p| p["externalId"] == external_id)
            .cloned()
    }

    pub fn collection(&self, resource: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, method: &str, path_prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.path.starts_with(path_prefix))
            .count()
    }

    fn handle(&self, method: &'static str, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            method,
            path: path.to_string(),
            body: body.clone(),
        });

        if let Some((_, _, status)) = state
            .failures
            .iter()
            .find(|(m, prefix, _)| *m == method && path.starts_with(prefix.as_str()))
        {
            return Err(ApiError::Status {
                status: *status,
                path: path.to_string(),
                body: "injected failure".to_string(),
            });
        }

        let (segments, params) = split_path(path);
        let resource = segments.first().cloned().unwrap_or_default();
        let key = segments.get(1).cloned();

        if resource == "properties" {
            return match (method, key) {
                ("GET", Some(id)) => state
                    .properties
                    .iter()
                    .find(|p| p["externalId"] == id.as_str())
                    .cloned()
                    .ok_or_else(|| not_found(path)),
                ("POST", None) => {
                    let body = body.unwrap_or_default();
                    state.properties.push(body.clone());
                    Ok(body)
                }
                ("PUT", Some(id)) => {
                    let existing = state
                        .properties
                        .iter_mut()
                        .find(|p| p["externalId"] == id.as_str())
                        .ok_or_else(|| not_found(path))?;
                    *existing = body.unwrap_or_default();
                    Ok(existing.clone())
                }
                _ => Err(not_found(path)),
            };
        }

        match (method, key) {
            ("GET", None) => {
                let limit = params
                    .get("limit")
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(usize::MAX);
                let property = params.get("property").cloned().unwrap_or_default();
                let results: Vec<Value> = state
                    .items(&resource)
                    .iter()
                    .filter(|item| item["property"] == property.as_str())
                    .take(limit)
                    .cloned()
                    .collect();
                Ok(json!({ "results": results }))
            }
            ("GET", Some(key)) => state
                .items(&resource)
                .iter()
                .find(|item| item["key"] == key.as_str())
                .cloned()
                .ok_or_else(|| not_found(path)),
            ("POST", None) => {
                let mut item = body.unwrap_or_default();
                let key = state.new_key(&resource);
                item["key"] = json!(key);
                if resource == "photos" && item.get("downloadUrl").is_none() {
                    item["downloadUrl"] = item["sourceUrl"].clone();
                }
                state.items(&resource).push(item.clone());
                Ok(item)
            }
            ("PUT", Some(key)) => {
                let existing = state
                    .items(&resource)
                    .iter_mut()
                    .find(|item| item["key"] == key.as_str())
                    .ok_or_else(|| not_found(path))?;
                let mut replacement = body.unwrap_or_default();
                replacement["key"] = json!(key);
                *existing = replacement;
                Ok(existing.clone())
            }
            ("DELETE", Some(key)) => {
                let items = state.items(&resource);
                let before = items.len();
                items.retain(|item| item["key"] != key.as_str());
                if items.len() == before {
                    Err(not_found(path))
                } else {
                    Ok(Value::Null)
                }
            }
            _ => Err(not_found(path)),
        }
    }
}

#[async_trait]
impl MyVrApi for FakeMyVr {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.handle("GET", path, None)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.handle("POST", path, Some(body))
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.handle("PUT", path, Some(body))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.handle("DELETE", path, None).map(|_| ())
    }
}
