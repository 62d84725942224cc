use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Outcome of probing for a single destination resource
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

/// One-resource-at-a-time CRUD access to the MyVR REST API.
/// Paths are relative to the API base URL and keep their trailing slash.
#[async_trait]
pub trait MyVrApi: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str) -> Result<(), ApiError>;
}

/// Typed helpers layered over the raw JSON calls
#[async_trait]
pub trait MyVrApiExt: MyVrApi {
    async fn get_as<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get(path).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// GET that maps HTTP 404 to `Lookup::NotFound`
    async fn lookup<T: DeserializeOwned + Send>(&self, path: &str) -> Result<Lookup<T>, ApiError> {
        match self.get_as(path).await {
            Ok(found) => Ok(Lookup::Found(found)),
            Err(e) if e.is_not_found() => Ok(Lookup::NotFound),
            Err(e) => Err(e),
        }
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.post(path, encode(path, body)?).await
    }

    async fn put_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.put(path, encode(path, body)?).await
    }
}

impl<A: MyVrApi + ?Sized> MyVrApiExt for A {}

fn encode<B: Serialize>(path: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
