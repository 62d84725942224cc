pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod myvr;
pub mod source;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;
