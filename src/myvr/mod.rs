pub mod client;
pub mod resources;
pub mod traits;

pub use client::MyVrClient;
pub use traits::{Lookup, MyVrApi, MyVrApiExt};
