pub mod ielv;
pub mod traits;

pub use ielv::IelvClient;
pub use traits::PropertySource;
