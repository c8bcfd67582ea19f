//! Request and response values exchanged between the host and the manager.
//!
//! Bodies are opaque: the manager stores and replays them byte for byte.

pub mod request;
pub mod response;

pub use request::{Request, RequestKey};
pub use response::Response;
