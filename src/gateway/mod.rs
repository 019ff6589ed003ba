//! Gateway Module
//!
//! Fetch-or-serve arbitration: cache lookup, quota gate, upstream fetch and
//! envelope sealing for one logical request.

mod coordinator;
mod fetcher;
mod key;
mod state;

pub use coordinator::RequestCoordinator;
pub use fetcher::Fetcher;
pub use key::{CacheKey, RequestIdentity};
pub use state::GatewayState;
