//! Trust oracle adapters.

mod relay_http;
mod static_set;

pub use relay_http::{RelayHttpTrustOracle, RelayTrustConfig};
pub use static_set::StaticTrustOracle;
