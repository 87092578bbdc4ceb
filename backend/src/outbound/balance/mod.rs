//! Account balance service client.

mod http_forwarder;

pub use http_forwarder::HttpBalanceForwarder;
