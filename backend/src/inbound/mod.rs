//! Inbound adapters that translate external requests into domain calls while
//! keeping framework details at the edge.
//!
//! Only HTTP is exposed today; see [`http`].

pub mod http;
