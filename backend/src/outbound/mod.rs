//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **auth**: HS256 bearer token verification
//! - **balance**: reqwest client for the account balance service
//! - **cache**: Redis-backed day cache
//! - **persistence**: PostgreSQL user registry and progress ledger via Diesel
//! - **sheet**: calamine reader for the task workbook
//! - **telegram**: Bot API client delivering moderation messages
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod balance;
pub mod cache;
mod http_body;
pub mod persistence;
pub mod sheet;
pub mod telegram;
