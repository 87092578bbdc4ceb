//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod balance_forwarder;
mod day_cache;
mod moderation_notifier;
mod progress_ledger;
mod task_board;
mod task_sheet;
mod token_verifier;
mod user_registry;

#[cfg(test)]
pub use balance_forwarder::MockBalanceForwarder;
pub use balance_forwarder::{BalanceForwarder, BalanceForwarderError};
#[cfg(test)]
pub use day_cache::MockDayCache;
pub use day_cache::{DayCache, DayCacheError, FixtureDayCache};
#[cfg(test)]
pub use moderation_notifier::MockModerationNotifier;
pub use moderation_notifier::{ModerationNotifier, ModerationNotifierError};
#[cfg(test)]
pub use progress_ledger::MockProgressLedger;
pub use progress_ledger::{ProgressLedger, ProgressLedgerError};
#[cfg(test)]
pub use task_board::MockTaskBoard;
pub use task_board::{ModerationAck, TaskBoard};
#[cfg(test)]
pub use task_sheet::MockTaskSheet;
pub use task_sheet::{TaskSheet, TaskSheetError};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerifier, TokenVerifierError};
#[cfg(test)]
pub use user_registry::MockUserRegistry;
pub use user_registry::{UserRegistry, UserRegistryError};
