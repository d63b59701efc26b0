//! Google Calendar incremental sync.
//!
//! - `PagedFetcher` follows `nextPageToken` cursors over a list endpoint,
//!   refreshing the bearer token on 401.
//! - `CalendarListSync` and `EventListSync` classify fetched items into
//!   deletions and upserts. Event sync falls back to a full fetch when the
//!   remote answers 410 to an incremental request.
//! - `convert` maps remote JSON to `calsync_core` types and back.
//! - `RemoteMutator` pushes local creates, updates and deletes.
//!
//! Every component takes its `TokenSource` explicitly through `GoogleClient`.

pub mod calendars;
pub mod client;
pub mod convert;
pub mod error;
pub mod events;
pub mod fetch;
pub mod mutate;
pub mod session;
pub mod token;

#[cfg(test)]
mod testing;

pub use calendars::CalendarListSync;
pub use client::GoogleClient;
pub use error::{GoogleError, GoogleResult};
pub use events::EventListSync;
pub use fetch::PagedFetcher;
pub use mutate::RemoteMutator;
pub use session::SessionTokenSource;
pub use token::TokenSource;
