//! LiftGuard event bus.
//!
//! In-process, topic-keyed publish/subscribe hub used to decouple the
//! ingestion pipeline from live-update delivery:
//!
//! - [`Topic`] -- the closed set of bus topics.
//! - [`EventBus`] -- handler registry with synchronous, ordered dispatch.
//! - [`BusEvent`] -- the envelope handed to every handler.

pub mod bus;
pub mod topic;

pub use bus::{BusEvent, EventBus, SubscriptionId};
pub use topic::Topic;
