//! avtrigger-core — shared types for the digitized AV trigger.
//!
//! Holds everything the trigger passes between its crates:
//!
//! - `event`: the inbound envelope (storage notification or topic
//!   notification) and its wire shapes
//! - `format`: the static bucket → medium lookup
//! - `request`: task launch and service scale requests
//! - `response`: orchestration results returned to the invoker
//! - `error`: the error taxonomy shared by the dispatcher and collaborators

pub mod error;
pub mod event;
pub mod format;
pub mod request;
pub mod response;

pub use error::{OrchestrationError, OrchestrationResult, TriggerError, TriggerResult};
pub use event::{InboundEvent, StorageEventKind, StorageNotification, TopicNotification};
pub use format::{Medium, medium_for_bucket};
pub use request::*;
pub use response::*;
