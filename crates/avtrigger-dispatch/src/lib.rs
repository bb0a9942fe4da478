//! avtrigger-dispatch — event classification and dispatch.
//!
//! One inbound event produces at most one orchestration write:
//!
//! ```text
//! payload ──► InboundEvent ──► classify() ──► Action ──► Dispatcher ──► DispatchOutcome
//!                                                         │
//!                                                         ├── TaskLauncher  (validation / packaging)
//!                                                         └── ServiceScaler (QC service up / down)
//! ```
//!
//! | source | condition                          | action                         |
//! |--------|------------------------------------|--------------------------------|
//! | S3     | `ObjectCreated:Put` / multipart    | launch validation task         |
//! | SNS    | `digitized_av_validation` SUCCESS  | scale QC service to 1 if idle  |
//! | SNS    | `digitized_av_qc` SUCCESS          | launch packaging task          |
//! | SNS    | `digitized_av_qc` COMPLETE         | scale QC service to 0          |
//! | any    | anything else                      | nothing to do                  |
//!
//! The dispatcher keeps no state between invocations; concurrent
//! invocations only meet at the cluster.

pub mod action;
pub mod dispatcher;
pub mod handler;

pub use action::{Action, classify};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use handler::TriggerHandler;
