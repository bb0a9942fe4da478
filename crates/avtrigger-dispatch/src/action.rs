//! Event classification.
//!
//! Maps an [`InboundEvent`] onto exactly one [`Action`]. Classification is
//! pure: it reads the event and the static format table, nothing else.

use serde::Serialize;
use tracing::debug;

use avtrigger_core::{
    InboundEvent, StorageNotification, TaskLaunchRequest, TopicNotification, TriggerResult,
    medium_for_bucket,
};

/// `service` attribute value sent by the validation task.
pub const VALIDATION_SERVICE: &str = "digitized_av_validation";

/// `service` attribute value sent by the QC service.
pub const QC_SERVICE: &str = "digitized_av_qc";

pub const OUTCOME_SUCCESS: &str = "SUCCESS";
pub const OUTCOME_COMPLETE: &str = "COMPLETE";

/// What the trigger will do for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// A package landed in an upload bucket: validate it.
    ObjectCreated(TaskLaunchRequest),
    /// Any other storage event.
    ObjectOtherEvent { event_name: String },
    /// A package passed validation: make sure QC is running.
    ValidationSuccess,
    /// QC approved a package: package it.
    QcSuccess(TaskLaunchRequest),
    /// QC has nothing left: stop the QC service.
    QcComplete,
    /// A topic notification no rule matches.
    Unrecognized {
        service: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        outcome: Option<String>,
    },
}

/// Decide the action for an event.
pub fn classify(event: &InboundEvent) -> TriggerResult<Action> {
    let action = match event {
        InboundEvent::Storage(n) => classify_storage(n)?,
        InboundEvent::Topic(n) => classify_topic(n)?,
    };
    debug!(source = event.source_label(), ?action, "event classified");
    Ok(action)
}

fn classify_storage(n: &StorageNotification) -> TriggerResult<Action> {
    let medium = medium_for_bucket(&n.bucket_name)?;

    if n.event_name.is_object_created() {
        return Ok(Action::ObjectCreated(TaskLaunchRequest::validation(
            medium,
            &n.bucket_name,
            &n.object_key,
        )));
    }

    Ok(Action::ObjectOtherEvent {
        event_name: n.event_name.name().to_string(),
    })
}

// Validation is checked before QC. `outcome` and the packaging attributes
// are only required once the service has matched.
fn classify_topic(n: &TopicNotification) -> TriggerResult<Action> {
    let service = n.require("service")?;

    if service == VALIDATION_SERVICE && n.require("outcome")? == OUTCOME_SUCCESS {
        return Ok(Action::ValidationSuccess);
    }

    if service == QC_SERVICE {
        match n.require("outcome")? {
            OUTCOME_SUCCESS => {
                let request = TaskLaunchRequest::packaging(
                    n.require("format")?,
                    n.require("refid")?,
                    n.require("rights_ids")?,
                );
                return Ok(Action::QcSuccess(request));
            }
            OUTCOME_COMPLETE => return Ok(Action::QcComplete),
            _ => {}
        }
    }

    Ok(Action::Unrecognized {
        service: service.to_string(),
        outcome: n.attribute("outcome").map(str::to_string),
    })
}
