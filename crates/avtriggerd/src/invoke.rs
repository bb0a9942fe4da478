//! Local single-event invocation.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use avtrigger_core::InboundEvent;
use avtrigger_dispatch::classify;

use crate::runtime;
use crate::settings::Settings;

pub async fn invoke(settings: &Settings, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let payload = load_event(path)?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&plan(&payload)?)?);
        return Ok(());
    }

    let handler = runtime::build_handler(settings).await;
    let reply = handler.handle(&payload).await?;
    println!("{reply}");
    Ok(())
}

fn load_event(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("event file {} is not valid JSON", path.display()))
}

/// The action an event would trigger, without running it.
fn plan(payload: &Value) -> anyhow::Result<Value> {
    let event = InboundEvent::from_value(payload)?;
    let action = classify(&event)?;
    Ok(serde_json::to_value(&action)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_event(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_event_reads_json() {
        let file = write_event(r#"{ "Records": [] }"#);
        assert_eq!(load_event(file.path()).unwrap(), json!({ "Records": [] }));
    }

    #[test]
    fn load_event_rejects_bad_input() {
        let file = write_event("Records: []");
        assert!(load_event(file.path()).is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(load_event(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn plan_describes_scale_down() {
        let payload = json!({
            "Records": [{
                "Sns": {
                    "MessageAttributes": {
                        "service": { "Type": "String", "Value": "digitized_av_qc" },
                        "outcome": { "Type": "String", "Value": "COMPLETE" }
                    }
                }
            }]
        });
        assert_eq!(plan(&payload).unwrap(), json!({ "action": "qc_complete" }));
    }

    #[test]
    fn plan_describes_validation_launch() {
        let payload = json!({
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "rac-prod-av-upload-audio" },
                    "object": { "key": "pkg.tar.gz" }
                }
            }]
        });
        let planned = plan(&payload).unwrap();
        assert_eq!(planned["action"], "object_created");
        assert_eq!(planned["taskDefinition"], "digitized_av_validation");
        assert_eq!(
            planned["environment"][0],
            json!({ "name": "FORMAT", "value": "audio" })
        );
    }

    #[test]
    fn plan_surfaces_classification_errors() {
        assert!(plan(&json!({ "Records": [] })).is_err());
    }
}
