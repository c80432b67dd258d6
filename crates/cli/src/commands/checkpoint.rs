//! Checkpoint command: inspect and reset stored cursors.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use lastpass_config::{Config, InputType};
use lastpass_connector::{CheckpointState, CheckpointTracker};

use crate::args::CheckpointCommand;

pub fn run(config: &Config, command: CheckpointCommand) -> Result<()> {
    let tracker = CheckpointTracker::file(&config.checkpoint_dir);
    match command {
        CheckpointCommand::Show { input } => {
            let inputs = match input {
                Some(input) => vec![input],
                None => InputType::ALL.to_vec(),
            };
            println!("{}", render(&tracker, &inputs)?);
        }
        CheckpointCommand::Reset { input, all } => {
            let inputs = match (input, all) {
                (_, true) => InputType::ALL.to_vec(),
                (Some(input), false) => vec![input],
                (None, false) => anyhow::bail!("Specify an input type or --all"),
            };
            for input in inputs {
                let existed = tracker
                    .reset(input)
                    .with_context(|| format!("Failed to reset checkpoint for {input}"))?;
                if existed {
                    println!("Reset checkpoint for {input}");
                } else {
                    println!("No checkpoint stored for {input}");
                }
            }
        }
    }
    Ok(())
}

/// Pretty JSON object keyed by input name.
fn render(tracker: &CheckpointTracker, inputs: &[InputType]) -> Result<String> {
    let mut states: BTreeMap<&'static str, CheckpointState> = BTreeMap::new();
    for input in inputs {
        let state = tracker
            .inspect(*input)
            .with_context(|| format!("Failed to read checkpoint for {input}"))?;
        states.insert(input.as_str(), state);
    }
    Ok(serde_json::to_string_pretty(&states)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lastpass_client::{CursorPosition, FetchCursor};

    #[test]
    fn test_render_reports_each_state() {
        let tracker = CheckpointTracker::in_memory();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        tracker
            .advance(
                InputType::Events,
                &FetchCursor {
                    last_seen: Some(CursorPosition::Timestamp(ts)),
                    ..FetchCursor::empty(InputType::Events)
                },
            )
            .unwrap();

        let rendered = render(&tracker, &[InputType::Events, InputType::Users]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["events"]["state"], "current");
        assert_eq!(value["events"]["cursor"]["input_type"], "events");
        assert_eq!(value["users"]["state"], "missing");
    }
}
