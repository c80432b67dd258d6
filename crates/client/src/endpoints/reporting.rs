//! `reporting` command: admin and user activity events.

use lastpass_config::InputType;

use crate::endpoints::enterprise::{ApiContext, post_command};
use crate::endpoints::parsing::{extract_object_entries, payload_container};
use crate::error::{ClientError, Result};
use crate::models::{Command, Page, ReportingQuery};

/// One page of reporting events and the token for the next page.
#[derive(Debug, Default)]
pub struct ReportingPage {
    pub page: Page,
    pub next: Option<String>,
}

/// Fetch one page of events for `query`.
///
/// Events live under `data`, keyed `Event1..EventN` with `Event1` the latest.
pub async fn fetch_events(ctx: ApiContext<'_>, query: &ReportingQuery) -> Result<ReportingPage> {
    let data = serde_json::to_value(query)
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode reporting query: {e}")))?;
    let response = post_command(ctx, Command::Reporting, data).await?;

    let page = match payload_container(Command::Reporting, &response.body, "data")? {
        Some(entries) => extract_object_entries(InputType::Events, entries),
        None => Page::default(),
    };

    tracing::debug!(
        records = page.records.len(),
        malformed = page.malformed.len(),
        has_next = response.next.is_some(),
        "Fetched reporting page"
    );

    Ok(ReportingPage {
        page,
        next: response.next,
    })
}
