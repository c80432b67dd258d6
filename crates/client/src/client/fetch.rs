//! The `fetch` operation: one input type, one collection range.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lastpass_config::{Credential, InputType};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::LastPassClient;
use crate::client::pagination::Paginator;
use crate::client::windows::{plan_windows, resolve_start};
use crate::error::{ClientError, Result};
use crate::models::{CursorPosition, FetchBatch, FetchCursor, MalformedRecord, Page, RawRecord};

#[derive(Default)]
struct Accumulator {
    records: Vec<RawRecord>,
    malformed: Vec<MalformedRecord>,
    group_index: HashMap<String, usize>,
}

impl Accumulator {
    fn push_page(&mut self, page: Page) {
        self.records.extend(page.records);
        self.malformed.extend(page.malformed);
    }

    /// Groups can repeat across `getuserdata` pages; members are merged.
    fn push_group_page(&mut self, page: Page) {
        for record in page.records {
            match self.group_index.get(&record.record_id) {
                Some(&idx) => merge_members(&mut self.records[idx], &record),
                None => {
                    self.group_index
                        .insert(record.record_id.clone(), self.records.len());
                    self.records.push(record);
                }
            }
        }
        self.malformed.extend(page.malformed);
    }
}

fn merge_members(existing: &mut RawRecord, incoming: &RawRecord) {
    let Some(Value::Array(new_members)) = incoming.fields.get("members") else {
        return;
    };
    match existing.fields.get_mut("members") {
        Some(Value::Array(members)) => {
            for member in new_members {
                if !members.contains(member) {
                    members.push(member.clone());
                }
            }
        }
        _ => {
            existing
                .fields
                .insert("members".to_string(), Value::Array(new_members.clone()));
        }
    }
}

impl LastPassClient {
    /// Fetch every record of `input` that is due after `cursor`.
    ///
    /// Events are queried window by window from the cursor (or the configured
    /// start) up to `now`; snapshot inputs are fetched in full. `cancel_check`
    /// is consulted before every window and page.
    ///
    /// The returned `next_cursor` records the queried range. For snapshot
    /// inputs its position is `now`; for events it keeps the stored position
    /// and the caller advances it from the records it actually emitted.
    ///
    /// # Errors
    ///
    /// - `ClientError::Cancelled` when `cancel_check` returns true.
    /// - `ClientError::PageLimitExceeded` when a window needs more than `max_pages` pages.
    /// - Any request, auth, or response error. No partial batch is returned.
    pub async fn fetch<F>(
        &self,
        input: InputType,
        cursor: &FetchCursor,
        credential: &Credential,
        now: DateTime<Utc>,
        cancel_check: &F,
    ) -> Result<FetchBatch>
    where
        F: Fn() -> bool + Sync + ?Sized,
    {
        let ctx = self.context(credential);
        let mut acc = Accumulator::default();
        let mut pages = 0;

        let next_cursor = if input.is_snapshot() {
            let mut paginator = Paginator::snapshot(ctx, input, self.page_size, self.max_pages);
            loop {
                if cancel_check() {
                    return Err(ClientError::Cancelled);
                }
                match paginator.next_page().await? {
                    Some(page) if input == InputType::Groups => acc.push_group_page(page),
                    Some(page) => acc.push_page(page),
                    None => break,
                }
            }
            pages += paginator.pages();

            FetchCursor {
                input_type: input,
                last_seen: Some(CursorPosition::Timestamp(now)),
                window_start: cursor.last_timestamp(),
                window_end: Some(now),
                updated_at: Some(now),
            }
        } else {
            let start = resolve_start(cursor, self.time_start, now);
            let windows = plan_windows(start, now);
            debug!(
                input = input.as_str(),
                window_start = %start,
                windows = windows.len(),
                "Planned reporting windows"
            );

            for window in &windows {
                let mut paginator =
                    Paginator::events(ctx, *window, self.utc_offset, self.max_pages);
                loop {
                    if cancel_check() {
                        return Err(ClientError::Cancelled);
                    }
                    match paginator.next_page().await? {
                        Some(page) => acc.push_page(page),
                        None => break,
                    }
                }
                pages += paginator.pages();
            }

            FetchCursor {
                input_type: input,
                last_seen: cursor.last_seen.clone(),
                window_start: Some(start),
                window_end: Some(now),
                updated_at: Some(now),
            }
        };

        info!(
            input = input.as_str(),
            records = acc.records.len(),
            malformed = acc.malformed.len(),
            pages,
            "Fetch complete"
        );

        Ok(FetchBatch {
            records: acc.records,
            malformed: acc.malformed,
            next_cursor,
            pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(name: &str, members: Value) -> RawRecord {
        let Value::Object(fields) = json!({"groupname": name, "members": members}) else {
            unreachable!()
        };
        RawRecord::new(InputType::Groups, name, fields)
    }

    #[test]
    fn test_groups_merge_across_pages() {
        let mut acc = Accumulator::default();
        acc.push_group_page(Page {
            records: vec![group("Finance", json!(["a@example.com"]))],
            malformed: vec![],
        });
        acc.push_group_page(Page {
            records: vec![
                group("Finance", json!(["a@example.com", "b@example.com"])),
                group("Ops", json!([])),
            ],
            malformed: vec![],
        });

        assert_eq!(acc.records.len(), 2);
        assert_eq!(
            acc.records[0].fields["members"],
            json!(["a@example.com", "b@example.com"])
        );
    }
}
