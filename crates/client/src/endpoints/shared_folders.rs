//! `getsfdata` command: shared folders and their ACLs.
//!
//! The response has no payload container: the top-level object maps shared
//! folder IDs to folder objects.

use lastpass_config::InputType;
use serde_json::json;

use crate::endpoints::enterprise::{ApiContext, post_command};
use crate::endpoints::parsing::extract_object_entries;
use crate::error::Result;
use crate::models::{Command, Page};

/// Fetch every shared folder in one call.
pub async fn fetch_shared_folders(ctx: ApiContext<'_>) -> Result<Page> {
    let response = post_command(ctx, Command::GetSharedFolderData, json!({})).await?;
    let page = extract_object_entries(InputType::SharedFolders, &response.body);
    tracing::debug!(
        folders = page.records.len(),
        malformed = page.malformed.len(),
        "Fetched shared folders"
    );
    Ok(page)
}
