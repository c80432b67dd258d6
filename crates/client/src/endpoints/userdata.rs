//! `getuserdata` command: users and group membership.
//!
//! One call returns both `Users` (keyed by user ID) and `Groups` (group name to
//! member list). Large tenants are paged with `pagesize`/`pageindex`; `total`
//! reports the number of users across all pages.

use lastpass_config::InputType;

use crate::endpoints::enterprise::{ApiContext, post_command};
use crate::endpoints::parsing::{extract_groups, extract_object_entries, payload_container};
use crate::error::{ClientError, Result};
use crate::models::{Command, Page, UserDataQuery};

/// One `getuserdata` page.
#[derive(Debug, Default)]
pub struct UserDataPage {
    pub users: Page,
    pub groups: Page,
    /// Total users across all pages, when the API reports it.
    pub total: Option<u64>,
}

/// Fetch one page of users and groups.
pub async fn fetch_user_data(ctx: ApiContext<'_>, query: UserDataQuery) -> Result<UserDataPage> {
    let data = serde_json::to_value(query)
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode user query: {e}")))?;
    let response = post_command(ctx, Command::GetUserData, data).await?;

    let users = match payload_container(Command::GetUserData, &response.body, "Users")? {
        Some(entries) => extract_object_entries(InputType::Users, entries),
        None => Page::default(),
    };
    let groups = match payload_container(Command::GetUserData, &response.body, "Groups")? {
        Some(entries) => extract_groups(entries),
        None => Page::default(),
    };

    tracing::debug!(
        pageindex = query.pageindex,
        users = users.records.len(),
        groups = groups.records.len(),
        total = ?response.total,
        "Fetched user data page"
    );

    Ok(UserDataPage {
        users,
        groups,
        total: response.total,
    })
}
