//! Pull-based pagination over enterprise API commands.
//!
//! A [`Paginator`] is created for one input type and (for events) one
//! window. Each [`Paginator::next_page`] call issues at most one request.
//! It is finite: it stops when the vendor signals the end, and fails with
//! `PageLimitExceeded` rather than issuing more than `max_pages` requests
//! when the vendor keeps signalling more. It cannot be restarted.

use lastpass_config::InputType;

use crate::client::windows::TimeWindow;
use crate::endpoints::{self, ApiContext};
use crate::error::{ClientError, Result};
use crate::models::{Command, Page, ReportingQuery, UserDataQuery};

#[derive(Debug)]
enum PageState {
    Reporting { from: String, to: String, next: Option<String> },
    UserData { pageindex: usize, seen: u64 },
    SharedFolders,
    Done,
}

/// Lazily fetches the pages of one query.
pub struct Paginator<'a> {
    ctx: ApiContext<'a>,
    input: InputType,
    page_size: usize,
    max_pages: usize,
    pages: usize,
    state: PageState,
}

impl<'a> Paginator<'a> {
    /// Paginator over reporting events for one window.
    pub fn events(
        ctx: ApiContext<'a>,
        window: TimeWindow,
        offset: chrono::FixedOffset,
        max_pages: usize,
    ) -> Self {
        let (from, to) = window.vendor_bounds(offset);
        Self {
            ctx,
            input: InputType::Events,
            page_size: 0,
            max_pages,
            pages: 0,
            state: PageState::Reporting { from, to, next: None },
        }
    }

    /// Paginator over a snapshot input (`users`, `groups`, `shared_folders`).
    pub fn snapshot(ctx: ApiContext<'a>, input: InputType, page_size: usize, max_pages: usize) -> Self {
        let state = match input {
            InputType::SharedFolders => PageState::SharedFolders,
            _ => PageState::UserData { pageindex: 0, seen: 0 },
        };
        Self {
            ctx,
            input,
            page_size,
            max_pages,
            pages: 0,
            state,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page, or `None` once the query is exhausted.
    ///
    /// # Errors
    ///
    /// - `ClientError::PageLimitExceeded` when another page is due after `max_pages`.
    /// - Any error from the underlying command.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if matches!(self.state, PageState::Done) {
            return Ok(None);
        }
        if self.pages >= self.max_pages {
            return Err(ClientError::PageLimitExceeded {
                command: Command::for_input(self.input).as_str(),
                max_pages: self.max_pages,
            });
        }

        let state = std::mem::replace(&mut self.state, PageState::Done);
        let page = match state {
            PageState::Reporting { from, to, next } => {
                let query = ReportingQuery::new(from.clone(), to.clone(), next);
                let result = endpoints::fetch_events(self.ctx, &query).await?;
                if let Some(token) = result.next {
                    self.state = PageState::Reporting { from, to, next: Some(token) };
                }
                result.page
            }
            PageState::UserData { pageindex, seen } => {
                let query = UserDataQuery {
                    pagesize: self.page_size,
                    pageindex,
                };
                let result = endpoints::fetch_user_data(self.ctx, query).await?;
                let page_users = (result.users.records.len() + result.users.malformed.len()) as u64;
                let seen = seen + page_users;
                // Without a total the command is not paged.
                let more = page_users > 0 && result.total.is_some_and(|total| seen < total);
                if more {
                    self.state = PageState::UserData {
                        pageindex: pageindex + 1,
                        seen,
                    };
                }
                if self.input == InputType::Groups {
                    result.groups
                } else {
                    result.users
                }
            }
            PageState::SharedFolders => endpoints::fetch_shared_folders(self.ctx).await?,
            PageState::Done => return Ok(None),
        };

        self.pages += 1;
        Ok(Some(page))
    }
}
