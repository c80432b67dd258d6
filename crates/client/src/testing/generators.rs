//! Test data generators using the fake crate.
//!
//! Provides configurable generators for realistic LastPass Enterprise API
//! payloads: reporting pages, user/group directories, and shared folders.
//! Timestamps are deterministic so tests can assert on cursor positions;
//! names, addresses and free text are random.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use fake::Fake;
use fake::faker::internet::en::{IPv4, SafeEmail};
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use lastpass_config::constants::LASTPASS_TIME_FORMAT;
use serde_json::{Map, Value, json};

const ACTIONS: [&str; 8] = [
    "Login",
    "Log off",
    "Failed Login Attempt",
    "Open Secure Note",
    "Edit Site",
    "Shared Folder Created",
    "Employee Account Created",
    "Change Master Password",
];

fn pick<'a>(items: &[&'a str]) -> &'a str {
    items[(0..items.len()).fake::<usize>()]
}

// =============================================================================
// Reporting Events Generator
// =============================================================================

/// Generates `reporting` responses.
///
/// Event `i` (0-based, oldest first) is stamped `start + i * step`. Keys
/// follow the vendor convention: `Event1` is the latest event of the page.
///
/// # Example
/// ```ignore
/// use lastpass_client::testing::generators::ReportingEventGenerator;
///
/// let page = ReportingEventGenerator::new()
///     .with_count(100)
///     .with_start(start)
///     .generate_response(Some("page-2"));
/// ```
#[derive(Debug, Clone)]
pub struct ReportingEventGenerator {
    count: usize,
    start: DateTime<Utc>,
    step: ChronoDuration,
    bad_timestamps: Vec<usize>,
}

impl Default for ReportingEventGenerator {
    fn default() -> Self {
        Self {
            count: 10,
            start: Utc
                .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            step: ChronoDuration::seconds(60),
            bad_timestamps: Vec::new(),
        }
    }
}

impl ReportingEventGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Timestamp of the oldest event.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Gap between consecutive events.
    pub fn with_step(mut self, step: ChronoDuration) -> Self {
        self.step = step;
        self
    }

    /// Replace the `Time` of the events at these 0-based positions with garbage.
    pub fn with_bad_timestamps(mut self, positions: Vec<usize>) -> Self {
        self.bad_timestamps = positions;
        self
    }

    /// Timestamp of event `i` (0-based, oldest first).
    pub fn timestamp_of(&self, i: usize) -> DateTime<Utc> {
        self.start + self.step * i as i32
    }

    /// Timestamp of the newest event, if any.
    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.count.checked_sub(1).map(|i| self.timestamp_of(i))
    }

    /// The `data` object: `Event1..EventN` keyed, newest first.
    pub fn generate_events(&self) -> Map<String, Value> {
        let mut data = Map::new();
        for i in 0..self.count {
            let time = if self.bad_timestamps.contains(&i) {
                "not a timestamp".to_string()
            } else {
                self.timestamp_of(i).format(LASTPASS_TIME_FORMAT).to_string()
            };
            let key = format!("Event{}", self.count - i);
            data.insert(
                key,
                json!({
                    "Time": time,
                    "Username": SafeEmail().fake::<String>(),
                    "IP_Address": IPv4().fake::<String>(),
                    "Action": pick(&ACTIONS),
                    "Data": Word().fake::<String>(),
                }),
            );
        }
        data
    }

    /// A full `reporting` response body, with an optional continuation token.
    pub fn generate_response(&self, next: Option<&str>) -> Value {
        let mut body = json!({
            "status": "OK",
            "data": Value::Object(self.generate_events()),
        });
        if let Some(token) = next {
            body["next"] = Value::String(token.to_string());
        }
        body
    }
}

// =============================================================================
// User Directory Generator
// =============================================================================

/// Generates `getuserdata` responses.
#[derive(Debug, Clone)]
pub struct UserDataGenerator {
    user_count: usize,
    group_names: Vec<String>,
    first_uid: u64,
    total: Option<u64>,
}

impl Default for UserDataGenerator {
    fn default() -> Self {
        Self {
            user_count: 5,
            group_names: vec!["Finance".to_string(), "Engineering".to_string()],
            first_uid: 1000,
            total: None,
        }
    }
}

impl UserDataGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_count(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    pub fn with_groups(mut self, names: Vec<String>) -> Self {
        self.group_names = names;
        self
    }

    /// First user ID; use distinct ranges for distinct pages.
    pub fn with_first_uid(mut self, uid: u64) -> Self {
        self.first_uid = uid;
        self
    }

    /// Value of the `total` field; omitted when `None`.
    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    pub fn generate(&self) -> Value {
        let mut users = Map::new();
        let mut groups: Map<String, Value> = self
            .group_names
            .iter()
            .map(|name| (name.clone(), Value::Array(Vec::new())))
            .collect();

        for i in 0..self.user_count {
            let uid = self.first_uid + i as u64;
            let username: String = SafeEmail().fake();
            let group = self
                .group_names
                .get(i % self.group_names.len().max(1))
                .cloned();
            if let Some(Value::Array(members)) = group.as_ref().and_then(|g| groups.get_mut(g)) {
                members.push(Value::String(username.clone()));
            }
            users.insert(
                uid.to_string(),
                json!({
                    "username": username,
                    "fullname": Name().fake::<String>(),
                    "mpstrength": (0..100).fake::<u32>().to_string(),
                    "created": "2023-01-15 09:30:00",
                    "last_pw_change": "2024-01-10 08:00:00",
                    "last_login": "2024-02-28 17:45:12",
                    "disabled": (i % 7 == 6),
                    "neverloggedin": false,
                    "linked": "",
                    "sites": (0..500).fake::<u32>(),
                    "notes": (0..50).fake::<u32>(),
                    "formfills": 0,
                    "applications": 0,
                    "attachments": 0,
                    "groups": group.into_iter().collect::<Vec<_>>(),
                }),
            );
        }

        let mut body = json!({"Users": Value::Object(users), "Groups": Value::Object(groups)});
        if let Some(total) = self.total {
            body["total"] = json!(total);
        }
        body
    }
}

// =============================================================================
// Shared Folder Generator
// =============================================================================

/// Generates `getsfdata` responses: folder ID to folder object.
#[derive(Debug, Clone)]
pub struct SharedFolderGenerator {
    folder_count: usize,
    members_per_folder: usize,
}

impl Default for SharedFolderGenerator {
    fn default() -> Self {
        Self {
            folder_count: 3,
            members_per_folder: 2,
        }
    }
}

impl SharedFolderGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder_count(mut self, count: usize) -> Self {
        self.folder_count = count;
        self
    }

    pub fn with_members_per_folder(mut self, count: usize) -> Self {
        self.members_per_folder = count;
        self
    }

    pub fn generate(&self) -> Value {
        let mut folders = Map::new();
        for i in 0..self.folder_count {
            let users: Vec<Value> = (0..self.members_per_folder)
                .map(|_| {
                    json!({
                        "username": SafeEmail().fake::<String>(),
                        "readonly": "0",
                        "give": "1",
                        "can_administer": "0",
                    })
                })
                .collect();
            folders.insert(
                (5000 + i).to_string(),
                json!({
                    "sharedfoldername": format!("Shared-{}", Word().fake::<String>()),
                    "score": (0..100).fake::<u32>(),
                    "deleted": false,
                    "users": users,
                }),
            );
        }
        Value::Object(folders)
    }
}
