//! Todo item payloads in the server's short-key JSON shape.
//!
//! # Design
//! Every field is optional so one type covers both a full create payload
//! (`TodoItem::new`) and the sparse field sets a modify commit carries
//! (`TodoItem::completed`, `TodoItem::trashed`). Absent fields are omitted
//! from the JSON; nullable fields use a nested `Option` so a payload can send
//! an explicit `null`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{self, date_stamp};

/// Which list a new task lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Destination {
    Inbox,
    Anytime,
    Someday,
}

impl From<Destination> for u8 {
    fn from(d: Destination) -> u8 {
        match d {
            Destination::Inbox => 0,
            Destination::Anytime => 1,
            Destination::Someday => 2,
        }
    }
}

impl TryFrom<u8> for Destination {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Destination::Inbox),
            1 => Ok(Destination::Anytime),
            2 => Ok(Destination::Someday),
            other => Err(format!("unknown destination {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    Incomplete,
    Canceled,
    Completed,
}

impl From<Status> for u8 {
    fn from(s: Status) -> u8 {
        match s {
            Status::Incomplete => 0,
            Status::Canceled => 2,
            Status::Completed => 3,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Status::Incomplete),
            2 => Ok(Status::Canceled),
            3 => Ok(Status::Completed),
            other => Err(format!("unknown status {other}")),
        }
    }
}

/// `tp` value for a plain to-do (as opposed to a project or heading).
pub const KIND_TASK: u8 = 0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(rename = "tt", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "tp", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,

    #[serde(rename = "st", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,

    #[serde(rename = "ss", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(
        rename = "sr",
        default,
        skip_serializing_if = "Option::is_none",
        with = "date_stamp"
    )]
    pub scheduled_date: Option<Option<NaiveDate>>,

    /// Reference date for the Today list; mirrors `scheduled_date`.
    #[serde(
        rename = "tir",
        default,
        skip_serializing_if = "Option::is_none",
        with = "date_stamp"
    )]
    pub today_date: Option<Option<NaiveDate>>,

    #[serde(
        rename = "dd",
        default,
        skip_serializing_if = "Option::is_none",
        with = "date_stamp"
    )]
    pub due_date: Option<Option<NaiveDate>>,

    #[serde(rename = "tr", default, skip_serializing_if = "Option::is_none")]
    pub in_trash: Option<bool>,

    #[serde(rename = "cd", default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<f64>,

    #[serde(rename = "md", default, skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<f64>,

    #[serde(rename = "sp", default, skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<Option<f64>>,

    #[serde(rename = "ix", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(rename = "pr", default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,

    #[serde(rename = "ar", default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<String>>,

    #[serde(rename = "tg", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(rename = "icp", default, skip_serializing_if = "Option::is_none")]
    pub is_project: Option<bool>,
}

impl TodoItem {
    /// Full payload for a new, incomplete task.
    pub fn new(index: i64, title: &str, destination: Destination) -> Self {
        let now = time::timestamp();
        Self {
            title: Some(title.to_string()),
            kind: Some(KIND_TASK),
            destination: Some(destination),
            status: Some(Status::Incomplete),
            scheduled_date: Some(None),
            today_date: Some(None),
            due_date: Some(None),
            in_trash: Some(false),
            creation_date: Some(now),
            modification_date: Some(now),
            stop_date: Some(None),
            index: Some(index),
            projects: Some(Vec::new()),
            areas: Some(Vec::new()),
            tags: Some(Vec::new()),
            is_project: Some(false),
        }
    }

    pub fn with_scheduled_date(mut self, date: Option<NaiveDate>) -> Self {
        self.scheduled_date = Some(date);
        self.today_date = Some(date);
        self
    }

    pub fn with_due_date(mut self, date: Option<NaiveDate>) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Modify payload marking a task completed now.
    pub fn completed() -> Self {
        let now = time::timestamp();
        Self {
            status: Some(Status::Completed),
            stop_date: Some(Some(now)),
            modification_date: Some(now),
            ..Self::default()
        }
    }

    /// Modify payload moving a task to the trash.
    pub fn trashed() -> Self {
        Self {
            in_trash: Some(true),
            modification_date: Some(time::timestamp()),
            ..Self::default()
        }
    }
}
