//! Commit bodies: a JSON object from operation id to `{t, e, p}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::TodoItem;
use crate::token;

/// Entity-kind tag for the task schema the payload keys follow.
pub const ENTITY_TASK: &str = "Task6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationKind {
    Create,
    /// Also covers completion and trashing, which are field changes.
    Modify,
}

impl From<OperationKind> for u8 {
    fn from(k: OperationKind) -> u8 {
        match k {
            OperationKind::Create => 0,
            OperationKind::Modify => 1,
        }
    }
}

impl TryFrom<u8> for OperationKind {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(OperationKind::Create),
            1 => Ok(OperationKind::Modify),
            other => Err(format!("unknown operation type {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "t")]
    pub kind: OperationKind,
    #[serde(rename = "e")]
    pub entity: String,
    #[serde(rename = "p")]
    pub payload: TodoItem,
}

/// Operations keyed by the id of the item they touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commit {
    operations: BTreeMap<String, Operation>,
}

impl Commit {
    /// Create `item` under a freshly generated id.
    pub fn create(item: TodoItem) -> Self {
        Self::single(token::new_operation_id(), OperationKind::Create, item)
    }

    /// Apply the fields set in `item` to the existing item `uuid`.
    pub fn modify(uuid: &str, item: TodoItem) -> Self {
        Self::single(uuid.to_string(), OperationKind::Modify, item)
    }

    fn single(id: String, kind: OperationKind, payload: TodoItem) -> Self {
        let operation = Operation {
            kind,
            entity: ENTITY_TASK.to_string(),
            payload,
        };
        Self {
            operations: BTreeMap::from([(id, operation)]),
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.operations.iter().map(|(id, op)| (id.as_str(), op))
    }

    /// Id of the first operation, i.e. the item a single-operation commit
    /// creates or modifies.
    pub fn item_id(&self) -> Option<&str> {
        self.operations.keys().next().map(String::as_str)
    }
}
