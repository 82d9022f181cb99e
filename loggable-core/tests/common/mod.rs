#![allow(dead_code)]

use loggable_core::{
    ChangeRecord, Loggable, LoggableModel, PrimaryKey, RecordStore, StorageError,
};
use loggable_storage::StorageResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

/// Routes recorder logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: String,
    pub note: String,
    pub updated_at: i64,
    #[serde(skip)]
    pub clerk: Option<String>,
    #[serde(skip)]
    pub loggable: LoggableModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMeta {
    pub clerk: String,
}

impl Order {
    pub fn new(id: &str, status: &str) -> Self {
        Self {
            id: id.to_string(),
            status: status.to_string(),
            note: String::new(),
            updated_at: 0,
            clerk: None,
            loggable: LoggableModel::new(),
        }
    }
}

impl Loggable for Order {
    const OBJECT_TYPE: &'static str = "Order";
    const DIFFABLE_FIELDS: &'static [&'static str] = &["status", "note"];
    type Meta = OrderMeta;

    fn primary_key(&self) -> PrimaryKey {
        self.id.as_str().into()
    }

    fn loggable(&self) -> &LoggableModel {
        &self.loggable
    }

    fn loggable_mut(&mut self) -> &mut LoggableModel {
        &mut self.loggable
    }

    fn meta(&self) -> Option<OrderMeta> {
        self.clerk.clone().map(|clerk| OrderMeta { clerk })
    }
}

/// Serializes with PascalCase field names, as an older producer would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    pub id: u64,
    pub total_cents: i64,
    pub updated_at: i64,
    #[serde(skip)]
    pub loggable: LoggableModel,
}

impl Loggable for Invoice {
    const OBJECT_TYPE: &'static str = "Invoice";
    const DIFFABLE_FIELDS: &'static [&'static str] = &["TotalCents"];
    type Meta = ();

    fn primary_key(&self) -> PrimaryKey {
        self.id.into()
    }

    fn loggable(&self) -> &LoggableModel {
        &self.loggable
    }

    fn loggable_mut(&mut self) -> &mut LoggableModel {
        &mut self.loggable
    }
}

/// Two fields whose names coincide once snake-cased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id_legacy: i64,
    pub user_id: i64,
    pub updated_at: i64,
    #[serde(skip)]
    pub loggable: LoggableModel,
}

impl Loggable for Account {
    const OBJECT_TYPE: &'static str = "Account";
    type Meta = ();

    fn primary_key(&self) -> PrimaryKey {
        self.id.into()
    }

    fn loggable(&self) -> &LoggableModel {
        &self.loggable
    }

    fn loggable_mut(&mut self) -> &mut LoggableModel {
        &mut self.loggable
    }
}

/// Cannot be serialized to JSON: map keys must be strings.
#[derive(Debug, Serialize)]
pub struct Grid {
    pub id: u32,
    pub cells: BTreeMap<(u32, u32), String>,
    #[serde(skip)]
    pub loggable: LoggableModel,
}

impl Grid {
    pub fn new(id: u32) -> Self {
        let mut cells = BTreeMap::new();
        cells.insert((0, 0), "origin".to_string());
        Self {
            id,
            cells,
            loggable: LoggableModel::new(),
        }
    }
}

impl Loggable for Grid {
    const OBJECT_TYPE: &'static str = "Grid";
    type Meta = ();

    fn primary_key(&self) -> PrimaryKey {
        self.id.into()
    }

    fn loggable(&self) -> &LoggableModel {
        &self.loggable
    }

    fn loggable_mut(&mut self) -> &mut LoggableModel {
        &mut self.loggable
    }
}

/// A store whose every call fails, as if the database were unreachable.
pub struct OfflineStore;

impl RecordStore for OfflineStore {
    fn append(&self, _record: ChangeRecord) -> StorageResult<ChangeRecord> {
        Err(StorageError::InvalidData("offline".into()))
    }

    fn find_by_object_id(&self, _object_id: &str) -> StorageResult<Vec<ChangeRecord>> {
        Err(StorageError::InvalidData("offline".into()))
    }

    fn find_latest_by_object_id(&self, _object_id: &str) -> StorageResult<Option<ChangeRecord>> {
        Err(StorageError::InvalidData("offline".into()))
    }
}
