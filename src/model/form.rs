//! Connector form state and payload derivation
//!
//! The form model is free of any rendering concern: a mutable state struct
//! plus small operations, so the payload collapsing rules can be tested in
//! isolation from the UI.

use serde::Serialize;
use std::collections::BTreeMap;

/// The five required scalar fields of a connector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Host,
    Port,
    Schema,
    TableName,
    AppId,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 5] = [
        Field::Host,
        Field::Port,
        Field::Schema,
        Field::TableName,
        Field::AppId,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Host => "Host",
            Field::Port => "Port",
            Field::Schema => "Schema",
            Field::TableName => "Table Name",
            Field::AppId => "App ID",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Host => "Enter host",
            Field::Port => "Enter port",
            Field::Schema => "Enter schema",
            Field::TableName => "Enter table name",
            Field::AppId => "Enter app ID",
        }
    }
}

/// Which side of a mapping row a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingColumn {
    JsonKey,
    ColumnName,
}

/// One JSON-key-to-column-name correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRow {
    pub json_key: String,
    pub column_name: String,
}

impl MappingRow {
    pub fn value(&self, column: MappingColumn) -> &str {
        match column {
            MappingColumn::JsonKey => &self.json_key,
            MappingColumn::ColumnName => &self.column_name,
        }
    }
}

/// In-memory state of a mounted connector form.
///
/// Lives only for the lifetime of the mounted form and is dropped on close.
/// The mapping list always holds at least one row: a blank row is seeded at
/// creation and rows are never removed.
#[derive(Debug, Clone)]
pub struct ConnectorForm {
    host: String,
    port: String,
    schema: String,
    table_name: String,
    app_id: String,
    mappings: Vec<MappingRow>,
}

impl Default for ConnectorForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorForm {
    pub fn new() -> Self {
        Self {
            host: String::new(),
            port: String::new(),
            schema: String::new(),
            table_name: String::new(),
            app_id: String::new(),
            mappings: vec![MappingRow::default()],
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Host => &self.host,
            Field::Port => &self.port,
            Field::Schema => &self.schema,
            Field::TableName => &self.table_name,
            Field::AppId => &self.app_id,
        }
    }

    /// Replace one scalar field. Any string is accepted; the port is
    /// deliberately kept as text (the wire contract transmits it as a
    /// string, so no numeric coercion happens anywhere).
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Host => &mut self.host,
            Field::Port => &mut self.port,
            Field::Schema => &mut self.schema,
            Field::TableName => &mut self.table_name,
            Field::AppId => &mut self.app_id,
        };
        *slot = value.into();
    }

    /// Mapping rows in insertion order (== display order == payload
    /// iteration order).
    pub fn rows(&self) -> &[MappingRow] {
        &self.mappings
    }

    /// Replace one cell of a mapping row. `index` must be in range; the UI
    /// only ever emits indices of rendered rows.
    pub fn update_mapping(&mut self, index: usize, column: MappingColumn, value: impl Into<String>) {
        let row = &mut self.mappings[index];
        match column {
            MappingColumn::JsonKey => row.json_key = value.into(),
            MappingColumn::ColumnName => row.column_name = value.into(),
        }
    }

    /// Append a blank mapping row. Existing rows are untouched and there is
    /// no upper bound on the row count.
    pub fn add_row(&mut self) {
        self.mappings.push(MappingRow::default());
    }

    /// Required scalar fields that are still empty, in display order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_empty())
            .collect()
    }

    /// Derive the wire payload from the current state.
    ///
    /// Rows where either side is empty are skipped; the rest collapse into a
    /// key-to-column map keyed by JSON key. A duplicate JSON key is not an
    /// error: the later row wins.
    pub fn payload(&self) -> ConnectorPayload {
        let mut mapping = BTreeMap::new();
        for row in &self.mappings {
            if row.json_key.is_empty() || row.column_name.is_empty() {
                continue;
            }
            mapping.insert(row.json_key.clone(), row.column_name.clone());
        }

        ConnectorPayload {
            host: self.host.clone(),
            port: self.port.clone(),
            schema: self.schema.clone(),
            table_name: self.table_name.clone(),
            app_id: self.app_id.clone(),
            mapping,
        }
    }
}

/// Request body for the configuration-save endpoint.
///
/// The serialized field names are the wire contract: `host`, `port`,
/// `schema`, `table_name`, `app_id`, `mapping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorPayload {
    pub host: String,
    pub port: String,
    pub schema: String,
    pub table_name: String,
    pub app_id: String,
    pub mapping: BTreeMap<String, String>,
}
