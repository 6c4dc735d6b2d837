//! Table schemas and the fleet-wide schema map
//!
//! Every agent is assumed to expose the same tables, so one aggregated
//! [`Schema`] describes the whole fleet. Divergent per-agent schemas are
//! not reconciled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Boolean,
    Int64,
    Uint128,
    Float64,
    String,
    Time64ns,
    #[serde(other)]
    DataTypeUnknown,
}

/// What a column's values mean, independent of how they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    StNone,
    StAgentUid,
    StUpid,
    StPid,
    StServiceName,
    StPodName,
    StNodeName,
    StNamespaceName,
    StContainerName,
    StIpAddress,
    StPort,
    StPercent,
    StBytes,
    StDurationNs,
    #[serde(other)]
    StUnspecified,
}

/// A column as reported by the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub desc: String,
    pub semantic_type: SemanticType,
}

/// A table as reported by the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub column_type: DataType,
    pub column_desc: String,
    pub column_semantic_type: SemanticType,
}

impl From<&ColumnSchema> for ColumnInfo {
    fn from(column: &ColumnSchema) -> Self {
        Self {
            column_name: column.name.clone(),
            column_type: column.data_type,
            column_desc: column.desc.clone(),
            column_semantic_type: column.semantic_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub relation_map: HashMap<String, Relation>,
}

impl Schema {
    /// Builds the fleet schema. Column order is kept; a repeated table name
    /// replaces the earlier entry.
    pub fn aggregate<'a>(tables: impl IntoIterator<Item = &'a TableSchema>) -> Self {
        let mut relation_map = HashMap::new();
        for table in tables {
            let relation = Relation {
                columns: table.columns.iter().map(ColumnInfo::from).collect(),
            };
            if relation_map.insert(table.name.clone(), relation).is_some() {
                debug!(table = %table.name, "duplicate table name in computed schemas, keeping last");
            }
        }
        Self { relation_map }
    }

    pub fn relation(&self, table: &str) -> Option<&Relation> {
        self.relation_map.get(table)
    }

    pub fn len(&self) -> usize {
        self.relation_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relation_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: DataType, semantic_type: SemanticType) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            data_type,
            desc: format!("{name} column"),
            semantic_type,
        }
    }

    fn table(name: &str, columns: Vec<ColumnSchema>) -> TableSchema {
        TableSchema {
            name: name.to_string(),
            columns,
        }
    }

    #[test]
    fn distinct_tables_keep_column_order() {
        let tables = vec![
            table(
                "process_stats",
                vec![
                    column("time_", DataType::Time64ns, SemanticType::StNone),
                    column("upid", DataType::Uint128, SemanticType::StUpid),
                    column("cpu_pct", DataType::Float64, SemanticType::StPercent),
                ],
            ),
            table(
                "http_events",
                vec![column("remote_port", DataType::Int64, SemanticType::StPort)],
            ),
            table("empty", vec![]),
        ];

        let schema = Schema::aggregate(&tables);
        assert_eq!(schema.len(), 3);

        let names: Vec<&str> = schema
            .relation("process_stats")
            .unwrap()
            .columns
            .iter()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(names, ["time_", "upid", "cpu_pct"]);

        let cpu = &schema.relation("process_stats").unwrap().columns[2];
        assert_eq!(cpu.column_type, DataType::Float64);
        assert_eq!(cpu.column_desc, "cpu_pct column");
        assert_eq!(cpu.column_semantic_type, SemanticType::StPercent);
        assert!(schema.relation("empty").unwrap().columns.is_empty());
    }

    #[test]
    fn duplicate_table_names_keep_last() {
        let tables = vec![
            table("t", vec![column("first", DataType::Int64, SemanticType::StNone)]),
            table("t", vec![column("second", DataType::String, SemanticType::StPodName)]),
        ];

        let schema = Schema::aggregate(&tables);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.relation("t").unwrap().columns[0].column_name, "second");
    }

    #[test]
    fn no_tables_is_an_empty_schema() {
        assert!(Schema::aggregate(&Vec::<TableSchema>::new()).is_empty());
    }

    #[test]
    fn unknown_semantic_type_tag_degrades() {
        let column: ColumnSchema = serde_json::from_str(
            r#"{"name":"x","data_type":"INT64","semantic_type":"ST_QUANTILES"}"#,
        )
        .unwrap();
        assert_eq!(column.semantic_type, SemanticType::StUnspecified);
        assert!(column.desc.is_empty());
    }
}
