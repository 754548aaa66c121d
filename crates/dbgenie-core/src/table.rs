use serde::{Deserialize, Serialize};

use crate::column::ColumnSpec;
use crate::lenient;

/// A table definition: a name plus columns in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSpec {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::list")]
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column. Without `data` a default `string` column named
    /// `col<n>` is added. Returns the new column's position.
    pub fn add_column(&mut self, data: Option<ColumnSpec>) -> usize {
        let column = data.unwrap_or_else(|| ColumnSpec::new(self.next_column_name()));
        self.columns.push(column);
        self.columns.len() - 1
    }

    /// Remove a column. A table may be left with no columns; such a table is
    /// skipped when the request is built.
    pub fn remove_column(&mut self, index: usize) -> Option<ColumnSpec> {
        if index < self.columns.len() {
            Some(self.columns.remove(index))
        } else {
            None
        }
    }

    pub fn column(&self, index: usize) -> Option<&ColumnSpec> {
        self.columns.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut ColumnSpec> {
        self.columns.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn next_column_name(&self) -> String {
        let mut n = self.columns.len() + 1;
        loop {
            let candidate = format!("col{n}");
            if !self.columns.iter().any(|c| c.name.trim() == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_get_distinct_names() {
        let mut table = TableSpec::new("users");
        table.add_column(None);
        table.add_column(None);
        table.remove_column(0);
        table.add_column(None);
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["col2", "col3"]);
    }

    #[test]
    fn removing_last_column_leaves_table_empty() {
        let mut table = TableSpec::new("t");
        table.add_column(None);
        assert!(table.remove_column(0).is_some());
        assert!(table.is_empty());
        assert!(table.remove_column(0).is_none());
    }

    #[test]
    fn decodes_table_with_bad_columns() {
        let table: TableSpec = serde_json::from_value(serde_json::json!({
            "name": "orders",
            "columns": [{"name": "id", "type": "integer"}, "junk", null]
        }))
        .expect("decode table");
        assert_eq!(table.columns.len(), 1);

        let table: TableSpec =
            serde_json::from_value(serde_json::json!({"name": null, "columns": null}))
                .expect("decode table");
        assert_eq!(table, TableSpec::default());
    }
}
