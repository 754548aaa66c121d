use crate::column::ColumnSpec;
use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::table::TableSpec;

/// Row count used when the user's input is missing or not a positive number.
pub const DEFAULT_NUM_ROWS: u32 = 10;
/// Context sent when the user left the description blank.
pub const DEFAULT_DATABASE_CONTEXT: &str = "general data";

/// Everything the user has described in one session.
///
/// The table list is never empty when observed from outside: every structural
/// mutation finishes with [`SchemaState::ensure_non_empty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaState {
    tables: Vec<TableSpec>,
    pub num_rows: u32,
    /// Raw description as typed; see [`SchemaState::effective_context`].
    pub database_context: String,
    pub requested_format: OutputFormat,
}

impl Default for SchemaState {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaState {
    /// Fresh state with one default table holding one default column.
    pub fn new() -> Self {
        let mut state = Self {
            tables: Vec::new(),
            num_rows: DEFAULT_NUM_ROWS,
            database_context: String::new(),
            requested_format: OutputFormat::default(),
        };
        state.ensure_non_empty();
        state
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn table(&self, index: usize) -> Option<&TableSpec> {
        self.tables.get(index)
    }

    pub fn table_mut(&mut self, index: usize) -> Result<&mut TableSpec> {
        self.tables.get_mut(index).ok_or(Error::UnknownTable(index))
    }

    pub fn column_mut(&mut self, table: usize, column: usize) -> Result<&mut ColumnSpec> {
        self.table_mut(table)?
            .column_mut(column)
            .ok_or(Error::UnknownColumn { table, column })
    }

    /// Append a table and return its position.
    ///
    /// `None` names the table `Table<n>`. An empty `columns` list is seeded
    /// with one default column so every new table starts editable.
    pub fn add_table(&mut self, name: Option<String>, columns: Vec<ColumnSpec>) -> usize {
        let name = name.unwrap_or_else(|| self.next_table_name());
        let mut table = TableSpec::new(name);
        if columns.is_empty() {
            table.add_column(None);
        } else {
            table.columns = columns;
        }
        self.tables.push(table);
        self.tables.len() - 1
    }

    /// Remove a table. Removing the last one brings back a default table.
    pub fn remove_table(&mut self, index: usize) -> Result<TableSpec> {
        if index >= self.tables.len() {
            return Err(Error::UnknownTable(index));
        }
        let removed = self.tables.remove(index);
        self.ensure_non_empty();
        Ok(removed)
    }

    pub fn add_column(&mut self, table: usize, data: Option<ColumnSpec>) -> Result<usize> {
        Ok(self.table_mut(table)?.add_column(data))
    }

    pub fn remove_column(&mut self, table: usize, column: usize) -> Result<ColumnSpec> {
        self.table_mut(table)?
            .remove_column(column)
            .ok_or(Error::UnknownColumn { table, column })
    }

    /// Re-add a default table when the list is empty. Returns whether one was
    /// added.
    pub fn ensure_non_empty(&mut self) -> bool {
        if self.tables.is_empty() {
            self.add_table(None, Vec::new());
            true
        } else {
            false
        }
    }

    /// Drop every table. Only used right before a wholesale replacement, which
    /// must call [`SchemaState::ensure_non_empty`] or `add_table` afterwards.
    pub(crate) fn clear_tables(&mut self) {
        self.tables.clear();
    }

    /// Parse the row-count field and store the result.
    pub fn set_num_rows_input(&mut self, input: &str) -> u32 {
        self.num_rows = parse_num_rows(input);
        self.num_rows
    }

    pub fn set_database_context(&mut self, text: impl Into<String>) {
        self.database_context = text.into();
    }

    /// Trimmed description, or the generic default when blank.
    pub fn effective_context(&self) -> &str {
        let trimmed = self.database_context.trim();
        if trimmed.is_empty() {
            DEFAULT_DATABASE_CONTEXT
        } else {
            trimmed
        }
    }

    fn next_table_name(&self) -> String {
        let mut n = self.tables.len() + 1;
        loop {
            let candidate = format!("Table{n}");
            if !self.tables.iter().any(|t| t.name.trim() == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Row count from free-form input, read from its leading digits so `"50 rows"`
/// gives 50. No digits, zero or overflow gives [`DEFAULT_NUM_ROWS`].
pub fn parse_num_rows(input: &str) -> u32 {
    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(unsigned.len());
    match unsigned[..digits_end].parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => DEFAULT_NUM_ROWS,
    }
}
