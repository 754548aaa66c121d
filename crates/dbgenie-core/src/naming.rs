use chrono::Utc;

pub const TABLE_PLACEHOLDER_PREFIX: &str = "UnnamedTable";
pub const COLUMN_PLACEHOLDER_PREFIX: &str = "UnnamedColumn";

/// Synthesizes names for tables and columns the user left blank.
///
/// Names are `<prefix>_<unix millis>`. When two names are requested within
/// the same millisecond (or the clock steps back) a counter suffix is added,
/// so every name from one generator is distinct.
#[derive(Debug, Default)]
pub struct PlaceholderNames {
    last_millis: i64,
    seq: u32,
}

impl PlaceholderNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self) -> String {
        self.next(TABLE_PLACEHOLDER_PREFIX)
    }

    pub fn column(&mut self) -> String {
        self.next(COLUMN_PLACEHOLDER_PREFIX)
    }

    fn next(&mut self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        self.next_at(prefix, now)
    }

    fn next_at(&mut self, prefix: &str, millis: i64) -> String {
        if millis <= self.last_millis {
            self.seq += 1;
            format!("{prefix}_{}_{}", self.last_millis, self.seq)
        } else {
            self.last_millis = millis;
            self.seq = 0;
            format!("{prefix}_{millis}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tick_names_differ() {
        let mut names = PlaceholderNames::new();
        let a = names.next_at(COLUMN_PLACEHOLDER_PREFIX, 1_700_000_000_000);
        let b = names.next_at(COLUMN_PLACEHOLDER_PREFIX, 1_700_000_000_000);
        let c = names.next_at(COLUMN_PLACEHOLDER_PREFIX, 1_699_999_999_999);
        assert_eq!(a, "UnnamedColumn_1700000000000");
        assert_eq!(b, "UnnamedColumn_1700000000000_1");
        assert_eq!(c, "UnnamedColumn_1700000000000_2");
    }

    #[test]
    fn new_tick_resets_counter() {
        let mut names = PlaceholderNames::new();
        names.next_at(TABLE_PLACEHOLDER_PREFIX, 10);
        names.next_at(TABLE_PLACEHOLDER_PREFIX, 10);
        assert_eq!(names.next_at(TABLE_PLACEHOLDER_PREFIX, 11), "UnnamedTable_11");
    }

    #[test]
    fn live_names_are_never_empty() {
        let mut names = PlaceholderNames::new();
        let generated: Vec<String> = (0..50)
            .map(|i| if i % 2 == 0 { names.table() } else { names.column() })
            .collect();
        assert!(generated.iter().all(|name| !name.is_empty()));
        let mut unique = generated.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), generated.len());
    }
}
