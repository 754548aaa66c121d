use chrono::Utc;

/// Identifier stamped on every log event of one CLI invocation,
/// e.g. `2024-05-01__tui_1f3a9c2e`.
pub fn new_session_id(kind: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    format!("{date}__{kind}_{}", short_id())
}

fn short_id() -> String {
    let id = uuid::Uuid::new_v4().to_string();
    match id.split('-').next() {
        Some(part) if !part.is_empty() => part.to_string(),
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_carry_kind_and_differ() {
        let first = new_session_id("tui");
        let second = new_session_id("tui");
        assert!(first.contains("__tui_"));
        assert_ne!(first, second);
    }
}
