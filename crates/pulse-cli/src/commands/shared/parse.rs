use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde deserialization. Hyphens are
/// accepted in place of underscores.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|_| anyhow::anyhow!("invalid {field} '{raw}'"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulse_core::enums::{SortField, StatusFilter, TaskPriority};

    use super::parse_enum;

    #[test]
    fn parses_snake_case_enum() {
        let priority: TaskPriority = parse_enum("high", "priority").expect("priority should parse");
        assert_eq!(priority, TaskPriority::High);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let field: SortField = parse_enum("due-at", "sort field").expect("sort should parse");
        assert_eq!(field, SortField::DueAt);
        let status: StatusFilter = parse_enum("In-Progress", "status").expect("status should parse");
        assert_eq!(status, StatusFilter::InProgress);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<TaskPriority>("urgent", "priority").expect_err("should fail");
        assert_eq!(err.to_string(), "invalid priority 'urgent'");
    }
}
