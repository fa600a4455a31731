use chrono::{DateTime, Local, Utc};

/// Minutes as `45 min` below an hour, `1h 05` above.
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    format!("{}h {:02}", minutes / 60, minutes % 60)
}

/// Local `YYYY-MM-DD HH:MM`, or `-` when unset.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Comma separated list input, trimmed, blanks dropped.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0 min");
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(65), "1h 05");
        assert_eq!(format_minutes(120), "2h 00");
    }

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(parse_list(" voice, ,body ,"), vec!["voice".to_string(), "body".to_string()]);
        assert!(parse_list("").is_empty());
    }
}
