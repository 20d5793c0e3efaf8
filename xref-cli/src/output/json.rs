//! JSON output formatting for machine-readable output.

use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as pretty-printed JSON.
    pub fn format<T: Serialize + ?Sized>(data: &T) -> String {
        serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_format_pretty() {
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        let output = JsonOutput::format(&data);

        assert!(output.contains("\"name\": \"test\""));
        assert!(output.contains("42"));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_slice() {
        let data = [1, 2, 3];
        let output = JsonOutput::format(&data[..]);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }
}
