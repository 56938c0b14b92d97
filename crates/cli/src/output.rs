//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table<T: TableDisplay>(items: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

/// Render a single item
pub fn render_item<T: Serialize + TableDisplay>(
    item: &T,
    format: OutputFormat,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => table(std::slice::from_ref(item)).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(item)?,
        OutputFormat::Yaml => serde_yaml::to_string(item)?,
        OutputFormat::Plain => plain(item),
    })
}

/// Render a list of items
pub fn render_list<T: Serialize + TableDisplay>(
    items: &[T],
    format: OutputFormat,
) -> anyhow::Result<String> {
    if items.is_empty() && matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        return Ok("No items found.".to_string());
    }

    Ok(match format {
        OutputFormat::Table => table(items).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(items)?,
        OutputFormat::Yaml => serde_yaml::to_string(items)?,
        OutputFormat::Plain => items.iter().map(plain).collect::<Vec<_>>().join("\n---\n"),
    })
}

fn plain<T: TableDisplay>(item: &T) -> String {
    T::headers()
        .iter()
        .zip(item.row())
        .map(|(header, value)| format!("{}: {}", header, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_item(item, format)?);
    Ok(())
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_list(items, format)?);
    Ok(())
}

/// Print an arbitrary JSON value
pub fn print_value(value: &serde_json::Value, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Plain => match value {
            serde_json::Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        },
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?)
        }
    }
    Ok(())
}

/// Print a simple message
pub fn print_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
        _ => {
            println!("{}", message);
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
        count: usize,
    }

    impl TableDisplay for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Name", "Count"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.name.clone(), self.count.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "LoginScreen".into(),
                count: 1,
            },
            Row {
                name: "LoggedIn".into(),
                count: 2,
            },
        ]
    }

    #[test]
    fn test_plain_list_separates_items() {
        let out = render_list(&rows(), OutputFormat::Plain).unwrap();
        assert_eq!(out, "Name: LoginScreen\nCount: 1\n---\nName: LoggedIn\nCount: 2");
    }

    #[test]
    fn test_json_list() {
        let out = render_list(&rows(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[1]["name"], "LoggedIn");
    }

    #[test]
    fn test_yaml_item() {
        let out = render_item(&rows()[0], OutputFormat::Yaml).unwrap();
        assert!(out.contains("name: LoginScreen"));
    }

    #[test]
    fn test_table_contains_headers_and_cells() {
        let out = render_list(&rows(), OutputFormat::Table).unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("LoggedIn"));
    }

    #[test]
    fn test_empty_list() {
        let empty: Vec<Row> = Vec::new();
        assert_eq!(render_list(&empty, OutputFormat::Table).unwrap(), "No items found.");
        assert_eq!(render_list(&empty, OutputFormat::Json).unwrap(), "[]");
    }
}
