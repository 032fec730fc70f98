use console::style;
use serde::Serialize;
use serde_json::Value as JsonValue;
use siteplan_core::models::{AttributeTable, ChatTurn, Speaker};
use std::fmt::Display;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

fn print_json(value: &JsonValue) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("✓").green().bold(), message);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "success",
                "message": message.to_string(),
            })),
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "info",
                "message": message.to_string(),
            })),
        }
    }

    pub fn warning(&self, message: impl Display) {
        if let OutputFormat::Human = self.format {
            eprintln!("{} {}", style("⚠").yellow().bold(), message);
        }
    }

    pub fn table<T: Tabled>(&self, data: Vec<T>) {
        if let OutputFormat::Human = self.format {
            if data.is_empty() {
                println!("{}", style("(no data)").dim());
            } else {
                let mut table = Table::new(data);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }
    }

    /// Attribute table with columns known only at runtime
    pub fn attribute_table(&self, attributes: &AttributeTable) {
        if let OutputFormat::Human = self.format {
            let mut builder = Builder::default();
            builder.push_record(attributes.columns.iter().cloned());
            for row in &attributes.rows {
                builder.push_record(row.values.iter().map(cell_text));
            }

            let mut table = builder.build();
            table.with(Style::rounded());
            println!("{}", table);
        }
    }

    /// One transcript turn; user turns are pushed to the right
    pub fn turn(&self, turn: &ChatTurn) {
        if let OutputFormat::Human = self.format {
            match turn.speaker() {
                Speaker::User => {
                    println!("{:>60}", style(turn.text()).blue());
                }
                Speaker::Notice => {
                    println!("{} {}", style("✗").red().bold(), style(turn.text()).red());
                }
                Speaker::Greeting | Speaker::Assistant => {
                    println!("{} {}", style("assistant:").bold(), turn.text());
                }
            }
        }
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let value = serde_json::to_value(data)?;
        match self.format {
            OutputFormat::Human => print_json(&value),
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "success",
                "data": value,
            })),
        }
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{}: {}", style(key).bold(), value);
        }
    }

    pub fn section(&self, title: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
