pub mod address;
pub mod config;
pub mod ecdh;
pub mod firmware;
pub mod keypair;
pub mod signature;
pub mod transaction;

use crate::config::OutputFormat;
use anyhow::Result;
use serde_json::Value;

/// Print a command result in the configured format
pub fn print_report(format: OutputFormat, report: &Value) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print_text(report),
    }
    Ok(())
}

fn print_text(report: &Value) {
    match report {
        Value::Object(fields) => {
            for (key, value) in fields {
                match value {
                    Value::Array(items) => {
                        println!("{}:", key);
                        for item in items {
                            println!("  - {}", render_inline(item));
                        }
                    }
                    other => println!("{}: {}", key, render_inline(other)),
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_text(item);
            }
        }
        other => println!("{}", render_inline(other)),
    }
}

fn render_inline(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, render_inline(value)))
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
