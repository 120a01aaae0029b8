use clap::{Parser, Subcommand};
use cute_tasks_core::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cute_tasks", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer yes to delete confirmations
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: cute_tasks add "Buy milk"
    Add { text: Option<String> },
    /// Mark a task as completed, or reopen it
    ///
    /// Example: cute_tasks toggle 1734652800000
    Toggle { id: String },
    /// Replace a task's text (reopens the task; empty text deletes it)
    ///
    /// Example: cute_tasks edit 1734652800000 "Buy oat milk"
    Edit { id: String, text: String },
    /// Delete a task after confirmation
    ///
    /// Example: cute_tasks delete 1734652800000 --yes
    Delete { id: String },
    /// Remove every completed task
    ///
    /// Example: cute_tasks clear-completed
    ClearCompleted,
    /// List tasks
    ///
    /// Example: cute_tasks list --filter active
    List {
        /// all, active or completed
        #[arg(long)]
        filter: Option<String>,
    },
    /// Switch the active filter and show the matching tasks
    ///
    /// Example: filter completed
    Filter { name: String },
    /// Show completed and uncompleted counters
    ///
    /// Example: cute_tasks stats
    Stats,
    /// Export all tasks as JSON ("-" writes to stdout)
    ///
    /// Example: cute_tasks export backup.json
    Export { path: Option<PathBuf> },
    /// Replace all tasks with the contents of an exported file
    ///
    /// Example: cute_tasks import backup.json
    Import { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StoreDir,
    SlotKey,
    ExportFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    if value.is_empty() {
        return Err("override value cannot be empty".to_string());
    }

    let field = override_field(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;
    let target = match field.as_str() {
        "store_dir" | "dir" => ConfigOverrideTarget::StoreDir,
        "slot_key" | "slot" | "key" => ConfigOverrideTarget::SlotKey,
        "export_file" | "export" => ConfigOverrideTarget::ExportFile,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Collect every `--config-override` into one set of overrides. Later
/// values win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::StoreDir => overrides.store_dir = Some(parsed.value.into()),
            ConfigOverrideTarget::SlotKey => overrides.slot_key = Some(parsed.value),
            ConfigOverrideTarget::ExportFile => overrides.export_file = Some(parsed.value),
        }
    }
    Ok(overrides)
}

/// `Slot-Key`, `slot key` and `SLOT_KEY` all name the `slot_key` field.
fn override_field(key: &str) -> Option<String> {
    let field: String = key
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    (!field.is_empty()).then_some(field)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, ConfigOverrideTarget, collect_overrides, parse_config_override};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Slot-Key = work_tasks ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::SlotKey);
        assert_eq!(parsed.value, "work_tasks");
    }

    #[test]
    fn parse_config_override_rejects_empty_key() {
        let err = parse_config_override(" =work").unwrap_err();
        assert!(err.contains("key cannot be empty"));
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("theme=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("slot_key").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_empty_value() {
        let err = parse_config_override("export_file= ").unwrap_err();
        assert!(err.contains("cannot be empty"));
    }

    #[test]
    fn collect_overrides_last_value_wins() {
        let raw = vec![
            "slot_key=first".to_string(),
            "store_dir=/tmp/tasks".to_string(),
            "slot=second".to_string(),
        ];

        let overrides = collect_overrides(&raw).unwrap();

        assert_eq!(overrides.slot_key.as_deref(), Some("second"));
        assert_eq!(overrides.store_dir, Some(PathBuf::from("/tmp/tasks")));
        assert_eq!(overrides.export_file, None);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cute_tasks", "delete", "12", "--yes", "--json"]).unwrap();

        assert!(cli.yes);
        assert!(cli.json);
        match cli.command {
            Command::Delete { id } => assert_eq!(id, "12"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_accepts_optional_filter() {
        let cli = Cli::try_parse_from(["cute_tasks", "list", "--filter", "active"]).unwrap();

        match cli.command {
            Command::List { filter } => assert_eq!(filter.as_deref(), Some("active")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
