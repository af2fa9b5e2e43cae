use crate::utils::error::{EtlError, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const GAMES_SCHEMA: &str = include_str!("../../schemas/games.toml");
const SHOTS_SCHEMA: &str = include_str!("../../schemas/shots.toml");

/// Built-in table schemas shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// Game-level team stats (games table).
    Games,
    /// Shot-level analytics (nhl_shots_2024 table).
    Shots,
}

/// Declarative per-dataset configuration: target table, column rename
/// map, type coercion lists, and the ordered target column set. One
/// shared artifact per dataset instead of a mapping table re-declared
/// in every import script.
#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub primary_key: String,
    pub batch_size: usize,
    /// Target columns, in output order. Transformation projects every
    /// record onto exactly this set.
    pub columns: Vec<String>,
    /// Columns carrying a compact YYYYMMDD date encoding in the source.
    #[serde(default)]
    pub date_columns: HashSet<String>,
    /// Statistical count columns emitted as integers; null coerces to 0.
    #[serde(default)]
    pub integer_columns: HashSet<String>,
    /// Source-name to target-name renames. Source columns absent from
    /// this map keep their name.
    #[serde(default)]
    pub rename: HashMap<String, String>,
}

impl TableSchema {
    pub fn builtin(kind: DatasetKind) -> Result<Self> {
        match kind {
            DatasetKind::Games => Self::from_toml(GAMES_SCHEMA),
            DatasetKind::Shots => Self::from_toml(SHOTS_SCHEMA),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let schema: TableSchema = toml::from_str(raw)?;
        schema.check()?;
        Ok(schema)
    }

    pub fn target_name<'a>(&'a self, source: &'a str) -> &'a str {
        self.rename.get(source).map(String::as_str).unwrap_or(source)
    }

    pub fn is_date_column(&self, column: &str) -> bool {
        self.date_columns.contains(column)
    }

    pub fn is_integer_column(&self, column: &str) -> bool {
        self.integer_columns.contains(column)
    }

    /// Internal consistency checks, run on every load so drift between
    /// the rename map and the column list is caught at startup.
    fn check(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(EtlError::ConfigError {
                message: format!("schema for table '{}' declares no columns", self.table),
            });
        }

        let declared: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        if declared.len() != self.columns.len() {
            return Err(EtlError::ConfigError {
                message: format!("schema for table '{}' has duplicate columns", self.table),
            });
        }

        if self.batch_size == 0 {
            return Err(EtlError::ConfigError {
                message: format!("schema for table '{}' has batch_size 0", self.table),
            });
        }

        if !declared.contains(self.primary_key.as_str()) {
            return Err(EtlError::ConfigError {
                message: format!(
                    "primary key '{}' is not a declared column of table '{}'",
                    self.primary_key, self.table
                ),
            });
        }

        for (label, set) in [
            ("date_columns", &self.date_columns),
            ("integer_columns", &self.integer_columns),
        ] {
            if let Some(unknown) = set.iter().find(|c| !declared.contains(c.as_str())) {
                return Err(EtlError::ConfigError {
                    message: format!(
                        "{} entry '{}' is not a declared column of table '{}'",
                        label, unknown, self.table
                    ),
                });
            }
        }

        if let Some((source, target)) = self
            .rename
            .iter()
            .find(|(_, target)| !declared.contains(target.as_str()))
        {
            return Err(EtlError::ConfigError {
                message: format!(
                    "rename '{}' -> '{}' targets an undeclared column of table '{}'",
                    source, target, self.table
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_games_schema() {
        let schema = TableSchema::builtin(DatasetKind::Games).unwrap();

        assert_eq!(schema.table, "games");
        assert_eq!(schema.primary_key, "game_id");
        assert_eq!(schema.batch_size, 500);
        assert_eq!(schema.target_name("gameId"), "game_id");
        assert_eq!(schema.target_name("xGoalsPercentage"), "x_goals_percentage");
        // Source typo is fixed during rename.
        assert_eq!(schema.target_name("penalityMinutesFor"), "penalty_minutes_for");
        // Unmapped columns keep their name.
        assert_eq!(schema.target_name("season"), "season");
        assert!(schema.is_date_column("game_date"));
        assert!(schema.is_integer_column("goals_for"));
        assert!(schema.is_integer_column("season"));
        assert!(!schema.is_integer_column("x_goals_for"));
    }

    #[test]
    fn test_builtin_shots_schema() {
        let schema = TableSchema::builtin(DatasetKind::Shots).unwrap();

        assert_eq!(schema.table, "nhl_shots_2024");
        assert_eq!(schema.primary_key, "shot_id");
        assert_eq!(schema.batch_size, 1000);
        assert_eq!(schema.target_name("shotID"), "shot_id");
        assert_eq!(schema.target_name("arenaAdjustedXCordABS"), "arena_adjusted_x_cord_abs");
        assert!(schema.date_columns.is_empty());
        assert!(schema.is_integer_column("goal"));
    }

    #[test]
    fn test_rename_targets_are_declared_columns() {
        for kind in [DatasetKind::Games, DatasetKind::Shots] {
            let schema = TableSchema::builtin(kind).unwrap();
            let declared: std::collections::HashSet<_> =
                schema.columns.iter().collect();
            for target in schema.rename.values() {
                assert!(declared.contains(target), "undeclared target {}", target);
            }
        }
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(TableSchema::from_toml("table = ").is_err());
    }

    #[test]
    fn test_undeclared_primary_key_is_rejected() {
        let raw = r#"
table = "t"
primary_key = "missing"
batch_size = 10
columns = ["a", "b"]
"#;
        let err = TableSchema::from_toml(raw).unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let raw = r#"
table = "t"
primary_key = "a"
batch_size = 0
columns = ["a"]
"#;
        assert!(TableSchema::from_toml(raw).is_err());
    }

    #[test]
    fn test_undeclared_rename_target_is_rejected() {
        let raw = r#"
table = "t"
primary_key = "a"
batch_size = 10
columns = ["a"]

[rename]
sourceB = "b"
"#;
        assert!(TableSchema::from_toml(raw).is_err());
    }
}
