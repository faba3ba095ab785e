use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

pub const ORDERS_FILE_ENV: &str = "CAFE_BOARD_ORDERS_FILE";
pub const ROSTER_ENV: &str = "CAFE_BOARD_ROSTER";
pub const CHANNEL_CAPACITY_ENV: &str = "CAFE_BOARD_CHANNEL_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// JSON file the orders are mirrored to.
    pub orders_file: PathBuf,
    /// Names offered for quick selection in a session.
    pub roster: Vec<String>,
    /// Mailbox size of the board service.
    pub channel_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            orders_file: PathBuf::from("realtime_orders.json"),
            roster: default_roster(),
            channel_capacity: 32,
        }
    }
}

fn default_roster() -> Vec<String> {
    [
        "박광우", "김성한", "김영민", "노주연", "박용운", "백용진", "이영호", "이한승", "장환준",
        "김세환", "배한성", "성용", "신기욱", "정지안", "조우석",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

impl BoardConfig {
    /// Defaults, then the TOML file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, BoardError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, BoardError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BoardError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            BoardError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        if config.channel_capacity == 0 {
            return Err(BoardError::Config(format!(
                "channel_capacity in {} must be positive",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Applies `CAFE_BOARD_*` values looked up through `lookup`. Blank
    /// values are skipped; unparsable ones are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(ORDERS_FILE_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.orders_file = PathBuf::from(trimmed);
            }
        }

        if let Some(raw) = lookup(ROSTER_ENV) {
            let names: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if !names.is_empty() {
                self.roster = names;
            }
        }

        if let Some(raw) = lookup(CHANNEL_CAPACITY_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                match trimmed.parse::<usize>() {
                    Ok(value) if value > 0 => self.channel_capacity = value,
                    Ok(_) => tracing::warn!("{CHANNEL_CAPACITY_ENV} must be positive, ignoring"),
                    Err(err) => tracing::warn!("invalid {CHANNEL_CAPACITY_ENV}, ignoring: {err}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_original_board() {
        let config = BoardConfig::default();
        assert_eq!(config.orders_file, PathBuf::from("realtime_orders.json"));
        assert_eq!(config.roster.len(), 15);
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn file_values_fill_in_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        fs::write(&path, "orders_file = \"data/orders.json\"\nroster = [\"Jun\", \"Mina\"]\n").unwrap();

        let config = BoardConfig::from_file(&path).unwrap();
        assert_eq!(config.orders_file, PathBuf::from("data/orders.json"));
        assert_eq!(config.roster, vec!["Jun", "Mina"]);
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn bad_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        fs::write(&path, "roster = 7").unwrap();
        assert!(matches!(BoardConfig::from_file(&path), Err(BoardError::Config(_))));
        assert!(matches!(
            BoardConfig::from_file(&dir.path().join("missing.toml")),
            Err(BoardError::Config(_))
        ));
    }

    #[test]
    fn zero_capacity_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        fs::write(&path, "channel_capacity = 0\n").unwrap();
        assert!(matches!(BoardConfig::from_file(&path), Err(BoardError::Config(_))));
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let mut config = BoardConfig::default();
        config.apply_overrides(lookup(&[
            (ORDERS_FILE_ENV, " /tmp/board.json "),
            (ROSTER_ENV, "Jun, ,Mina"),
            (CHANNEL_CAPACITY_ENV, "lots"),
        ]));
        assert_eq!(config.orders_file, PathBuf::from("/tmp/board.json"));
        assert_eq!(config.roster, vec!["Jun", "Mina"]);
        assert_eq!(config.channel_capacity, 32);

        config.apply_overrides(lookup(&[(CHANNEL_CAPACITY_ENV, "0"), (ROSTER_ENV, " , ")]));
        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.roster, vec!["Jun", "Mina"]);

        config.apply_overrides(lookup(&[(CHANNEL_CAPACITY_ENV, "4")]));
        assert_eq!(config.channel_capacity, 4);
    }
}
