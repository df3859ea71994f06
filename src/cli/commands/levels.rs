//! Implementation of the `fieldlog levels` command.

use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Level;

#[derive(Debug, Serialize)]
pub struct LevelRow {
    pub name: &'static str,
    pub value: i8,
}

#[derive(Debug, Serialize)]
pub struct LevelsOutput {
    pub levels: Vec<LevelRow>,
}

impl LevelsOutput {
    pub fn collect() -> Self {
        let levels = Level::ALL
            .iter()
            .filter_map(|l| {
                l.name().map(|name| LevelRow {
                    name,
                    value: l.as_i8(),
                })
            })
            .collect();
        Self { levels }
    }
}

impl CommandOutput for LevelsOutput {
    fn to_human(&self) -> String {
        self.levels
            .iter()
            .map(|row| format!("{:>3}  {}", row.value, row.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(json_mode: bool) {
    output(&LevelsOutput::collect(), json_mode);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_listed_in_order() {
        let out = LevelsOutput::collect();
        let names: Vec<_> = out.levels.iter().map(|r| r.name).collect();
        assert_eq!(names, ["trace", "debug", "info", "warn", "error", "fatal", "panic"]);
        assert_eq!(out.levels[0].value, -1);
    }

    #[test]
    fn test_human_output() {
        let human = LevelsOutput::collect().to_human();
        assert!(human.starts_with(" -1  trace"));
        assert!(human.ends_with("  5  panic"));
    }

    #[test]
    fn test_json_output() {
        let json = LevelsOutput::collect().to_json();
        assert_eq!(json["levels"][2]["name"], "info");
        assert_eq!(json["levels"][2]["value"], 1);
    }
}
