use crate::error::Result;
use crate::evidence::EvidentialValue;
use crate::genome::EvolutionMode;
use crate::mutation::MutationRates;
use crate::selection::Sampling;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reasoner constants that are not evolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarsConfig {
    pub global_buffer_capacity: usize,
    pub goal_buffer_capacity: usize,
    pub generalization: bool,
    pub generalization_confidence: f64,
    pub sensation_confidence: f64,
    pub default_judgment: EvidentialValue,
    pub default_goal: EvidentialValue,
}

impl Default for NarsConfig {
    fn default() -> Self {
        Self {
            global_buffer_capacity: 100,
            goal_buffer_capacity: 50,
            generalization: true,
            generalization_confidence: 0.9,
            sensation_confidence: 0.99,
            default_judgment: EvidentialValue::new(1.0, 0.9),
            default_goal: EvidentialValue::new(1.0, 0.9),
        }
    }
}

/// Relative weights of the structural belief edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralOdds {
    pub add: u32,
    pub remove: u32,
    pub modify: u32,
    /// Ignored when variables are disabled.
    pub toggle_variable: u32,
}

impl Default for StructuralOdds {
    fn default() -> Self {
        Self {
            add: 25,
            remove: 25,
            modify: 25,
            toggle_variable: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub mode: EvolutionMode,
    pub beliefs_chance: f64,
    pub belief_content_chance: f64,
    pub truth_values_chance: f64,
    pub personality_chance: f64,
    pub allow_variables: bool,
    pub odds: StructuralOdds,
    pub truth_rates: MutationRates,
    pub personality_rates: MutationRates,
    /// Exclusive upper bound on the number of beliefs a fresh genome starts with.
    pub max_initial_beliefs: usize,
    pub energy_term_chance: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mode: EvolutionMode::default(),
            beliefs_chance: 0.8,
            belief_content_chance: 0.8,
            truth_values_chance: 0.8,
            personality_chance: 0.8,
            allow_variables: true,
            odds: StructuralOdds::default(),
            truth_rates: MutationRates {
                mutate_chance: 0.5,
                replace_chance: 0.05,
                fraction: 0.1,
            },
            personality_rates: MutationRates {
                mutate_chance: 0.6,
                replace_chance: 0.05,
                fraction: 0.1,
            },
            max_initial_beliefs: 5,
            energy_term_chance: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub capacity: usize,
    pub sampling: Sampling,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            sampling: Sampling::ScoreWeighted,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nars: NarsConfig,
    pub evolution: EvolutionConfig,
    pub selection: SelectionConfig,
}

impl Config {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"nars": {"global_buffer_capacity": 7}}"#).unwrap();
        assert_eq!(config.nars.global_buffer_capacity, 7);
        assert_eq!(config.nars.goal_buffer_capacity, 50);
        assert_eq!(config.evolution, EvolutionConfig::default());
        assert_eq!(config.selection.capacity, 100);
    }

    #[test]
    fn config_survives_a_file_round_trip() {
        let path = std::env::temp_dir().join(format!("nars-evolve-config-{}.json", std::process::id()));
        let mut config = Config::default();
        config.evolution.allow_variables = false;
        config.selection.sampling = Sampling::RankWeighted;
        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
