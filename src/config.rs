use crate::rule::{self, Rule};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Deserialize, Serialize, Debug)]
pub struct Config {
    pub llm: LlmConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Rule catalog; falls back to the built-in catalog when omitted
    #[serde(default = "rule::default_catalog")]
    pub rules: Vec<Rule>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// 0 aims for deterministic, consistent evaluator output
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct WorkerConfig {
    /// How many rules to evaluate concurrently (1 = sequential)
    #[serde(default = "default_max_parallel_rules")]
    pub max_parallel_rules: usize,
    /// Per-evaluator deadline; a timed-out rule yields zero violations
    #[serde(default = "default_evaluator_timeout_secs")]
    pub evaluator_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_parallel_rules: default_max_parallel_rules(),
            evaluator_timeout_secs: default_evaluator_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-4o-mini".into(),
                temperature: default_temperature(),
                max_tokens: None,
            },
            worker: WorkerConfig::default(),
            rules: rule::default_catalog(),
        }
    }
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_parallel_rules() -> usize {
    1
}

fn default_evaluator_timeout_secs() -> u64 {
    60
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}
