// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scan configuration: `polyscan.toml` plus environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::io::ImportCoordinator;
use crate::spatial::DEFAULT_NEIGHBORS;

/// File looked up in the working directory by [`ScanConfig::load`]
pub const CONFIG_FILE: &str = "polyscan.toml";

/// Import and analysis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Import on all hardware threads
    pub parallel: bool,
    /// Explicit worker count, overrides `parallel`
    pub workers: Option<usize>,
    /// Neighbour count for the mean nearest-neighbour distance
    pub neighbors: usize,
    /// Seed for vertex sampling; entropy when absent
    pub sample_seed: Option<u64>,
    /// tracing filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: None,
            neighbors: DEFAULT_NEIGHBORS,
            sample_seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ScanConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `polyscan.toml` when present, then apply environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `POLYSCAN_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(parallel) = lookup("POLYSCAN_PARALLEL") {
            self.parallel = parse_bool(&parallel)
                .with_context(|| format!("Invalid POLYSCAN_PARALLEL value: {:?}", parallel))?;
        }

        if let Some(workers) = lookup("POLYSCAN_WORKERS") {
            self.workers = Some(
                workers
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid POLYSCAN_WORKERS value: {:?}", workers))?,
            );
        }

        if let Some(neighbors) = lookup("POLYSCAN_NEIGHBORS") {
            self.neighbors = neighbors
                .trim()
                .parse()
                .with_context(|| format!("Invalid POLYSCAN_NEIGHBORS value: {:?}", neighbors))?;
        }

        if let Some(seed) = lookup("POLYSCAN_SEED") {
            self.sample_seed = Some(
                seed.trim()
                    .parse()
                    .with_context(|| format!("Invalid POLYSCAN_SEED value: {:?}", seed))?,
            );
        }

        if let Some(filter) = lookup("POLYSCAN_LOG") {
            self.log_filter = filter;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Import coordinator honouring `workers`, else `parallel`
    pub fn coordinator(&self) -> ImportCoordinator {
        match self.workers {
            Some(workers) => ImportCoordinator::with_workers(workers),
            None => ImportCoordinator::new(self.parallel),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
