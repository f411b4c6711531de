// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Tunable parameters for an RRT* run.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// RRT* settings.
///
/// Every field is optional when deserializing, missing fields take their default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RrtStarConfig {
    /// Maximum distance a new node may be placed from its nearest neighbor
    pub step_size: f64,

    /// Number of samples to attempt before giving up
    pub max_iterations: usize,

    /// Probability in [0, 1] of sampling the goal instead of the workspace
    pub goal_sample_rate: f64,

    /// Distance from a new node within which a connection to the goal is attempted
    pub goal_threshold: f64,

    /// Scale of the shrinking rewire radius
    pub gamma: f64,

    /// The rewire radius never exceeds `step_size * radius_cap`
    pub radius_cap: f64,

    /// Spacing of collision samples along an edge
    pub edge_resolution: f64,

    /// Dimensionality used in the rewire radius formula
    pub dim: u32,

    /// Seed for the sampler, runs with equal seeds are identical
    pub seed: u64,

    /// Choose parents and rewire neighbors (RRT*). When false new nodes are simply
    /// attached to their nearest neighbor (RRT).
    pub rewire: bool,
}

impl Default for RrtStarConfig {
    fn default() -> Self {
        Self {
            step_size: 2.0,
            max_iterations: 5000,
            goal_sample_rate: 0.05,
            goal_threshold: 2.0,
            gamma: 30.0,
            radius_cap: 50.0,
            edge_resolution: 1.0,
            dim: 2,
            seed: 0,
            rewire: true,
        }
    }
}

impl RrtStarConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// If the file cannot be read, parsed, or holds invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate from a YAML string
    ///
    /// # Errors
    ///
    /// If the YAML is malformed or holds invalid values.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("step_size", self.step_size),
            ("gamma", self.gamma),
            ("radius_cap", self.radius_cap),
            ("edge_resolution", self.edge_resolution),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.goal_sample_rate) {
            return Err(ConfigError::Invalid(format!(
                "goal_sample_rate must be within [0, 1], got {}",
                self.goal_sample_rate
            )));
        }
        if self.goal_threshold.is_nan() || self.goal_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "goal_threshold must be non-negative, got {}",
                self.goal_threshold
            )));
        }
        if self.dim == 0 {
            return Err(ConfigError::Invalid("dim must be at least 1".into()));
        }
        Ok(())
    }
}
