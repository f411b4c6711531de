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

//! A complete planning problem that can be stored as YAML.
//!
//! ```yaml
//! start: { x: 5.0, y: 5.0 }
//! goal: { x: 95.0, y: 95.0 }
//! workspace: { min_x: 0.0, max_x: 100.0, min_y: 0.0, max_y: 100.0 }
//! obstacles:
//!   - [40.0, 40.0, 10.0]
//! planner:
//!   step_size: 2.5
//! ```

use crate::error::{ConfigError, PlanningError};
use crate::geometry::{CircleObstacle, Point2D, Workspace};
use crate::planning::config::RrtStarConfig;
use crate::planning::rrtstar::{plan, PlanResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Start, goal, world and planner settings for a single run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub start: Point2D,
    pub goal: Point2D,
    #[serde(default)]
    pub workspace: Workspace,
    #[serde(default)]
    pub obstacles: Vec<CircleObstacle>,
    #[serde(default)]
    pub planner: RrtStarConfig,
}

impl Scenario {
    /// Load a scenario from a YAML file
    ///
    /// # Errors
    ///
    /// If the file cannot be read, parsed, or the planner settings are invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    ///
    /// If the YAML is malformed or the planner settings are invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.planner.validate()?;
        Ok(scenario)
    }

    /// Runs the planner on this scenario.
    ///
    /// # Errors
    ///
    /// If the planner settings or workspace are invalid.
    pub fn plan(&self) -> Result<PlanResult<Point2D>, PlanningError> {
        plan(
            &self.start,
            &self.goal,
            &self.workspace,
            &self.obstacles,
            &self.planner,
        )
    }
}
