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

//! Asymptotically optimal RRT* path planning in a bounded plane with circular obstacles.
//!
//! The generic pieces ([`tree::Tree`], [`planning::rrtstar::rrtstar`]) work on any value type
//! implementing [`tree::Distance`]. [`planning::rrtstar::plan`] binds them to 2D points, disc
//! obstacles and a seeded goal-biased sampler.

pub mod error;
pub mod geometry;
pub mod planning;
pub mod scenario;
pub mod tree;

pub use error::{ConfigError, PlanningError, TreeError};
pub use geometry::{CircleObstacle, Point2D, Workspace};
pub use planning::config::RrtStarConfig;
pub use planning::rrtstar::{plan, plan_until, PlanResult, Termination};
pub use scenario::Scenario;
pub use tree::{Distance, NodeId, Tree};
