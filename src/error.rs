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

//! Error types for tree manipulation, configuration and planning.

use crate::tree::NodeId;
use thiserror::Error;

/// Errors raised by [`crate::tree::Tree`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} is not present in the tree")]
    UnknownNode(NodeId),

    #[error("the root node cannot be given a parent")]
    RootHasNoParent,

    #[error("making {parent:?} the parent of {child:?} would create a cycle")]
    WouldCreateCycle { child: NodeId, parent: NodeId },
}

/// Errors raised while loading or validating a planner configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that prevent a planning run from starting or completing.
///
/// Failing to find a path is not an error, see [`crate::planning::rrtstar::Termination`].
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid workspace: {0}")]
    Workspace(String),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}
