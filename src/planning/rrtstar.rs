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

// x_new = Steer(Nearest(G, Sample()))
// if edge(x_nearest, x_new) is blocked: continue
// X_near = Near(G, x_new, r(n))
// parent = argmin over {x_nearest} + X_near of cost(x) + |x - x_new|, edge free
// G.add(parent -> x_new)
// for x in X_near: if cost(x_new) + |x_new - x| < cost(x) and edge free: reparent x
// if |x_new - goal| <= threshold and edge free: G.add(x_new -> goal), return path

use crate::error::{PlanningError, TreeError};
use crate::geometry::{edge_blocked, steer, CircleObstacle, Point2D, Workspace};
use crate::planning::config::RrtStarConfig;
use crate::tree::{Distance, NodeId, Tree, COST_TOLERANCE};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Why a planning run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The goal was connected to the tree.
    GoalReached,
    /// `max_iterations` samples were drawn without reaching the goal.
    IterationsExhausted,
    /// The caller's stop check returned true between two iterations.
    Stopped,
}

/// Outcome of a planning run.
///
/// The tree is always returned, including when no path was found, so callers can inspect or
/// render how far the search got.
#[derive(Debug, Clone)]
pub struct PlanResult<T> {
    /// Points from the start to the goal, `None` if the goal was never connected
    pub path: Option<Vec<T>>,
    /// The tree as it stood when the run ended
    pub tree: Tree<T>,
    /// The goal's node, if it was connected
    pub goal: Option<NodeId>,
    /// Number of sampling iterations executed
    pub iterations: usize,
    pub termination: Termination,
}

impl<T> PlanResult<T> {
    #[must_use]
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Attempts to randomly extend the tree in an arbitrary direction.
/// Return the new point and its nearest neighbor in the tree if the connecting edge is valid.
/// Otherwise return None.
fn extend_tree<T, FS, FE, FC>(
    tree: &Tree<T>,
    sample: &mut FS,
    extend: &mut FE,
    connectable: &mut FC,
) -> Result<Option<(T, NodeId)>, TreeError>
where
    T: Distance,
    FS: FnMut() -> T,
    FE: FnMut(&T, &T) -> T,
    FC: FnMut(&T, &T) -> bool,
{
    // Sample, grab the nearest point, and extend in that direction
    let s = sample();
    let nearest = tree.nearest_neighbor(&s);
    let nearest_value = tree.value(nearest)?;
    let new_point = extend(nearest_value, &s);

    // If it is an invalid point try again
    if !connectable(nearest_value, &new_point) {
        return Ok(None);
    }

    Ok(Some((new_point, nearest)))
}

/// Radius of the neighborhood considered when adding a node to a tree of `tree_size` nodes.
///
/// `min(gamma * (ln(n) / n)^(1 / dim), step_size * radius_cap)` with `n = tree_size + 1`.
#[must_use]
pub fn rewire_radius(tree_size: usize, config: &RrtStarConfig) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = (tree_size + 1) as f64;
    let shrinking = config.gamma * (n.ln() / n).powf(1.0 / f64::from(config.dim));
    shrinking.min(config.step_size * config.radius_cap)
}

/// Picks the cheapest valid parent for `candidate`.
///
/// `nearest` is tried first and is assumed to be connectable, it was validated while extending.
/// A neighbor replaces the current best only if it is strictly cheaper, so ties keep the
/// earliest candidate.
///
/// # Errors
///
/// If any of the provided nodes are not in the tree.
pub fn choose_parent<T, FC>(
    tree: &Tree<T>,
    candidate: &T,
    nearest: NodeId,
    neighbors: &[NodeId],
    connectable: &mut FC,
) -> Result<NodeId, TreeError>
where
    T: Distance,
    FC: FnMut(&T, &T) -> bool,
{
    let mut best = nearest;
    let mut best_cost = tree.cost(nearest)? + tree.value(nearest)?.distance(candidate);

    for &neighbor in neighbors {
        if neighbor == nearest {
            continue;
        }
        let value = tree.value(neighbor)?;
        let cost = tree.cost(neighbor)? + value.distance(candidate);
        if cost < best_cost && connectable(value, candidate) {
            best = neighbor;
            best_cost = cost;
        }
    }
    Ok(best)
}

/// Re-parents any neighbor that is cheaper to reach through `new_node`.
///
/// Cost changes are pushed down to the rewired nodes' descendants.
/// Returns the number of rewired neighbors.
///
/// # Errors
///
/// If any of the provided nodes are not in the tree.
pub fn rewire_tree<T, FC>(
    tree: &mut Tree<T>,
    connectable: &mut FC,
    new_node: NodeId,
    neighbors: &[NodeId],
) -> Result<usize, TreeError>
where
    T: Distance,
    FC: FnMut(&T, &T) -> bool,
{
    let node_cost = tree.cost(new_node)?;
    let mut rewired = 0;
    for &neighbor in neighbors {
        // Covers the new node's parent and the root
        if tree.is_ancestor(neighbor, new_node)? {
            continue;
        }

        // If it's cheaper and valid to get to the neighbor from the new node reparent it
        let new_cost = node_cost + tree.value(new_node)?.distance(tree.value(neighbor)?);
        if new_cost < tree.cost(neighbor)?
            && connectable(tree.value(new_node)?, tree.value(neighbor)?)
        {
            tree.set_parent(neighbor, new_node)?;
            rewired += 1;
            trace!(
                "[RrtStar] rewired node {} under {}, cost now {:.3}",
                neighbor.index(),
                new_node.index(),
                new_cost
            );
        }
    }
    Ok(rewired)
}

/// Implementation of the RRT* planning algorithm.
///
/// Will attempt to compute a path from `start` to `goal` given user-defined sampling, steering
/// and edge validation functions.
///
/// # Parameters
///
/// - `start`: The root of the tree
/// - `goal`: The point to connect to
/// - `sample`: Function to randomly sample the configuration space
/// - `extend`: Given the nearest node and a sample, returns the point to add, at most one step away
/// - `connectable`: Function to determine whether or not a link can be added between two points
/// - `config`: Iteration budget, goal threshold and rewire radius parameters
/// - `should_stop`: Checked with the current tree before every iteration, returning true ends the run
///
/// # Returns
///
/// A [`PlanResult`] holding the path if the goal was connected, and the tree in every case.
/// When `start` and `goal` coincide the single point path is returned without sampling.
///
/// # Errors
///
/// If the configuration is invalid.
pub fn rrtstar<T, FS, FE, FC, FT>(
    start: &T,
    goal: &T,
    mut sample: FS,
    mut extend: FE,
    mut connectable: FC,
    config: &RrtStarConfig,
    mut should_stop: FT,
) -> Result<PlanResult<T>, PlanningError>
where
    T: Distance + Clone,
    FS: FnMut() -> T,
    FE: FnMut(&T, &T) -> T,
    FC: FnMut(&T, &T) -> bool,
    FT: FnMut(&Tree<T>) -> bool,
{
    config.validate()?;
    let mut tree = Tree::new(start.clone());

    if start.distance(goal) <= COST_TOLERANCE {
        info!("[RrtStar] start coincides with the goal");
        return Ok(PlanResult {
            path: Some(vec![start.clone()]),
            goal: Some(tree.root()),
            tree,
            iterations: 0,
            termination: Termination::GoalReached,
        });
    }

    let mut iterations = 0;
    let mut termination = Termination::IterationsExhausted;
    while iterations < config.max_iterations {
        if should_stop(&tree) {
            termination = Termination::Stopped;
            break;
        }
        iterations += 1;

        // Sample the nearest point, and extend in that direction.
        // If we end up with a non-connectable result try again.
        let Some((new_point, nearest)) =
            extend_tree(&tree, &mut sample, &mut extend, &mut connectable)?
        else {
            continue;
        };

        let new_node = if config.rewire {
            let radius = rewire_radius(tree.size(), config);
            let neighbors = tree.neighbors_within(&new_point, radius);
            let parent = choose_parent(&tree, &new_point, nearest, &neighbors, &mut connectable)?;
            let new_node = tree.add_child(parent, new_point)?;
            rewire_tree(&mut tree, &mut connectable, new_node, &neighbors)?;
            new_node
        } else {
            tree.add_child(nearest, new_point)?
        };

        // If we have reached the goal ensure the link is added to the tree.
        let new_value = tree.value(new_node)?;
        if new_value.distance(goal) <= config.goal_threshold && connectable(new_value, goal) {
            let goal_node = tree.add_child(new_node, goal.clone())?;
            info!(
                "[RrtStar] goal connected after {} iterations, {} nodes, cost {:.3}",
                iterations,
                tree.size(),
                tree.cost(goal_node)?
            );
            return Ok(PlanResult {
                path: Some(tree.path(goal_node)?),
                goal: Some(goal_node),
                tree,
                iterations,
                termination: Termination::GoalReached,
            });
        }
    }

    debug!(
        "[RrtStar] no path after {} iterations ({:?}), {} nodes",
        iterations,
        termination,
        tree.size()
    );
    Ok(PlanResult {
        path: None,
        tree,
        goal: None,
        iterations,
        termination,
    })
}

/// Returns the goal with probability `goal_sample_rate`, otherwise a uniform sample of the
/// workspace.
pub fn sample_goal_biased<R: Rng>(
    rng: &mut R,
    workspace: &Workspace,
    goal: &Point2D,
    goal_sample_rate: f64,
) -> Point2D {
    if rng.gen::<f64>() < goal_sample_rate {
        *goal
    } else {
        workspace.sample(rng)
    }
}

/// Plans a collision free path between two points among circular obstacles.
///
/// The sampler is seeded from `config.seed`, so equal inputs produce equal trees and paths.
/// A start or goal inside an obstacle is not rejected, the run simply ends without a path.
///
/// # Errors
///
/// If the configuration or workspace is invalid.
pub fn plan(
    start: &Point2D,
    goal: &Point2D,
    workspace: &Workspace,
    obstacles: &[CircleObstacle],
    config: &RrtStarConfig,
) -> Result<PlanResult<Point2D>, PlanningError> {
    plan_until(start, goal, workspace, obstacles, config, |_| false)
}

/// Same as [`plan`], but `should_stop` is consulted with the current tree before every
/// iteration. Use it for deadlines or external cancellation flags.
///
/// # Errors
///
/// If the configuration or workspace is invalid.
pub fn plan_until<FT>(
    start: &Point2D,
    goal: &Point2D,
    workspace: &Workspace,
    obstacles: &[CircleObstacle],
    config: &RrtStarConfig,
    should_stop: FT,
) -> Result<PlanResult<Point2D>, PlanningError>
where
    FT: FnMut(&Tree<Point2D>) -> bool,
{
    workspace.validate()?;
    debug!(
        "[RrtStar] planning {} -> {} among {} obstacles, seed {}",
        start,
        goal,
        obstacles.len(),
        config.seed
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let sample_fn = || sample_goal_biased(&mut rng, workspace, goal, config.goal_sample_rate);
    let extend_fn = |from: &Point2D, to: &Point2D| steer(from, to, config.step_size);
    let connectable_fn =
        |from: &Point2D, to: &Point2D| !edge_blocked(from, to, obstacles, config.edge_resolution);

    rrtstar(
        start,
        goal,
        sample_fn,
        extend_fn,
        connectable_fn,
        config,
        should_stop,
    )
}

//
// Unit tests
//
