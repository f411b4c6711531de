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

//! Arena tree storing vertices with arbitrary data types along with their cost from the root.
//! Types must implement a distance trait to enable nearest neighbor queries and cost bookkeeping.
use crate::error::TreeError;
use ordered_float::OrderedFloat;
use std::collections::VecDeque;

/// Costs that differ by less than this are considered unchanged during propagation.
pub const COST_TOLERANCE: f64 = 1e-9;

/// Stable handle to a node in a [Tree].
///
/// Handles are indices into the tree's node storage, nodes are never removed so a handle
/// stays valid for the lifetime of the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in creation order, the root is 0.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Basic node element for the tree.
///
/// Must be used with [Tree] since the parent is referenced by index in the [Tree]'s node vector.
/// Children are never stored, they are derived by scanning for nodes with a matching parent.
#[derive(Debug, Clone)]
struct Node<T> {
    // The value of this node.
    value: T,

    // Location of the nodes parent, if available
    parent: Option<usize>,

    // Sum of edge lengths along the parent chain to the root.
    cost: f64,
}

impl<T> Node<T> {
    fn new(value: T, parent: Option<usize>, cost: f64) -> Self {
        Node {
            value,
            parent,
            cost,
        }
    }
}

/// Define a distance trait for tree node values.
pub trait Distance {
    fn distance(&self, other: &Self) -> f64;
}

/// DFS Iterator for a [Tree]
///
/// Child lists are computed once when the iterator is built, children are visited in
/// creation order.
pub struct DepthFirstIterator<'a, T> {
    tree: &'a Tree<T>,
    children: Vec<Vec<usize>>,
    stack: Vec<usize>,
}

impl<'a, T> DepthFirstIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        let mut children = vec![Vec::new(); tree.nodes.len()];
        for (i, node) in tree.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                children[parent].push(i);
            }
        }

        // Root is always idx 0
        DepthFirstIterator {
            tree,
            children,
            stack: vec![0],
        }
    }
}

impl<'a, T> Iterator for DepthFirstIterator<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|index| {
            // Children should be pushed onto the stack in reverse order to ensure left-most
            // are processed first
            for &child_index in self.children[index].iter().rev() {
                self.stack.push(child_index);
            }
            (NodeId(index), &self.tree.nodes[index].value)
        })
    }
}

/// Cost-aware tree for use in sampling based search algorithms.
///
/// Provides functions for creating, growing, finding the nearest neighbors to `T`,
/// and re-parenting nodes while keeping every node's cost equal to the length of its
/// chain of parent links back to the root.
///
/// TODO: Neighbor queries are linear scans, a k-d tree would need to keep the
/// first-inserted tie-break to be a drop in replacement.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    // Detailed node data for the tree, in creation order. The root is always first.
    nodes: Vec<Node<T>>,
}

impl<T: Distance> Tree<T> {
    /// Construct a new tree with the specified value as the root node, with a cost of 0.
    ///
    /// The node will take ownership of the provided value.
    pub fn new(val: T) -> Self {
        Tree {
            nodes: vec![Node::new(val, None, 0.0)],
        }
    }

    /// Adds the value to the specified node's children.
    ///
    /// The cost of the new node is the parent's cost plus the distance between them.
    ///
    /// # Errors
    ///
    /// If the parent is not found in the tree.
    pub fn add_child(&mut self, parent: NodeId, child: T) -> Result<NodeId, TreeError> {
        let parent_node = self.node(parent)?;
        let cost = parent_node.cost + parent_node.value.distance(&child);

        let child_idx = self.nodes.len();
        self.nodes.push(Node::new(child, Some(parent.0), cost));
        Ok(NodeId(child_idx))
    }

    /// Return the number of nodes in the tree
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Handle to the root node
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the value stored at the node.
    ///
    /// # Errors
    ///
    /// If the node is not in the tree.
    pub fn value(&self, id: NodeId) -> Result<&T, TreeError> {
        self.node(id).map(|n| &n.value)
    }

    /// Returns the cost to reach the node from the root.
    ///
    /// # Errors
    ///
    /// If the node is not in the tree.
    pub fn cost(&self, id: NodeId) -> Result<f64, TreeError> {
        self.node(id).map(|n| n.cost)
    }

    /// Returns the parent of the node, or None for the root.
    ///
    /// # Errors
    ///
    /// If the node is not in the tree.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.node(id).map(|n| n.parent.map(NodeId))
    }

    /// Returns all nodes whose parent is the specified node, in creation order.
    ///
    /// # Errors
    ///
    /// If the node is not in the tree.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        self.node(id)?;
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Some(id.0))
            .map(|(i, _)| NodeId(i))
            .collect())
    }

    /// Returns the closest node to the specified value.
    ///
    /// Ties go to the node that was created first.
    pub fn nearest_neighbor(&self, val: &T) -> NodeId {
        // min_by_key keeps the first of equal elements
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, n)| OrderedFloat(val.distance(&n.value)))
            .map_or(self.root(), |(i, _)| NodeId(i))
    }

    /// Returns all nodes within `radius` (inclusive) of the specified value, in creation order.
    pub fn neighbors_within(&self, val: &T, radius: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| val.distance(&n.value) <= radius)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Returns true if `ancestor` appears on the parent chain of `node`, or is `node` itself.
    ///
    /// # Errors
    ///
    /// If either node is not in the tree.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool, TreeError> {
        self.node(ancestor)?;
        let mut cur = Some(self.node(node).map(|_| node.0)?);
        while let Some(idx) = cur {
            if idx == ancestor.0 {
                return Ok(true);
            }
            cur = self.nodes[idx].parent;
        }
        Ok(false)
    }

    /// Makes `parent` the new parent of `child`.
    ///
    /// The child's cost becomes the parent's cost plus the edge length, and the change is
    /// pushed down to every descendant of the child with [`Tree::propagate_costs`].
    ///
    /// # Errors
    ///
    /// If either node is not in the tree.
    /// If the child is the root.
    /// If the parent is the child or one of its descendants.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), TreeError> {
        self.node(child)?;
        if child == self.root() {
            return Err(TreeError::RootHasNoParent);
        }
        if self.is_ancestor(child, parent)? {
            return Err(TreeError::WouldCreateCycle { child, parent });
        }

        let parent_node = &self.nodes[parent.0];
        let cost = parent_node.cost + parent_node.value.distance(&self.nodes[child.0].value);
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent.0);
        node.cost = cost;

        self.propagate_costs(child)?;
        Ok(())
    }

    /// Recomputes the cost of every descendant of `changed` after its cost changed.
    ///
    /// Breadth first from `changed`. A child is only expanded further if its own cost moved
    /// by more than [`COST_TOLERANCE`], so unaffected subtrees are not visited.
    /// Returns the number of nodes whose cost was updated.
    ///
    /// # Errors
    ///
    /// If the node is not in the tree.
    pub fn propagate_costs(&mut self, changed: NodeId) -> Result<usize, TreeError> {
        self.node(changed)?;

        let mut updated = 0;
        let mut queue = VecDeque::from([changed.0]);
        while let Some(cur) = queue.pop_front() {
            let cur_cost = self.nodes[cur].cost;
            for i in 0..self.nodes.len() {
                if self.nodes[i].parent != Some(cur) {
                    continue;
                }
                let new_cost = cur_cost + self.nodes[cur].value.distance(&self.nodes[i].value);
                let old_cost = std::mem::replace(&mut self.nodes[i].cost, new_cost);
                if (new_cost - old_cost).abs() > COST_TOLERANCE {
                    updated += 1;
                    queue.push_back(i);
                }
            }
        }
        Ok(updated)
    }

    /// Returns an iterator over the node values in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), &n.value))
    }

    /// Returns every (child, parent) pair in creation order of the child, handy for plotting.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| (&n.value, &self.nodes[p].value)))
    }

    /// Returns a [`DepthFirstIterator`] for the tree
    pub fn iter_depth_first(&self) -> DepthFirstIterator<'_, T> {
        DepthFirstIterator::new(self)
    }

    fn node(&self, id: NodeId) -> Result<&Node<T>, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }
}

impl<T: Distance + Clone> Tree<T> {
    /// Returns a path from the root to the specified end point
    ///
    /// # Errors
    ///
    /// If the specified node is not found in the Tree
    pub fn path(&self, end: NodeId) -> Result<Vec<T>, TreeError> {
        // Must be a valid node
        self.node(end)?;

        // Build the path from end to beginning
        let mut path = Vec::new();

        // Loop until you get to the root
        let mut cur_idx = Some(end.0);
        while let Some(idx) = cur_idx {
            path.push(self.nodes[idx].value.clone());
            cur_idx = self.nodes[idx].parent;
        }

        // Reverse it to get the path in order
        path.reverse();
        Ok(path)
    }
}

//
// Unit tests
//

// Needed for distancing points on a line
#[cfg(test)]
impl Distance for i32 {
    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn id(i: usize) -> NodeId {
        NodeId(i)
    }

    #[test]
    fn test_tree_children() {
        // Construct tree with a single node
        let mut tree: Tree<i32> = Tree::new(1);
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.value(tree.root()).unwrap(), &1);
        assert_eq!(tree.cost(tree.root()).unwrap(), 0.0);

        // Add a child and make sure everything is ok
        let two = tree.add_child(tree.root(), 2).unwrap();
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.cost(two).unwrap(), 1.0);

        // Make the tree bigger
        let three = tree.add_child(tree.root(), 3).unwrap();
        let four = tree.add_child(two, 4).unwrap();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.cost(four).unwrap(), 3.0);
        assert_eq!(tree.children(tree.root()).unwrap(), vec![two, three]);
        assert_eq!(tree.parent(four).unwrap(), Some(two));
        assert_eq!(tree.parent(tree.root()).unwrap(), None);

        // Add to a nonexistent parent and everything is not ok
        assert_eq!(
            tree.add_child(id(10), 2),
            Err(TreeError::UnknownNode(id(10)))
        );
    }

    #[test]
    fn test_tree_get_nearest() {
        // Construct tree with many nodes
        let mut tree: Tree<i32> = Tree::new(1);

        let two = tree.add_child(tree.root(), 2).unwrap();
        tree.add_child(tree.root(), 3).unwrap();
        tree.add_child(two, 4).unwrap();
        tree.add_child(two, 5).unwrap();
        let six = tree.add_child(two, 6).unwrap();

        // Make assertions
        assert_eq!(tree.nearest_neighbor(&7), six);
        assert_eq!(tree.nearest_neighbor(&-1), tree.root());
        assert_eq!(tree.value(tree.nearest_neighbor(&3)).unwrap(), &3);
    }

    #[test]
    fn test_tree_nearest_prefers_first_inserted() {
        let mut tree: Tree<i32> = Tree::new(0);
        let first = tree.add_child(tree.root(), 4).unwrap();
        tree.add_child(tree.root(), 6).unwrap();

        // 5 is equally far from 4 and 6
        assert_eq!(tree.nearest_neighbor(&5), first);
    }

    #[test]
    fn test_tree_neighbors_within() {
        let mut tree: Tree<i32> = Tree::new(1);

        let two = tree.add_child(tree.root(), 2).unwrap();
        let four = tree.add_child(tree.root(), 4).unwrap();
        let five = tree.add_child(two, 5).unwrap();
        tree.add_child(four, 7).unwrap();

        // Radius is inclusive and results are in creation order
        assert_eq!(tree.neighbors_within(&4, 2.0), vec![two, four, five]);
        assert!(tree.neighbors_within(&20, 2.0).is_empty());
    }

    #[test]
    fn test_tree_dfs() {
        // Construct tree with many nodes
        let mut tree: Tree<i32> = Tree::new(1);

        let two = tree.add_child(tree.root(), 2).unwrap();
        let three = tree.add_child(tree.root(), 3).unwrap();
        tree.add_child(two, 4).unwrap();
        tree.add_child(two, 5).unwrap();
        tree.add_child(three, 6).unwrap();

        // Expected order
        let expected_dfs_order = vec![1, 2, 4, 5, 3, 6];
        let dfs_order: Vec<i32> = tree.iter_depth_first().map(|(_, v)| *v).collect();

        // Compare
        assert_eq!(dfs_order, expected_dfs_order);
    }

    #[test]
    fn test_tree_compute_back_path() {
        // Construct tree with many nodes
        let mut tree: Tree<i32> = Tree::new(1);

        let two = tree.add_child(tree.root(), 2).unwrap();
        let three = tree.add_child(tree.root(), 3).unwrap();
        tree.add_child(two, 4).unwrap();
        let five = tree.add_child(two, 5).unwrap();
        let seven = tree.add_child(three, 7).unwrap();
        let six = tree.add_child(five, 6).unwrap();

        // Verify expected paths to different nodes
        assert_eq!(tree.path(six).unwrap(), vec![1, 2, 5, 6]);
        assert_eq!(tree.path(seven).unwrap(), vec![1, 3, 7]);
        assert_eq!(tree.path(tree.root()).unwrap(), vec![1]);

        // Invalid node
        assert!(tree.path(id(8)).is_err());
    }

    #[test]
    fn test_set_parent_propagates_to_all_descendants() {
        // 0 -> 10 -> 12 -> 14 -> 15
        //   -> 3
        let mut tree: Tree<i32> = Tree::new(0);
        let ten = tree.add_child(tree.root(), 10).unwrap();
        let twelve = tree.add_child(ten, 12).unwrap();
        let fourteen = tree.add_child(twelve, 14).unwrap();
        let fifteen = tree.add_child(fourteen, 15).unwrap();
        let three = tree.add_child(tree.root(), 3).unwrap();
        assert_eq!(tree.cost(fifteen).unwrap(), 15.0);

        // Detour through 20 raises every cost below 12 by 16
        let twenty = tree.add_child(ten, 20).unwrap();
        tree.set_parent(twelve, twenty).unwrap();
        assert_eq!(tree.cost(twelve).unwrap(), 28.0);
        assert_eq!(tree.cost(fourteen).unwrap(), 30.0);
        assert_eq!(tree.cost(fifteen).unwrap(), 31.0);

        // Hanging 12 off 3 brings them back down
        tree.set_parent(twelve, three).unwrap();
        assert_eq!(tree.parent(twelve).unwrap(), Some(three));
        assert_eq!(tree.cost(twelve).unwrap(), 12.0);
        assert_eq!(tree.cost(fourteen).unwrap(), 14.0);
        assert_eq!(tree.cost(fifteen).unwrap(), 15.0);
        assert_eq!(tree.path(fifteen).unwrap(), vec![0, 3, 12, 14, 15]);
    }

    #[test]
    fn test_propagate_skips_unchanged_subtrees() {
        let mut tree: Tree<i32> = Tree::new(0);
        let one = tree.add_child(tree.root(), 1).unwrap();
        tree.add_child(one, 2).unwrap();

        // Nothing moved, nothing to update
        assert_eq!(tree.propagate_costs(tree.root()).unwrap(), 0);
    }

    #[test]
    fn test_set_parent_rejects_invalid_links() {
        let mut tree: Tree<i32> = Tree::new(0);
        let one = tree.add_child(tree.root(), 1).unwrap();
        let two = tree.add_child(one, 2).unwrap();

        assert_eq!(
            tree.set_parent(tree.root(), two),
            Err(TreeError::RootHasNoParent)
        );
        assert_eq!(
            tree.set_parent(one, two),
            Err(TreeError::WouldCreateCycle {
                child: one,
                parent: two
            })
        );
        assert_eq!(
            tree.set_parent(one, one),
            Err(TreeError::WouldCreateCycle {
                child: one,
                parent: one
            })
        );
        assert!(tree.set_parent(one, id(42)).is_err());

        // Failed calls leave the tree untouched
        assert_eq!(tree.parent(one).unwrap(), Some(tree.root()));
        assert!(approx_eq!(f64, tree.cost(two).unwrap(), 2.0, epsilon = COST_TOLERANCE));
    }

    #[test]
    fn test_edges() {
        let mut tree: Tree<i32> = Tree::new(0);
        let one = tree.add_child(tree.root(), 1).unwrap();
        tree.add_child(one, 2).unwrap();

        let edges: Vec<(i32, i32)> = tree.edges().map(|(c, p)| (*c, *p)).collect();
        assert_eq!(edges, vec![(1, 0), (2, 1)]);
    }
}
