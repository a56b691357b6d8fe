//! Elimination tree: unbalanced BST of admitted districts
//!
//! Uses arena allocation with stable `NodeId` handles. Freed slots are
//! recycled by later insertions.
//!
//! ## Architecture
//! - Level 2: Tree operations (insert, find, delete)
//! - Level 3: Link rewiring, arena slot management
//! - Level 4: Traversals, validation

use crate::district::{District, DistrictId};
use crate::error::GamesError;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A node of the elimination tree
#[derive(Clone, Debug)]
pub struct TreeNode {
    /// District payload; replaced in place by a two-child delete
    pub district: District,
    /// Subtree of identifiers less than this one
    pub left: Option<NodeId>,
    /// Subtree of identifiers greater than this one
    pub right: Option<NodeId>,
}

impl TreeNode {
    fn leaf(district: District) -> Self {
        Self {
            district,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

// ============================================================================
// ELIMINATION TREE (Level 2 - Tree Operations)
// ============================================================================

/// Binary search tree keyed by district identifier, never rebalanced
#[derive(Clone, Debug, Default)]
pub struct EliminationTree {
    /// Arena storage; `None` marks a freed slot
    nodes: Vec<Option<TreeNode>>,
    /// Freed slots available for reuse
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl EliminationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node id, if any district is still active
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// District held by the root node
    pub fn root_district(&self) -> Option<&District> {
        self.root.map(|id| &self.node(id).district)
    }

    /// Get a live node; `None` for freed or unknown ids
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Number of districts in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a district as a new leaf.
    ///
    /// Descends right on strictly greater identifiers and left otherwise.
    pub fn insert(&mut self, district: District) -> NodeId {
        let key = district.id;
        let Some(mut current) = self.root else {
            let id = self.alloc(TreeNode::leaf(district));
            self.root = Some(id);
            return id;
        };

        loop {
            let node = self.node(current);
            let next = if key > node.district.id {
                node.right
            } else {
                node.left
            };

            match next {
                Some(child) => current = child,
                None => {
                    let id = self.alloc(TreeNode::leaf(district));
                    let parent = self.node_mut(current);
                    if key > parent.district.id {
                        parent.right = Some(id);
                    } else {
                        parent.left = Some(id);
                    }
                    return id;
                }
            }
        }
    }

    /// Find a district by identifier
    pub fn find(&self, id: DistrictId) -> Option<&District> {
        self.locate(id)
            .map(|(_, node_id)| &self.node(node_id).district)
    }

    /// Find a district by identifier for mutation
    pub fn find_mut(&mut self, id: DistrictId) -> Option<&mut District> {
        let (_, node_id) = self.locate(id)?;
        Some(&mut self.node_mut(node_id).district)
    }

    pub fn contains(&self, id: DistrictId) -> bool {
        self.locate(id).is_some()
    }

    /// Remove a district, returning its payload. Absent ids are a no-op.
    ///
    /// A node with two children keeps its slot: it takes over the payload of
    /// its in-order successor, and the successor's slot is released instead.
    pub fn delete(&mut self, id: DistrictId) -> Option<District> {
        let (parent, target) = self.locate(id)?;
        let (left, right) = {
            let node = self.node(target);
            (node.left, node.right)
        };

        match (left, right) {
            (Some(_), Some(right)) => {
                let mut successor_parent = target;
                let mut successor = right;
                while let Some(next) = self.node(successor).left {
                    successor_parent = successor;
                    successor = next;
                }

                // The successor has no left child, so its right subtree
                // takes its place.
                let successor_right = self.node(successor).right;
                self.replace_child(Some(successor_parent), successor, successor_right);
                let successor_node = self.release(successor);

                let removed = std::mem::replace(
                    &mut self.node_mut(target).district,
                    successor_node.district,
                );
                Some(removed)
            }
            (child, None) | (None, child) => {
                self.replace_child(parent, target, child);
                Some(self.release(target).district)
            }
        }
    }

    // ========================================================================
    // Level 3: Link Rewiring and Arena Slots
    // ========================================================================

    /// Descend to `id`, returning (parent, node)
    fn locate(&self, id: DistrictId) -> Option<(Option<NodeId>, NodeId)> {
        let mut parent = None;
        let mut current = self.root;

        while let Some(node_id) = current {
            let node = self.node(node_id);
            if node.district.id == id {
                return Some((parent, node_id));
            }
            parent = Some(node_id);
            current = if id > node.district.id {
                node.right
            } else {
                node.left
            };
        }

        None
    }

    /// Point whichever link referenced `old` at `new` instead
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        let Some(parent) = parent else {
            self.root = new;
            return;
        };

        let node = self.node_mut(parent);
        if node.left == Some(old) {
            node.left = new;
        } else if node.right == Some(old) {
            node.right = new;
        } else {
            panic!("node {:?} is not a child of {:?}", old, parent);
        }
    }

    fn alloc(&mut self, node: TreeNode) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> TreeNode {
        match self.nodes[id.0].take() {
            Some(node) => {
                self.free.push(id);
                self.len -= 1;
                node
            }
            None => panic!("released node {:?} twice", id),
        }
    }

    fn node(&self, id: NodeId) -> &TreeNode {
        match &self.nodes[id.0] {
            Some(node) => node,
            None => panic!("dangling node id {:?}", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        match &mut self.nodes[id.0] {
            Some(node) => node,
            None => panic!("dangling node id {:?}", id),
        }
    }

    // ========================================================================
    // Level 4: Traversals and Validation
    // ========================================================================

    /// Districts in pre-order: node, then left subtree, then right subtree
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Identifiers in pre-order
    pub fn pre_order_ids(&self) -> Vec<DistrictId> {
        self.pre_order().map(|d| d.id).collect()
    }

    /// Identifiers in sorted (in-order) sequence
    pub fn in_order_ids(&self) -> Vec<DistrictId> {
        let mut ids = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).left;
            }
            if let Some(id) = stack.pop() {
                let node = self.node(id);
                ids.push(node.district.id);
                current = node.right;
            }
        }

        ids
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.node(id);
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }

        deepest
    }

    /// Check the ordering invariant and arena bookkeeping.
    ///
    /// Every identifier in a left subtree must be <= its ancestor and every
    /// identifier in a right subtree must be > it.
    pub fn validate(&self) -> Result<(), GamesError> {
        let mut seen = vec![false; self.nodes.len()];
        let mut visited = 0;
        // (node, exclusive lower bound, inclusive upper bound)
        let mut stack: Vec<(NodeId, Option<DistrictId>, Option<DistrictId>)> =
            self.root.map(|id| (id, None, None)).into_iter().collect();

        while let Some((id, lower, upper)) = stack.pop() {
            let node = self.get(id).ok_or_else(|| {
                GamesError::Inconsistent(format!("link to freed slot {:?}", id))
            })?;
            if std::mem::replace(&mut seen[id.0], true) {
                return Err(GamesError::Inconsistent(format!("node {:?} reachable twice", id)));
            }
            visited += 1;

            let key = node.district.id;
            if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key > hi) {
                return Err(GamesError::Inconsistent(format!(
                    "district {} violates bounds ({:?}, {:?}]",
                    key, lower, upper
                )));
            }

            if let Some(left) = node.left {
                stack.push((left, lower, Some(key)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(key), upper));
            }
        }

        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        if visited != self.len || live != self.len {
            return Err(GamesError::Inconsistent(format!(
                "len {} but {} reachable and {} live",
                self.len, visited, live
            )));
        }

        Ok(())
    }
}

/// Pre-order iterator using an explicit stack
pub struct PreOrder<'a> {
    tree: &'a EliminationTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a District;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(id);
        // Right first so the left subtree is visited first
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(&node.district)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn build(ids: &[DistrictId]) -> EliminationTree {
        let mut tree = EliminationTree::new();
        for &id in ids {
            tree.insert(District::new(id));
        }
        tree
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = EliminationTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert!(tree.find(1).is_none());
        assert!(tree.delete(1).is_none());
        assert!(tree.in_order_ids().is_empty());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_builds_expected_shape() {
        let tree = build(&[5, 3, 8, 1, 4, 7, 9]);

        assert_eq!(tree.len(), 7);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.root_district().map(|d| d.id), Some(5));
        assert_eq!(tree.in_order_ids(), vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(tree.pre_order_ids(), vec![5, 3, 1, 4, 8, 7, 9]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_sorted_insertion_degenerates_to_chain() {
        let tree = build(&[1, 2, 3, 4, 5]);
        assert_eq!(tree.depth(), 5);
        assert_eq!(tree.pre_order_ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insert_find_round_trip() {
        let ids = [50, 20, 70, 10, 30, 60, 80, 25];
        let tree = build(&ids);

        for id in ids {
            assert_eq!(tree.find(id).map(|d| d.id), Some(id));
        }
        assert!(tree.find(0).is_none());
        assert!(tree.find(55).is_none());
    }

    #[test]
    fn test_delete_leaf() {
        let mut tree = build(&[5, 3, 8]);
        let removed = tree.delete(3);

        assert_eq!(removed.map(|d| d.id), Some(3));
        assert_eq!(tree.in_order_ids(), vec![5, 8]);
        assert!(tree.find(3).is_none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_one_child() {
        let mut tree = build(&[5, 3, 8, 9]);
        tree.delete(8);

        assert_eq!(tree.in_order_ids(), vec![3, 5, 9]);
        let root = tree.get(tree.root().unwrap()).unwrap();
        let right = tree.get(root.right.unwrap()).unwrap();
        assert_eq!(right.district.id, 9);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_two_children_replaces_payload_in_place() {
        let mut tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        let root_before = tree.root().unwrap();

        let removed = tree.delete(5);

        assert_eq!(removed.map(|d| d.id), Some(5));
        assert_eq!(tree.root(), Some(root_before));
        assert_eq!(tree.root_district().map(|d| d.id), Some(7));
        assert_eq!(tree.in_order_ids(), vec![1, 3, 4, 7, 8, 9]);

        // 8 lost its left child (the node that held 7)
        let root = tree.get(root_before).unwrap();
        let eight = tree.get(root.right.unwrap()).unwrap();
        assert_eq!(eight.district.id, 8);
        assert!(eight.left.is_none());
        assert_eq!(tree.len(), 6);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_two_children_keeps_successor_right_subtree() {
        // Successor 6 has a right child 7
        let mut tree = build(&[5, 3, 10, 6, 12, 7]);
        tree.delete(5);

        assert_eq!(tree.root_district().map(|d| d.id), Some(6));
        assert_eq!(tree.in_order_ids(), vec![3, 6, 7, 10, 12]);
        assert!(tree.find(7).is_some());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_two_children_successor_is_right_child() {
        let mut tree = build(&[5, 3, 8, 9]);
        tree.delete(5);

        assert_eq!(tree.root_district().map(|d| d.id), Some(8));
        assert_eq!(tree.in_order_ids(), vec![3, 8, 9]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_root_with_one_child_promotes_child() {
        let mut tree = build(&[5, 3, 1]);
        tree.delete(5);

        assert_eq!(tree.root_district().map(|d| d.id), Some(3));
        assert_eq!(tree.in_order_ids(), vec![1, 3]);
    }

    #[test]
    fn test_delete_last_node_empties_tree() {
        let mut tree = build(&[5]);
        tree.delete(5);

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut tree = build(&[5, 3, 8]);
        assert!(tree.delete(42).is_none());
        assert_eq!(tree.in_order_ids(), vec![3, 5, 8]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut tree = build(&[5, 3, 8]);
        tree.delete(3);
        let id = tree.insert(District::new(2));

        assert_eq!(id, NodeId(1));
        assert_eq!(tree.in_order_ids(), vec![2, 5, 8]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_find_mut_edits_payload() {
        use crate::person::{Person, PersonId};

        let mut tree = build(&[5, 3]);
        let district = tree.find_mut(3).unwrap();
        district
            .add_person(Person::new(PersonId(0), "A", "B", 1, 20, 3, 5))
            .unwrap();

        assert_eq!(tree.find(3).unwrap().size(), 1);
        assert!(tree.find_mut(99).is_none());
    }

    #[test]
    fn test_random_deletes_preserve_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ids: Vec<DistrictId> = (0..64).collect();
        ids.shuffle(&mut rng);

        let mut tree = build(&ids);
        let mut remaining: Vec<DistrictId> = (0..64).collect();

        ids.shuffle(&mut rng);
        for id in ids {
            assert!(tree.delete(id).is_some());
            remaining.retain(|&r| r != id);

            assert!(tree.find(id).is_none());
            assert_eq!(tree.len(), remaining.len());
            assert_eq!(tree.in_order_ids(), remaining);
            assert!(tree.validate().is_ok());
        }

        assert!(tree.is_empty());
    }
}
