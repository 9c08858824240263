//! Augmented AVL interval tree
//!
//! Nodes are ordered by `interval.low` and each one caches the largest
//! `high` bound in its subtree, which lets an overlap query follow a single
//! root-to-leaf path. Nodes live in a `Vec` arena and refer to their children
//! by index; the tree is append-only.

use crate::types::Interval;

/// Index into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct TreeNode<T> {
    interval: Interval,
    payload: T,
    /// Largest `high` over this node and both subtrees
    max_high: i64,
    /// Leaves have height 1
    height: u32,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// A height-balanced interval tree keyed by `interval.low`
///
/// Intervals with equal `low` are placed in the right subtree.
#[derive(Debug, Clone)]
pub struct IntervalTree<T = usize> {
    nodes: Vec<TreeNode<T>>,
    root: Option<NodeId>,
}

impl<T> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalTree<T> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Create an empty tree with room for `capacity` intervals
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Number of stored intervals
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Largest `high` bound stored in the tree
    pub fn max_high(&self) -> Option<i64> {
        self.max_high_of(self.root)
    }

    /// Insert an interval with its payload, rebalancing on the way back up
    pub fn insert(&mut self, interval: Interval, payload: T) {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode {
            interval,
            payload,
            max_high: interval.high,
            height: 1,
            left: None,
            right: None,
        });
        let root = self.insert_below(self.root, id);
        self.root = Some(root);
    }

    /// Find one stored interval overlapping `query`
    ///
    /// This is an existence query: when several intervals overlap, which one
    /// is returned depends on the shape of the tree. Only the left subtree
    /// can be skipped safely, so the walk goes left whenever the left child's
    /// `max_high` reaches `query.low` and right otherwise.
    pub fn overlap_search(&self, query: Interval) -> Option<(Interval, &T)> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.interval.overlaps(&query) {
                return Some((node.interval, &node.payload));
            }
            cursor = match node.left {
                Some(left) if self.node(left).max_high >= query.low => Some(left),
                _ => node.right,
            };
        }
        None
    }

    /// Ascending traversal of the stored intervals
    ///
    /// The iterator is lazy; call again to restart.
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder {
            tree: self,
            stack: Vec::with_capacity(self.height() as usize),
            cursor: self.root,
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    #[inline]
    fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<T> {
        &mut self.nodes[id.index()]
    }

    fn height_of(&self, node: Option<NodeId>) -> u32 {
        node.map_or(0, |id| self.node(id).height)
    }

    fn max_high_of(&self, node: Option<NodeId>) -> Option<i64> {
        node.map(|id| self.node(id).max_high)
    }

    fn balance_factor(&self, id: NodeId) -> i64 {
        let node = self.node(id);
        self.height_of(node.left) as i64 - self.height_of(node.right) as i64
    }

    /// Recompute `height` and `max_high` from the children
    fn refresh(&mut self, id: NodeId) {
        let (left, right, own_high) = {
            let node = self.node(id);
            (node.left, node.right, node.interval.high)
        };
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let max_high = [self.max_high_of(left), self.max_high_of(right)]
            .into_iter()
            .flatten()
            .fold(own_high, i64::max);

        let node = self.node_mut(id);
        node.height = height;
        node.max_high = max_high;
    }

    /// Insert `new` into the subtree rooted at `subtree`, returning the new
    /// subtree root
    fn insert_below(&mut self, subtree: Option<NodeId>, new: NodeId) -> NodeId {
        let Some(root) = subtree else {
            return new;
        };

        let key = self.node(new).interval.low;
        if key < self.node(root).interval.low {
            let child = self.insert_below(self.node(root).left, new);
            self.node_mut(root).left = Some(child);
        } else {
            let child = self.insert_below(self.node(root).right, new);
            self.node_mut(root).right = Some(child);
        }

        self.refresh(root);
        let balance = self.balance_factor(root);

        if balance > 1 {
            if let Some(left) = self.node(root).left {
                // Left-right: the new key went into the left child's right subtree
                if key >= self.node(left).interval.low {
                    let rotated = self.rotate_left(left);
                    self.node_mut(root).left = Some(rotated);
                }
                return self.rotate_right(root);
            }
        } else if balance < -1 {
            if let Some(right) = self.node(root).right {
                // Right-left: the new key went into the right child's left subtree
                if key < self.node(right).interval.low {
                    let rotated = self.rotate_right(right);
                    self.node_mut(root).right = Some(rotated);
                }
                return self.rotate_left(root);
            }
        }

        root
    }

    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let Some(x) = self.node(y).left else {
            return y;
        };
        let t2 = self.node(x).right;

        self.node_mut(x).right = Some(y);
        self.node_mut(y).left = t2;

        self.refresh(y);
        self.refresh(x);
        x
    }

    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.node(x).right else {
            return x;
        };
        let t2 = self.node(y).left;

        self.node_mut(y).left = Some(x);
        self.node_mut(x).right = t2;

        self.refresh(x);
        self.refresh(y);
        y
    }
}

impl<T> FromIterator<(Interval, T)> for IntervalTree<T> {
    fn from_iter<I: IntoIterator<Item = (Interval, T)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut tree = Self::with_capacity(iter.size_hint().0);
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<(Interval, T)> for IntervalTree<T> {
    fn extend<I: IntoIterator<Item = (Interval, T)>>(&mut self, iter: I) {
        for (interval, payload) in iter {
            self.insert(interval, payload);
        }
    }
}

impl<'a, T> IntoIterator for &'a IntervalTree<T> {
    type Item = TreeEntry<'a, T>;
    type IntoIter = Inorder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inorder()
    }
}

// ----------------------------------------------------------------------------
// Inorder iterator
// ----------------------------------------------------------------------------

/// One stored interval as seen by the inorder traversal
#[derive(Debug, PartialEq, Eq)]
pub struct TreeEntry<'a, T> {
    pub interval: Interval,
    /// Largest `high` in the subtree rooted at this entry
    pub max_high: i64,
    pub payload: &'a T,
}

/// Lazy ascending traversal over an [`IntervalTree`]
#[derive(Debug)]
pub struct Inorder<'a, T> {
    tree: &'a IntervalTree<T>,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl<T> Clone for Inorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            cursor: self.cursor,
        }
    }
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = TreeEntry<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = tree.node(id).left;
        }

        let id = self.stack.pop()?;
        let node = tree.node(id);
        self.cursor = node.right;
        Some(TreeEntry {
            interval: node.interval,
            max_high: node.max_high,
            payload: &node.payload,
        })
    }
}

impl<T> std::iter::FusedIterator for Inorder<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(low: i64, high: i64) -> Interval {
        Interval::new(low, high)
    }

    fn root_low<T>(tree: &IntervalTree<T>) -> i64 {
        tree.node(tree.root.unwrap()).interval.low
    }

    /// Walk the tree checking AVL balance, cached heights and `max_high`.
    /// Returns (height, max_high) of the subtree.
    fn check_subtree<T>(tree: &IntervalTree<T>, node: Option<NodeId>) -> (u32, Option<i64>) {
        let Some(id) = node else {
            return (0, None);
        };
        let n = tree.node(id);
        let (lh, lmax) = check_subtree(tree, n.left);
        let (rh, rmax) = check_subtree(tree, n.right);

        assert!((lh as i64 - rh as i64).abs() <= 1, "unbalanced at {}", n.interval);
        assert_eq!(n.height, 1 + lh.max(rh));

        let expected = [lmax, rmax]
            .into_iter()
            .flatten()
            .fold(n.interval.high, i64::max);
        assert_eq!(n.max_high, expected, "stale max at {}", n.interval);

        if let Some(left) = n.left {
            assert!(tree.node(left).interval.low < n.interval.low);
        }
        if let Some(right) = n.right {
            assert!(tree.node(right).interval.low >= n.interval.low);
        }
        (n.height, Some(expected))
    }

    #[test]
    fn test_empty_tree() {
        let tree: IntervalTree = IntervalTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.max_high(), None);
        assert!(tree.overlap_search(iv(0, 100)).is_none());
        assert_eq!(tree.inorder().count(), 0);
    }

    #[test]
    fn test_single_insert() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(0, 50), 0usize);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.overlap_search(iv(10, 12)), Some((iv(0, 50), &0)));
        assert!(tree.overlap_search(iv(51, 60)).is_none());
    }

    #[test]
    fn test_right_right_rotation() {
        let tree: IntervalTree = [(iv(10, 11), 0), (iv(20, 21), 1), (iv(30, 31), 2)]
            .into_iter()
            .collect();
        assert_eq!(root_low(&tree), 20);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_left_left_rotation() {
        let tree: IntervalTree = [(iv(30, 31), 0), (iv(20, 21), 1), (iv(10, 11), 2)]
            .into_iter()
            .collect();
        assert_eq!(root_low(&tree), 20);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_left_right_rotation() {
        let tree: IntervalTree = [(iv(30, 31), 0), (iv(10, 11), 1), (iv(20, 21), 2)]
            .into_iter()
            .collect();
        assert_eq!(root_low(&tree), 20);
        check_subtree(&tree, tree.root);
    }

    #[test]
    fn test_right_left_rotation() {
        let tree: IntervalTree = [(iv(10, 11), 0), (iv(30, 31), 1), (iv(20, 21), 2)]
            .into_iter()
            .collect();
        assert_eq!(root_low(&tree), 20);
        check_subtree(&tree, tree.root);
    }

    #[test]
    fn test_equal_keys_go_right() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(5, 10), 0usize);
        tree.insert(iv(5, 20), 1);

        let root = tree.node(tree.root.unwrap());
        assert!(root.left.is_none());
        assert!(root.right.is_some());
        assert_eq!(tree.max_high(), Some(20));
    }

    #[test]
    fn test_max_high_survives_rotation() {
        // The wide interval ends up as a leaf after rebalancing
        let tree: IntervalTree = [(iv(0, 1000), 0), (iv(10, 11), 1), (iv(20, 21), 2)]
            .into_iter()
            .collect();
        assert_eq!(root_low(&tree), 10);
        assert_eq!(tree.max_high(), Some(1000));
        check_subtree(&tree, tree.root);
        assert_eq!(tree.overlap_search(iv(500, 501)), Some((iv(0, 1000), &0)));
    }

    #[test]
    fn test_overlap_search_paragraphs() {
        let tree: IntervalTree = [(iv(0, 50), 0), (iv(60, 120), 1), (iv(130, 200), 2)]
            .into_iter()
            .collect();

        assert_eq!(tree.overlap_search(iv(10, 12)).map(|(_, p)| *p), Some(0));
        assert_eq!(tree.overlap_search(iv(70, 72)).map(|(_, p)| *p), Some(1));
        assert_eq!(tree.overlap_search(iv(199, 250)).map(|(_, p)| *p), Some(2));
        assert!(tree.overlap_search(iv(51, 59)).is_none());
        assert!(tree.overlap_search(iv(201, 300)).is_none());
    }

    #[test]
    fn test_overlap_returns_a_witness() {
        // A query spanning two paragraphs gets exactly one of them back
        let tree: IntervalTree = [(iv(0, 50), 0), (iv(60, 120), 1)].into_iter().collect();
        let (interval, payload) = tree.overlap_search(iv(40, 70)).unwrap();
        assert!(interval.overlaps(&iv(40, 70)));
        assert!(*payload == 0 || *payload == 1);
    }

    #[test]
    fn test_inorder_is_ascending_and_restartable() {
        let lows = [50, 10, 40, 20, 30, 60, 0];
        let tree: IntervalTree = lows
            .iter()
            .enumerate()
            .map(|(i, &low)| (iv(low, low + 5), i))
            .collect();

        let first: Vec<i64> = tree.inorder().map(|e| e.interval.low).collect();
        assert_eq!(first, vec![0, 10, 20, 30, 40, 50, 60]);

        let second: Vec<i64> = (&tree).into_iter().map(|e| e.interval.low).collect();
        assert_eq!(first, second);

        let payloads: Vec<usize> = tree.inorder().map(|e| *e.payload).collect();
        assert_eq!(payloads, vec![6, 1, 3, 4, 2, 0, 5]);
    }

    #[test]
    fn test_inorder_is_lazy() {
        let tree: IntervalTree = (0..100).map(|i| (iv(i * 10, i * 10 + 5), i as usize)).collect();
        let mut iter = tree.inorder();
        assert_eq!(iter.next().map(|e| e.interval.low), Some(0));
        let resumed = iter.clone();
        assert_eq!(iter.count(), 99);
        assert_eq!(resumed.count(), 99);
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let tree: IntervalTree = (0..1024).map(|i| (iv(i, i + 1), i as usize)).collect();
        check_subtree(&tree, tree.root);
        assert_eq!(tree.height(), 11);
    }
}
