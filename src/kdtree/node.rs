use std::fmt;

use crate::error::{KdIndexError, Result};

/// A node of an immutable binary tree.
///
/// A node is either [`Empty`][KDTreeNode::Empty] or holds exactly one value and two children,
/// either of which may be empty. Nodes are never modified after construction; rebuilding a tree
/// produces an entirely new node graph.
#[derive(Debug, Clone, PartialEq)]
pub enum KDTreeNode<T> {
    /// A node without a value or children.
    Empty,
    /// A node holding a value and its two subtrees.
    Node {
        /// The value stored at this node.
        value: T,
        /// Values on the lower side of this node's split.
        left: Box<KDTreeNode<T>>,
        /// Values on the upper side of this node's split.
        right: Box<KDTreeNode<T>>,
    },
}

/// A step in a path from a node to one of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Step into the left child.
    Left,
    /// Step into the right child.
    Right,
}

impl TryFrom<char> for Direction {
    type Error = KdIndexError;

    fn try_from(symbol: char) -> Result<Self> {
        match symbol {
            'L' | 'l' => Ok(Self::Left),
            'R' | 'r' => Ok(Self::Right),
            other => Err(KdIndexError::PathNotFound(format!(
                "invalid direction symbol {other:?}, expected L or R"
            ))),
        }
    }
}

impl<T> Default for KDTreeNode<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> KDTreeNode<T> {
    pub(crate) fn new(value: T, left: Self, right: Self) -> Self {
        Self::Node {
            value,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns `true` if this node holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The value at this node, or `None` if the node is empty.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Empty => None,
            Self::Node { value, .. } => Some(value),
        }
    }

    /// The left child of this node, or `None` if the node is empty.
    #[inline]
    pub fn left(&self) -> Option<&Self> {
        match self {
            Self::Empty => None,
            Self::Node { left, .. } => Some(left),
        }
    }

    /// The right child of this node, or `None` if the node is empty.
    #[inline]
    pub fn right(&self) -> Option<&Self> {
        match self {
            Self::Empty => None,
            Self::Node { right, .. } => Some(right),
        }
    }

    /// The child in the given direction, or `None` if the node is empty.
    #[inline]
    pub fn child(&self, direction: Direction) -> Option<&Self> {
        match direction {
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }

    /// The number of values in this subtree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// The height of this subtree. An empty node has depth 0 and a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Iterate over the values of this subtree in pre-order.
    pub fn iter(&self) -> Values<'_, T> {
        Values { stack: vec![self] }
    }

    /// Walk from this node along a path of `L`/`R` symbols and return the value at the end.
    ///
    /// An empty path returns this node's own value. Fails with
    /// [`PathNotFound`][KdIndexError::PathNotFound] if the path contains anything other than
    /// `L`/`R` (either case), steps out of an empty node, or ends on an empty node.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let tree = KDTree::try_new_with_items(1, vec![[1.0], [2.0], [3.0]]).unwrap();
    /// assert_eq!(tree.root().descend("L").unwrap(), &[1.0]);
    /// assert_eq!(tree.root().descend("R").unwrap(), &[3.0]);
    /// assert!(tree.root().descend("LL").is_err());
    /// ```
    pub fn descend(&self, path: &str) -> Result<&T> {
        let directions = path
            .chars()
            .map(Direction::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.descend_directions(directions)
    }

    /// Walk from this node along a sequence of directions and return the value at the end.
    pub fn descend_directions(
        &self,
        directions: impl IntoIterator<Item = Direction>,
    ) -> Result<&T> {
        let mut current = self;
        for (step, direction) in directions.into_iter().enumerate() {
            current = current.child(direction).ok_or_else(|| {
                KdIndexError::PathNotFound(format!(
                    "passed a leaf after {step} steps, cannot go {direction:?}"
                ))
            })?;
        }
        current.value().ok_or_else(|| {
            KdIndexError::PathNotFound("path ends on an empty node".to_string())
        })
    }
}

impl<T: fmt::Display> fmt::Display for KDTreeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty KDTreeNode"),
            Self::Node { value, left, right } => write!(
                f,
                "KDTreeNode{{Value at KDTreeNode = {value}, Left KDTreeNode = {left}, Right KDTreeNode = {right}}}"
            ),
        }
    }
}

impl<'a, T> IntoIterator for &'a KDTreeNode<T> {
    type Item = &'a T;
    type IntoIter = Values<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over the values of a subtree.
#[derive(Debug, Clone)]
pub struct Values<'a, T> {
    stack: Vec<&'a KDTreeNode<T>>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let KDTreeNode::Node { value, left, right } = node {
                self.stack.push(right);
                self.stack.push(left);
                return Some(value);
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn leaf(value: u32) -> KDTreeNode<u32> {
        KDTreeNode::new(value, KDTreeNode::Empty, KDTreeNode::Empty)
    }

    /// ```text
    ///       2
    ///      / \
    ///     1   4
    ///        /
    ///       3
    /// ```
    fn small_tree() -> KDTreeNode<u32> {
        KDTreeNode::new(
            2,
            leaf(1),
            KDTreeNode::new(4, leaf(3), KDTreeNode::Empty),
        )
    }

    #[test]
    fn empty_node() {
        let node = KDTreeNode::<u32>::Empty;
        assert!(node.is_empty());
        assert_eq!(node.value(), None);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.len(), 0);
        assert_eq!(node.depth(), 0);
        assert_eq!(node.to_string(), "Empty KDTreeNode");
    }

    #[test]
    fn accessors() {
        let tree = small_tree();
        assert_eq!(tree.value(), Some(&2));
        assert_eq!(tree.left().and_then(KDTreeNode::value), Some(&1));
        assert_eq!(tree.right().and_then(KDTreeNode::value), Some(&4));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2, 1, 4, 3]);
    }

    #[test]
    fn descend_follows_path() {
        let tree = small_tree();
        assert_eq!(tree.descend("").unwrap(), &2);
        assert_eq!(tree.descend("L").unwrap(), &1);
        assert_eq!(tree.descend("R").unwrap(), &4);
        assert_eq!(tree.descend("rl").unwrap(), &3);
        assert_eq!(
            tree.descend_directions([Direction::Right, Direction::Left])
                .unwrap(),
            &3
        );
    }

    #[test]
    fn descend_past_leaf_fails() {
        let tree = small_tree();
        // Ends on the empty child of a leaf
        assert!(matches!(
            tree.descend("LL"),
            Err(KdIndexError::PathNotFound(_))
        ));
        // Steps out of an empty node
        assert!(matches!(
            tree.descend("RRL"),
            Err(KdIndexError::PathNotFound(_))
        ));
        assert!(matches!(
            tree.descend("LRLR"),
            Err(KdIndexError::PathNotFound(_))
        ));
        assert!(KDTreeNode::<u32>::Empty.descend("").is_err());
    }

    #[test]
    fn descend_rejects_unknown_symbols() {
        let tree = small_tree();
        let err = tree.descend("LX").unwrap_err();
        assert!(err.to_string().contains("invalid direction symbol"));
    }

    #[test]
    fn display_nests_children() {
        let tree = KDTreeNode::new(2, leaf(1), KDTreeNode::Empty);
        assert_eq!(
            tree.to_string(),
            "KDTreeNode{Value at KDTreeNode = 2, \
             Left KDTreeNode = KDTreeNode{Value at KDTreeNode = 1, \
             Left KDTreeNode = Empty KDTreeNode, Right KDTreeNode = Empty KDTreeNode}, \
             Right KDTreeNode = Empty KDTreeNode}"
        );
    }
}
