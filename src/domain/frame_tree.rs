use std::fmt;

use termtree::Tree;
use tracing::instrument;

/// Node of the range-dispatch tree built over an animation's frames.
///
/// Branch ranges are inclusive and their children partition the range
/// contiguously, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTreeNode<T> {
    Leaf {
        index: u32,
        item: T,
    },
    Branch {
        min: u32,
        max: u32,
        children: Vec<FrameTreeNode<T>>,
    },
}

impl<T> FrameTreeNode<T> {
    /// Lowest frame index covered by this node.
    pub fn min_index(&self) -> u32 {
        match self {
            FrameTreeNode::Leaf { index, .. } => *index,
            FrameTreeNode::Branch { min, .. } => *min,
        }
    }

    /// Highest frame index covered by this node.
    pub fn max_index(&self) -> u32 {
        match self {
            FrameTreeNode::Leaf { index, .. } => *index,
            FrameTreeNode::Branch { max, .. } => *max,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, FrameTreeNode::Leaf { .. })
    }

    pub fn children(&self) -> &[FrameTreeNode<T>] {
        match self {
            FrameTreeNode::Leaf { .. } => &[],
            FrameTreeNode::Branch { children, .. } => children,
        }
    }

    /// Number of edges on the longest path from this node to a leaf, plus one.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn branch_count(&self) -> usize {
        self.iter().filter(|n| !n.is_leaf()).count()
    }

    /// Leaf indices in ascending order.
    pub fn leaf_indices(&self) -> Vec<u32> {
        self.iter()
            .filter_map(|n| match n {
                FrameTreeNode::Leaf { index, .. } => Some(*index),
                FrameTreeNode::Branch { .. } => None,
            })
            .collect()
    }

    /// Descends through the branches covering `index` down to its leaf.
    pub fn find_leaf(&self, index: u32) -> Option<&T> {
        match self {
            FrameTreeNode::Leaf { index: i, item } => (*i == index).then_some(item),
            FrameTreeNode::Branch { children, .. } => children
                .iter()
                .find(|c| (c.min_index()..=c.max_index()).contains(&index))
                .and_then(|c| c.find_leaf(index)),
        }
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> FrameTreeIter<'_, T> {
        FrameTreeIter { stack: vec![self] }
    }

    /// Replaces every leaf payload, keeping the shape.
    pub fn map<U>(self, f: &mut impl FnMut(T) -> U) -> FrameTreeNode<U> {
        match self {
            FrameTreeNode::Leaf { index, item } => FrameTreeNode::Leaf {
                index,
                item: f(item),
            },
            FrameTreeNode::Branch { min, max, children } => FrameTreeNode::Branch {
                min,
                max,
                children: children.into_iter().map(|c| c.map(f)).collect(),
            },
        }
    }

    /// Renders the node ranges as a text tree.
    pub fn to_tree_string(&self) -> Tree<String> {
        match self {
            FrameTreeNode::Leaf { index, .. } => Tree::new(format!("leaf {}", index)),
            FrameTreeNode::Branch { min, max, children } => Tree::new(format!("[{}, {}]", min, max))
                .with_leaves(children.iter().map(|c| c.to_tree_string())),
        }
    }
}

impl<T> fmt::Display for FrameTreeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameTreeNode::Leaf { index, .. } => write!(f, "leaf {}", index),
            FrameTreeNode::Branch { min, max, .. } => write!(f, "branch {}..{}", min, max),
        }
    }
}

pub struct FrameTreeIter<'a, T> {
    stack: Vec<&'a FrameTreeNode<T>>,
}

impl<'a, T> Iterator for FrameTreeIter<'a, T> {
    type Item = &'a FrameTreeNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in current.children().iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}
