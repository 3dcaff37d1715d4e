//! AST paths
//!
//! A root-to-leaf chain of nodes that all contain one source position.

use smallvec::SmallVec;

#[derive(Debug, Clone)]
pub struct AstPath<T> {
    path: SmallVec<[T; 8]>,
    pub position: usize,
}

impl<T: Copy> AstPath<T> {
    pub fn new(path: impl IntoIterator<Item = T>, position: usize) -> Self {
        AstPath {
            path: path.into_iter().collect(),
            position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// The outermost node.
    pub fn head(&self) -> Option<T> {
        self.path.first().copied()
    }

    /// The innermost node.
    pub fn tail(&self) -> Option<T> {
        self.path.last().copied()
    }

    /// Nodes from outermost to innermost.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = T> + '_ {
        self.path.iter().copied()
    }

    /// The nearest node (searching from the tail outwards) accepted by `select`.
    pub fn first<U>(&self, select: impl FnMut(T) -> Option<U>) -> Option<U> {
        self.path.iter().rev().copied().find_map(select)
    }

    pub fn push(&mut self, node: T) {
        self.path.push(node);
    }
}
