//! The public tree handle.
//!
//! A [`Tree`] is nothing more than an optional, shared root [`Node`]. Cloning
//! it is cheap and every operation that "changes" a tree returns a new one.
//!
//! # Examples
//!
//! ```
//! use functree::{Traversal, Tree};
//!
//! let tree = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));
//!
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.size(), 3);
//! assert!(tree.is_bst());
//!
//! // `map` builds a new tree, the original keeps its values.
//! let scaled = tree.map(|v| v * 10);
//! assert_eq!(scaled.values(Traversal::Inorder), vec![&20, &40, &60]);
//! assert_eq!(tree.values(Traversal::Inorder), vec![&2, &4, &6]);
//!
//! let without_two = tree.filter(|v| *v != 2);
//! assert_eq!(without_two.values(Traversal::Inorder), vec![&4, &6]);
//! ```

use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use log::debug;

use crate::node::{Link, Node, Transform};
use crate::owned::OwnedNode;
use crate::traversal::Traversal;

/// A binary tree of `T`s. Operations never modify a tree another handle can
/// see; `filter`, `map` and `lazy_map` all return new trees.
pub struct Tree<T> {
    root: Link<T>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Manual implementation of `Clone` so cloning a tree only bumps the root's
/// reference count and `T` doesn't have to be `Clone`.
impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.as_ref().map(Rc::clone),
        }
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root()).finish()
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// A tree with a single node holding `value`.
    pub fn leaf(value: T) -> Self {
        Self::with_children(value, Self::new(), Self::new())
    }

    /// A tree whose root holds `value` with `left` and `right` as its
    /// subtrees. The subtrees are shared, not copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use functree::Tree;
    ///
    /// let left = Tree::leaf(1);
    /// let tree = Tree::with_children(2, left.clone(), Tree::new());
    ///
    /// assert_eq!(tree.size(), 2);
    /// assert_eq!(left.size(), 1);
    /// ```
    pub fn with_children(value: T, left: Self, right: Self) -> Self {
        Self::from_link(Some(Rc::new(Node::new(value, left.root, right.root))))
    }

    fn from_link(root: Link<T>) -> Self {
        Self { root }
    }

    /// The root node, or `None` for the empty tree.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// Whether this tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Nodes in preorder.
    pub fn preorder(&self) -> Vec<&Node<T>> {
        self.traverse(Traversal::Preorder)
    }

    /// Nodes in inorder.
    pub fn inorder(&self) -> Vec<&Node<T>> {
        self.traverse(Traversal::Inorder)
    }

    /// Nodes in postorder.
    pub fn postorder(&self) -> Vec<&Node<T>> {
        self.traverse(Traversal::Postorder)
    }

    /// Nodes in the given order. The result is rebuilt on every call.
    pub fn traverse(&self, traversal: Traversal) -> Vec<&Node<T>> {
        traversal.nodes(self.root())
    }

    /// Values in the given order, resolving lazy ones as needed.
    pub fn values(&self, traversal: Traversal) -> Vec<&T> {
        self.traverse(traversal).into_iter().map(Node::value).collect()
    }

    /// Reduces the tree bottom-up, see [`Node::fold`]. The empty tree folds
    /// to `init`.
    ///
    /// # Examples
    ///
    /// ```
    /// use functree::Tree;
    ///
    /// let tree = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));
    /// let sum = tree.fold(|v, l, r| v + l + r, 0);
    ///
    /// assert_eq!(sum, 12);
    /// ```
    pub fn fold<'a, H, F>(&'a self, mut combine: F, init: H) -> H
    where
        F: FnMut(&'a T, H, H) -> H,
        H: Clone,
    {
        match self.root() {
            Some(root) => root.fold_with(&mut combine, &init),
            None => init,
        }
    }

    /// Reduces the shape of the tree bottom-up without looking at values,
    /// see [`Node::structural_fold`].
    pub fn structural_fold<H, F>(&self, mut combine: F, init: H) -> H
    where
        F: FnMut(H, H) -> H,
        H: Clone,
    {
        match self.root() {
            Some(root) => root.structural_fold_with(&mut combine, &init),
            None => init,
        }
    }

    /// Number of nodes on the longest path from the root to a leaf. The
    /// empty tree has height 0 and a single leaf has height 1.
    pub fn height(&self) -> usize {
        self.structural_fold(|left, right: usize| left.max(right) + 1, 0)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.structural_fold(|left, right: usize| left + right + 1, 0)
    }

    /// Whether every node is strictly greater than everything in its left
    /// subtree and strictly less than everything in its right subtree.
    /// Duplicates anywhere make this `false`; the empty tree is a BST.
    ///
    /// # Examples
    ///
    /// ```
    /// use functree::Tree;
    ///
    /// let bst = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));
    /// assert!(bst.is_bst());
    ///
    /// // 2 is in the right subtree of 5.
    /// let not_bst = Tree::with_children(
    ///     5,
    ///     Tree::leaf(3),
    ///     Tree::with_children(8, Tree::leaf(2), Tree::new()),
    /// );
    /// assert!(!not_bst.is_bst());
    /// ```
    pub fn is_bst(&self) -> bool
    where
        T: PartialOrd,
    {
        self.fold(Bounds::combine, None).map_or(true, |bounds| bounds.is_bst)
    }

    /// Returns a new tree with the same shape and values whose nodes share
    /// nothing with this one. Lazy values are resolved on the way.
    pub fn deep_copy(&self) -> Self
    where
        T: Clone,
    {
        Self::from_link(OwnedNode::freeze(OwnedNode::copy_of(self.root())))
    }

    /// Returns a new tree holding exactly the values for which `predicate`
    /// returns `true`. `predicate` is called once per node.
    ///
    /// When a node is dropped, its left subtree takes its place and its right
    /// subtree is attached to the rightmost node of that left subtree (or
    /// takes its place directly when there is no left subtree). This keeps a
    /// BST a BST; other shapes keep their values but not necessarily their
    /// inorder sequence.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        let mut dropped = 0usize;
        let mut counted = |value: &T| {
            let keep = predicate(value);
            if !keep {
                dropped += 1;
            }
            keep
        };
        let filtered = OwnedNode::copy_of(self.root()).and_then(|root| root.filter(&mut counted));
        debug!("filter dropped {} nodes", dropped);

        Self::from_link(OwnedNode::freeze(filtered))
    }

    /// Returns a new tree of the same shape with every value replaced by
    /// `transformer(value)`. Values are transformed eagerly, in inorder.
    pub fn map<F>(&self, mut transformer: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> T,
    {
        let mut copy = OwnedNode::copy_of(self.root());
        if let Some(root) = &mut copy {
            root.map_inorder(&mut transformer);
        }
        debug!("mapped tree eagerly");

        Self::from_link(OwnedNode::freeze(copy))
    }

    /// Like [`map`][Self::map] but nothing is computed up front. Each node of
    /// the new tree applies `transformer` to the matching node of this tree
    /// the first time its value is read and remembers the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// use functree::{Traversal, Tree};
    ///
    /// let calls = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&calls);
    /// let tree = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));
    ///
    /// let lazy = tree.lazy_map(move |v| {
    ///     counter.set(counter.get() + 1);
    ///     v + 1
    /// });
    /// assert_eq!(calls.get(), 0);
    ///
    /// assert_eq!(lazy.values(Traversal::Inorder), vec![&3, &5, &7]);
    /// assert_eq!(lazy.values(Traversal::Preorder), vec![&5, &3, &7]);
    /// assert_eq!(calls.get(), 3);
    /// ```
    pub fn lazy_map<F>(&self, transformer: F) -> Self
    where
        F: Fn(&T) -> T + 'static,
    {
        let transform: Transform<T> = Rc::new(transformer);
        debug!("building lazy view");

        Self::from_link(
            self.root
                .as_ref()
                .map(|root| Node::lazy_copy(root, &transform)),
        )
    }

    /// Folds `operation` over the values in the given order, left to right,
    /// starting from `init`.
    ///
    /// # Examples
    ///
    /// ```
    /// use functree::{Traversal, Tree};
    ///
    /// let tree = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));
    ///
    /// assert_eq!(tree.accumulate(|acc, v| acc - v, 0, Traversal::Inorder), -12);
    /// assert_eq!(
    ///     tree.accumulate(|acc, v| format!("{}{}", acc, v), String::new(), Traversal::Postorder),
    ///     "264"
    /// );
    /// ```
    pub fn accumulate<B, F>(&self, mut operation: F, init: B, traversal: Traversal) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.traverse(traversal)
            .into_iter()
            .fold(init, |acc, node| operation(acc, node.value()))
    }

    /// Calls `operation` once for every value in the given order.
    pub fn apply<F>(&self, mut operation: F, traversal: Traversal)
    where
        F: FnMut(&T),
    {
        for node in self.traverse(traversal) {
            node.apply(&mut operation);
        }
    }

    /// Writes every value in the given order to `out`, each followed by a
    /// space, and finishes with a newline.
    pub fn write_values<W>(&self, out: &mut W, traversal: Traversal) -> io::Result<()>
    where
        W: Write,
        T: fmt::Display,
    {
        for node in self.traverse(traversal) {
            write!(out, "{} ", node.value())?;
        }
        writeln!(out)
    }

    /// Prints the values in the given order to stdout.
    pub fn print_with(&self, traversal: Traversal) -> io::Result<()>
    where
        T: fmt::Display,
    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_values(&mut out, traversal)
    }

    /// Prints the values inorder to stdout.
    pub fn print(&self) -> io::Result<()>
    where
        T: fmt::Display,
    {
        self.print_with(Traversal::default())
    }
}

/// What `is_bst` knows about a non-empty subtree.
struct Bounds<'a, T> {
    is_bst: bool,
    min: &'a T,
    max: &'a T,
}

// Manual impls so `T` doesn't have to be `Copy`.
impl<T> Clone for Bounds<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Bounds<'_, T> {}

impl<'a, T> Bounds<'a, T>
where
    T: PartialOrd,
{
    /// Summarises a node from its value and the summaries of its children,
    /// `None` standing for an empty child.
    fn combine(value: &'a T, left: Option<Self>, right: Option<Self>) -> Option<Self> {
        let left_ordered = left.map_or(true, |l| l.is_bst && l.max < value);
        let right_ordered = right.map_or(true, |r| r.is_bst && r.min > value);

        let mut min = value;
        let mut max = value;
        for child in left.iter().chain(right.iter()) {
            if child.min < min {
                min = child.min;
            }
            if child.max > max {
                max = child.max;
            }
        }

        Some(Self {
            is_bst: left_ordered && right_ordered,
            min,
            max,
        })
    }
}
