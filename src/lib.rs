//! A generic binary tree with a functional interface.
//!
//! ## Trees as values
//!
//! A [`Tree`] is a handle to an optional root [`Node`]. Each `Node` stores a
//! value and up to two child `Node`s. Nothing a caller can reach is ever
//! modified: operations that would change a tree (like [`Tree::filter`] or
//! [`Tree::map`]) build a new one and leave the original as it was. Cloning a
//! `Tree` only copies the handle, and subtrees can be freely shared between
//! trees.
//!
//! ## Folds
//!
//! Most aggregates are catamorphisms. [`Tree::fold`] reduces a tree bottom-up,
//! combining every node's value with the already reduced results of its
//! children. [`Tree::structural_fold`] does the same but never looks at values,
//! which is all that [`Tree::height`] and [`Tree::size`] need.
//!
//! ## Lazy views
//!
//! [`Tree::lazy_map`] returns a tree of the same shape whose values have not
//! been computed yet. Each node computes its value from the matching node of
//! the original tree the first time it is read and caches it, so the transform
//! runs at most once per node.
//!
//! > Note that the tree makes no attempt to stay balanced or sorted. It can
//! > check whether it happens to be a binary search tree with [`Tree::is_bst`]
//! > but it never looks anything up by key.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod node;
mod owned;
mod traversal;
mod tree;

pub use node::Node;
pub use traversal::Traversal;
pub use tree::Tree;
