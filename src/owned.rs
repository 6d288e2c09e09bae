//! Nodes that belong to exactly one operation while it runs.
//!
//! `filter` and `map` need to rewrite values and child links. Doing that on
//! shared [`Node`]s could leak into other trees, so both work on an
//! `OwnedNode` copy instead: plain `Box`ed children, no sharing, and mutation
//! is only possible through `&mut`. Once the operation is done the copy is
//! frozen into shared nodes with [`OwnedNode::into_shared`].

use std::rc::Rc;

use crate::node::{Link, Node};

pub(crate) type OwnedLink<T> = Option<Box<OwnedNode<T>>>;

#[derive(Clone)]
pub(crate) struct OwnedNode<T> {
    value: T,
    left: OwnedLink<T>,
    right: OwnedLink<T>,
}

impl<T> OwnedNode<T> {
    pub(crate) fn new(value: T, left: OwnedLink<T>, right: OwnedLink<T>) -> Self {
        Self { value, left, right }
    }

    /// Deep copies the subtree at `root`, resolving every lazy value on the
    /// way. Nothing in the result is shared with the source.
    pub(crate) fn copy_of(root: Option<&Node<T>>) -> OwnedLink<T>
    where
        T: Clone,
    {
        root.and_then(|root| {
            root.fold(
                |value, left, right| Some(Box::new(Self::new(value.clone(), left, right))),
                None,
            )
        })
    }

    /// Turns this subtree into shared, immutable nodes.
    pub(crate) fn into_shared(self: Box<Self>) -> Rc<Node<T>> {
        let Self { value, left, right } = *self;
        Rc::new(Node::new(value, Self::freeze(left), Self::freeze(right)))
    }

    pub(crate) fn freeze(link: OwnedLink<T>) -> Link<T> {
        link.map(Self::into_shared)
    }

    /// Removes every node whose value fails `predicate`. The predicate is
    /// evaluated once per node, parents before children.
    ///
    /// A dropped node is replaced by its (filtered) left subtree with its
    /// (filtered) right subtree hung off the rightmost node of the left one.
    /// If there is no left subtree the right one takes its place. For a BST
    /// this keeps the inorder sequence intact.
    pub(crate) fn filter<P>(mut self: Box<Self>, predicate: &mut P) -> OwnedLink<T>
    where
        P: FnMut(&T) -> bool,
    {
        let keep = predicate(&self.value);
        let left = self.left.take().and_then(|left| left.filter(predicate));
        let right = self.right.take().and_then(|right| right.filter(predicate));

        if keep {
            self.left = left;
            self.right = right;
            return Some(self);
        }

        match left {
            Some(mut left) => {
                left.append_rightmost(right);
                Some(left)
            }
            None => right,
        }
    }

    fn append_rightmost(&mut self, subtree: OwnedLink<T>) {
        match self.right {
            Some(ref mut right) => right.append_rightmost(subtree),
            None => self.right = subtree,
        }
    }

    /// Replaces every value with `transformer(value)`, visiting nodes inorder.
    pub(crate) fn map_inorder<F>(&mut self, transformer: &mut F)
    where
        F: FnMut(&T) -> T,
    {
        if let Some(left) = &mut self.left {
            left.map_inorder(transformer);
        }
        self.value = transformer(&self.value);
        if let Some(right) = &mut self.right {
            right.map_inorder(transformer);
        }
    }
}
