//! The recursive cell every [`Tree`][crate::Tree] is made of.
//!
//! A `Node` is immutable once it has been built. Children are reference
//! counted so several trees (a tree and its lazy view, or a tree and a larger
//! tree built on top of it) can point at the same subtree without ever being
//! able to observe each other's changes. The single exception to immutability
//! is a deferred value filling its cache the first time it is read.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::traversal::Traversal;

/// An optional, shared child.
pub(crate) type Link<T> = Option<Rc<Node<T>>>;

/// The function a deferred node applies to its source's value. It is shared by
/// every node of a lazy view.
pub(crate) type Transform<T> = Rc<dyn Fn(&T) -> T>;

/// A single node of a [`Tree`][crate::Tree]. It holds a value (possibly not
/// computed yet) and up to two children.
pub struct Node<T> {
    value: Value<T>,
    left: Link<T>,
    right: Link<T>,
}

enum Value<T> {
    /// The value is stored directly.
    Eager(T),
    /// The value is `transform(source.value())`, computed on first read.
    Deferred {
        source: Rc<Node<T>>,
        transform: Transform<T>,
        cached: OnceCell<T>,
    },
}

impl<T> Node<T> {
    /// Builds a node holding `value` with the given children.
    pub(crate) fn new(value: T, left: Link<T>, right: Link<T>) -> Self {
        Self {
            value: Value::Eager(value),
            left,
            right,
        }
    }

    /// Returns the value of this node.
    ///
    /// For a lazy node the value is computed from its source the first time
    /// it is asked for and cached afterwards, so the transform runs at most
    /// once per node no matter how often this is called.
    pub fn value(&self) -> &T {
        match &self.value {
            Value::Eager(value) => value,
            Value::Deferred {
                source,
                transform,
                cached,
            } => cached.get_or_init(|| {
                trace!("resolving deferred node value");
                transform(source.value())
            }),
        }
    }

    /// The left child, if any.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The right child, if any.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Whether this node's value is derived from another node.
    pub fn is_lazy(&self) -> bool {
        matches!(self.value, Value::Deferred { .. })
    }

    /// Whether reading [`value`][Self::value] would return without running a
    /// transform. Always `true` for eager nodes.
    pub fn is_resolved(&self) -> bool {
        match &self.value {
            Value::Eager(_) => true,
            Value::Deferred { cached, .. } => cached.get().is_some(),
        }
    }

    /// Calls `operation` with this node's value.
    pub fn apply<F>(&self, operation: F)
    where
        F: FnOnce(&T),
    {
        operation(self.value())
    }

    /// Reduces the subtree rooted here bottom-up. Missing children contribute
    /// `init`; every present node contributes
    /// `combine(value, left_result, right_result)`.
    pub fn fold<'a, H, F>(&'a self, mut combine: F, init: H) -> H
    where
        F: FnMut(&'a T, H, H) -> H,
        H: Clone,
    {
        self.fold_with(&mut combine, &init)
    }

    pub(crate) fn fold_with<'a, H, F>(&'a self, combine: &mut F, init: &H) -> H
    where
        F: FnMut(&'a T, H, H) -> H,
        H: Clone,
    {
        let value = self.value();
        let left = match self.left() {
            Some(left) => left.fold_with(combine, init),
            None => init.clone(),
        };
        let right = match self.right() {
            Some(right) => right.fold_with(combine, init),
            None => init.clone(),
        };
        combine(value, left, right)
    }

    /// Like [`fold`][Self::fold] but `combine` only sees the results of the
    /// two children, never a value. Lazy values are not resolved.
    pub fn structural_fold<H, F>(&self, mut combine: F, init: H) -> H
    where
        F: FnMut(H, H) -> H,
        H: Clone,
    {
        self.structural_fold_with(&mut combine, &init)
    }

    pub(crate) fn structural_fold_with<H, F>(&self, combine: &mut F, init: &H) -> H
    where
        F: FnMut(H, H) -> H,
        H: Clone,
    {
        let left = match self.left() {
            Some(left) => left.structural_fold_with(combine, init),
            None => init.clone(),
        };
        let right = match self.right() {
            Some(right) => right.structural_fold_with(combine, init),
            None => init.clone(),
        };
        combine(left, right)
    }

    /// Nodes of this subtree, node first, then left, then right.
    pub fn preorder(&self) -> Vec<&Self> {
        Traversal::Preorder.nodes(Some(self))
    }

    /// Nodes of this subtree, left first, then the node, then right.
    pub fn inorder(&self) -> Vec<&Self> {
        Traversal::Inorder.nodes(Some(self))
    }

    /// Nodes of this subtree, left first, then right, then the node.
    pub fn postorder(&self) -> Vec<&Self> {
        Traversal::Postorder.nodes(Some(self))
    }

    pub(crate) fn collect_into<'a>(&'a self, order: Traversal, out: &mut Vec<&'a Self>) {
        if order == Traversal::Preorder {
            out.push(self);
        }
        if let Some(left) = self.left() {
            left.collect_into(order, out);
        }
        if order == Traversal::Inorder {
            out.push(self);
        }
        if let Some(right) = self.right() {
            right.collect_into(order, out);
        }
        if order == Traversal::Postorder {
            out.push(self);
        }
    }

    /// Builds a parallel subtree of lazy nodes. Every new node takes its value
    /// from the node of `this` at the same position, so nothing is computed here.
    pub(crate) fn lazy_copy(this: &Rc<Self>, transform: &Transform<T>) -> Rc<Self> {
        Rc::new(Self {
            value: Value::Deferred {
                source: Rc::clone(this),
                transform: Rc::clone(transform),
                cached: OnceCell::new(),
            },
            left: this.left.as_ref().map(|left| Self::lazy_copy(left, transform)),
            right: this
                .right
                .as_ref()
                .map(|right| Self::lazy_copy(right, transform)),
        })
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", self.value())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn leaf(value: i32) -> Link<i32> {
        Some(Rc::new(Node::new(value, None, None)))
    }

    /// 4 with children 2 and 6.
    fn small() -> Rc<Node<i32>> {
        Rc::new(Node::new(4, leaf(2), leaf(6)))
    }

    fn values<T: Copy>(nodes: Vec<&Node<T>>) -> Vec<T> {
        nodes.into_iter().map(|n| *n.value()).collect()
    }

    #[test]
    fn traversal_orders() {
        let root = small();

        assert_eq!(values(root.preorder()), vec![4, 2, 6]);
        assert_eq!(values(root.inorder()), vec![2, 4, 6]);
        assert_eq!(values(root.postorder()), vec![2, 6, 4]);
    }

    #[test]
    fn fold_sees_children_before_combining() {
        let root = small();
        let rendered = root.fold(
            |v, l: String, r: String| format!("({}{}{})", l, v, r),
            String::new(),
        );

        assert_eq!(rendered, "((2)4(6))");
    }

    #[test]
    fn structural_fold_does_not_resolve_lazy_values() {
        let root = small();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let transform: Transform<i32> = Rc::new(move |v: &i32| {
            counter.set(counter.get() + 1);
            v + 1
        });
        let lazy = Node::lazy_copy(&root, &transform);

        let count = lazy.structural_fold(|l: usize, r| l + r + 1, 0);

        assert_eq!(count, 3);
        assert_eq!(calls.get(), 0);
        assert!(!lazy.is_resolved());
    }

    #[test]
    fn lazy_value_resolves_once() {
        let root = small();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let transform: Transform<i32> = Rc::new(move |v: &i32| {
            counter.set(counter.get() + 1);
            v * 10
        });
        let lazy = Node::lazy_copy(&root, &transform);
        assert!(lazy.is_lazy());

        assert_eq!(*lazy.value(), 40);
        assert_eq!(*lazy.value(), 40);
        assert_eq!(calls.get(), 1);

        // The children are untouched until read.
        assert!(!lazy.left().map_or(true, Node::is_resolved));
        assert_eq!(values(lazy.inorder()), vec![20, 40, 60]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn lazy_of_lazy_chains_resolution() {
        let root = small();
        let plus_one: Transform<i32> = Rc::new(|v: &i32| v + 1);
        let double: Transform<i32> = Rc::new(|v: &i32| v * 2);
        let first = Node::lazy_copy(&root, &plus_one);
        let second = Node::lazy_copy(&first, &double);

        assert_eq!(values(second.inorder()), vec![6, 10, 14]);
        assert!(first.is_resolved());
        assert!(!root.is_lazy());
    }

    #[test]
    fn deep_copy_resolves_values() {
        let root = small();
        let negate: Transform<i32> = Rc::new(|v: &i32| -v);
        let lazy = Node::lazy_copy(&root, &negate);

        let copy = crate::owned::OwnedNode::copy_of(Some(&*lazy))
            .map(crate::owned::OwnedNode::into_shared)
            .expect("non-empty copy");

        assert!(!copy.is_lazy());
        assert_eq!(values(copy.preorder()), vec![-4, -2, -6]);
    }

    #[test]
    fn apply_visits_one_node() {
        let root = small();
        let mut seen = Vec::new();
        root.apply(|v| seen.push(*v));

        assert_eq!(seen, vec![4]);
    }
}
