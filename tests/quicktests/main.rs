use std::cell::Cell;
use std::rc::Rc;

use functree::{Traversal, Tree};
use quickcheck::quickcheck;

/// Builds a tree out of sorted, distinct keys by always rooting a subtree at
/// the middle key. The result is a BST as balanced as it gets.
fn balanced(keys: &[i8]) -> Tree<i8> {
    if keys.is_empty() {
        return Tree::new();
    }
    let mid = keys.len() / 2;
    Tree::with_children(keys[mid], balanced(&keys[..mid]), balanced(&keys[mid + 1..]))
}

fn sorted_distinct(mut xs: Vec<i8>) -> Vec<i8> {
    xs.sort_unstable();
    xs.dedup();
    xs
}

fn inorder(tree: &Tree<i8>) -> Vec<i8> {
    tree.values(Traversal::Inorder).into_iter().copied().collect()
}

#[test]
fn concrete_scenario() {
    let tree = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));

    assert_eq!(tree.height(), 2);
    assert_eq!(tree.size(), 3);
    assert_eq!(inorder(&tree), vec![2, 4, 6]);
    assert!(tree.is_bst());

    let filtered = tree.filter(|v| *v != 2);
    assert_eq!(filtered.size(), 2);
    assert_eq!(inorder(&filtered), vec![4, 6]);

    let mapped = tree.map(|v| v * 10);
    assert_eq!(inorder(&mapped), vec![20, 40, 60]);
    assert_eq!(inorder(&tree), vec![2, 4, 6]);
}

#[test]
fn out_of_order_right_subtree() {
    let tree = Tree::with_children(
        5,
        Tree::leaf(3),
        Tree::with_children(8, Tree::leaf(2), Tree::new()),
    );

    assert!(!tree.is_bst());
}

#[test]
fn print_to_stdout() {
    let tree = Tree::with_children(4, Tree::leaf(2), Tree::leaf(6));

    assert!(tree.print().is_ok());
    assert!(tree.print_with(Traversal::Postorder).is_ok());
}

#[test]
fn nested_lazy_views() {
    let tree = balanced(&[1, 2, 3, 4, 5]);
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let shifted = tree.lazy_map(move |v: &i8| {
        counter.set(counter.get() + 1);
        v + 10
    });
    let negated = shifted.lazy_map(|v: &i8| -v);

    assert_eq!(calls.get(), 0);
    assert_eq!(inorder(&negated), vec![-11, -12, -13, -14, -15]);
    assert_eq!(calls.get(), 5);
    assert_eq!(inorder(&shifted), vec![11, 12, 13, 14, 15]);
    assert_eq!(calls.get(), 5);
}

quickcheck! {
    fn balanced_trees_are_bsts(xs: Vec<i8>) -> bool {
        let keys = sorted_distinct(xs);
        let tree = balanced(&keys);

        tree.is_bst() && inorder(&tree) == keys && tree.size() == keys.len()
    }

    fn balanced_height_is_logarithmic(xs: Vec<i8>) -> bool {
        let keys = sorted_distinct(xs);
        let expected = (usize::BITS - keys.len().leading_zeros()) as usize;

        balanced(&keys).height() == expected
    }

    fn filter_keeps_sorted_order(xs: Vec<i8>, cutoff: i8) -> bool {
        let keys = sorted_distinct(xs);
        let filtered = balanced(&keys).filter(|v| *v < cutoff);
        let expected: Vec<i8> = keys.iter().copied().filter(|v| *v < cutoff).collect();

        filtered.is_bst() && inorder(&filtered) == expected
    }

    fn lazy_map_agrees_with_map(xs: Vec<i8>) -> bool {
        let tree = balanced(&sorted_distinct(xs));
        let eager = tree.map(|v| v.wrapping_sub(7));
        let lazy = tree.lazy_map(|v: &i8| v.wrapping_sub(7));

        [Traversal::Preorder, Traversal::Inorder, Traversal::Postorder]
            .iter()
            .all(|order| eager.values(*order) == lazy.values(*order))
    }

    fn duplicating_a_key_breaks_bst(xs: Vec<i8>) -> bool {
        let keys = sorted_distinct(xs);
        match keys.first() {
            Some(smallest) => {
                let tree = Tree::with_children(*smallest, Tree::new(), balanced(&keys));
                !tree.is_bst()
            }
            None => true,
        }
    }
}
