use indexmap::IndexSet;
use proptest::prelude::*;
use similar_asserts::assert_eq;

use super::*;

fn abc() -> Relation<&'static str> {
    Relation::with_pairs(
        ["a", "b", "c"],
        [("a", "a"), ("a", "c"), ("b", "c"), ("c", "b")],
    )
    .unwrap()
}

fn set<const N: usize>(items: [&'static str; N]) -> IndexSet<&'static str> {
    IndexSet::from(items)
}

/// Every pair set agrees with the matrix cell by cell.
fn in_sync<T: Element>(rel: &Relation<T>) -> bool {
    let n = rel.domain().len();
    (0..n).all(|i| {
        (0..n).all(|j| {
            let a = rel.element(i).unwrap();
            let b = rel.element(j).unwrap();
            rel.contains(a, b) == (rel.matrix()[(i, j)] == 1)
        })
    })
}

/// Relations over `0..n` for `n` up to `max`.
fn relation(max: usize) -> impl Strategy<Value = Relation<usize>> {
    (1..=max)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..3 * n)))
        .prop_map(|(n, pairs)| Relation::with_pairs(0..n, pairs).unwrap())
}

#[test]
fn construction_keeps_matrix_in_sync() {
    let rel = abc();
    assert_eq!(rel.len(), 4);
    assert_eq!(rel.matrix().shape(), (3, 3));
    assert_eq!(
        rel.matrix().to_vec(),
        vec![vec![1, 0, 1], vec![0, 0, 1], vec![0, 1, 0]]
    );
    assert!(in_sync(&rel));
    assert_eq!(rel.index_of(&"c"), Some(2));
    assert_eq!(rel.element(1), Some(&"b"));
}

#[test]
fn unknown_elements_are_rejected() {
    let mut rel = abc();
    let before = rel.clone();

    assert_eq!(
        rel.add_pair("a", "z").map(|_| ()),
        Err(RelationError::UnknownElement("\"z\"".into()))
    );
    assert_eq!(rel, before);

    assert!(Relation::with_pairs([1, 2], [(1, 2), (3, 1)]).is_err());
}

#[test]
fn duplicate_domain_elements_collapse() {
    let rel = Relation::with_pairs(["a", "b", "a"], [("b", "a")]).unwrap();
    assert_eq!(rel.domain().len(), 2);
    assert_eq!(rel.matrix().to_pairs(), vec![(1, 0)]);
}

#[test]
fn properties_and_closures() {
    let mut rel = abc();
    assert!(!rel.is_reflexive());
    assert!(!rel.is_symmetric());
    // (c, b) and (b, c) without (c, c)
    assert!(!rel.is_transitive());
    assert!(!rel.is_function());

    rel.reflexive_closure();
    assert!(rel.is_reflexive());
    assert!(in_sync(&rel));
    let once = rel.clone();
    rel.reflexive_closure();
    assert_eq!(rel, once);

    rel.transitive_closure().unwrap();
    assert!(rel.is_transitive());
    assert!(in_sync(&rel));

    assert_eq!(rel.followers(&"a"), set(["a", "b", "c"]));
    assert_eq!(rel.parents(&"c"), set(["a", "b", "c"]));
    assert_eq!(rel.parents(&"a"), set(["a"]));
}

#[test]
fn transitive_closure_failure_leaves_relation_untouched() {
    let mut rel = Relation::with_pairs(0..6, (0..5).map(|i| (i, i + 1))).unwrap();
    let before = rel.clone();
    assert_eq!(
        rel.transitive_closure_with_limit(1),
        Err(RelationError::Matrix(MatrixError::NoConvergence {
            max_iterations: 1
        }))
    );
    assert_eq!(rel, before);
}

#[test]
fn functions() {
    let f = Relation::with_pairs(["x", "y", "z"], [("x", "y"), ("y", "z"), ("z", "z")]).unwrap();
    assert!(f.is_function());
    assert!(Relation::new(["x"]).is_function());
}

#[test]
fn family_queries() {
    let rel = Relation::with_pairs(
        ["p", "q", "x", "y", "z"],
        [("p", "x"), ("p", "y"), ("q", "y"), ("q", "z")],
    )
    .unwrap();

    assert_eq!(rel.followers(&"p"), set(["x", "y"]));
    assert_eq!(rel.parents(&"y"), set(["p", "q"]));
    assert_eq!(rel.siblings(&"y"), set(["x", "z"]));
    assert_eq!(rel.siblings(&"x"), set(["y"]));
    assert!(rel.siblings(&"p").is_empty());
    assert!(rel.followers(&"nope").is_empty());

    assert!(rel.are_parents(&"p", &"q"));
    assert!(!rel.are_parents(&"p", &"x"));
    assert!(rel.are_siblings(&"x", &"y"));
    assert!(!rel.are_siblings(&"x", &"z"));
}

#[test]
fn shared_relatives_exclude_the_pair_itself() {
    let mut rel = abc();
    rel.reflexive_closure();
    rel.transitive_closure().unwrap();

    // the only parent of "a" is "a" itself
    assert!(!rel.are_siblings(&"a", &"b"));
    assert!(rel.are_siblings(&"b", &"c"));
    assert!(!rel.are_parents(&"b", &"c"));
    assert!(rel.are_parents(&"a", &"b"));
}

#[test]
fn matrix_round_trip() {
    let rel = abc();
    let back = Relation::from_matrix(["a", "b", "c"], rel.matrix()).unwrap();
    assert_eq!(
        back.to_pairs().into_iter().collect::<IndexSet<_>>(),
        rel.to_pairs().into_iter().collect::<IndexSet<_>>()
    );
    assert!(matches!(
        Relation::from_matrix(["a", "b"], rel.matrix()),
        Err(RelationError::Matrix(MatrixError::ShapeMismatch { .. }))
    ));
}

#[test]
fn rendering() {
    let rel = Relation::with_pairs(["a", "b"], [("a", "b"), ("b", "b")]).unwrap();
    insta::assert_snapshot!(rel.to_string(), @r"
Matrix:
[[0 1]
 [0 1]]
Relations:
a -> b
b -> b
");
}

proptest! {
    #[test]
    fn closure_is_transitive(mut rel in relation(6)) {
        rel.transitive_closure().unwrap();
        prop_assert!(rel.is_transitive());
        prop_assert!(in_sync(&rel));
    }

    #[test]
    fn transitive_closure_is_idempotent(mut rel in relation(6)) {
        rel.transitive_closure().unwrap();
        let once = rel.clone();
        rel.transitive_closure().unwrap();
        prop_assert_eq!(rel, once);
    }

    #[test]
    fn closures_keep_every_pair(rel in relation(6)) {
        let mut closed = rel.clone();
        closed.reflexive_closure();
        closed.transitive_closure().unwrap();
        prop_assert!(closed.is_reflexive());
        for (a, b) in rel.pairs() {
            prop_assert!(closed.contains(a, b));
        }
    }
}
