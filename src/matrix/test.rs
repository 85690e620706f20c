use proptest::prelude::*;
use similar_asserts::assert_eq;

use super::*;

fn sample() -> BoolMatrix {
    BoolMatrix::new([[1, 0, 1], [0, 0, 1], [0, 1, 0]]).unwrap()
}

/// Square 0/1 matrices up to `max × max`.
fn bool_matrix(max: usize) -> impl Strategy<Value = BoolMatrix> {
    (0..=max)
        .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0i64..=1, n), n))
        .prop_map(|rows| BoolMatrix::new(rows).unwrap())
}

/// Reachability by Warshall's triple loop, as an independent reference.
fn warshall(m: &BoolMatrix) -> BoolMatrix {
    let n = m.rows();
    let mut r = m.to_bool();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if r[(i, k)] == 1 && r[(k, j)] == 1 {
                    r[(i, j)] = 1;
                }
            }
        }
    }
    r
}

#[test]
fn construction() {
    let m = sample();
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.get(0, 2), Some(1));
    assert_eq!(m.get(3, 0), None);

    let from_bools = BoolMatrix::new([[true, false], [false, true]]).unwrap();
    assert_eq!(from_bools, BoolMatrix::identity(2));

    assert_eq!(
        BoolMatrix::new(vec![vec![1, 0], vec![1]]),
        Err(MatrixError::Ragged {
            row: 1,
            len: 1,
            expected: 2
        })
    );

    let empty = BoolMatrix::new(Vec::<Vec<i64>>::new()).unwrap();
    assert_eq!(empty.shape(), (0, 0));
}

#[test]
fn zero_and_identity() {
    assert_eq!(BoolMatrix::zero(2, None).shape(), (2, 2));
    assert_eq!(BoolMatrix::zero(2, 3).to_vec(), vec![vec![0; 3]; 2]);
    assert_eq!(
        BoolMatrix::identity(3).to_vec(),
        vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]
    );
}

#[test]
fn arithmetic() {
    let m = sample();

    let sum = m.add(&BoolMatrix::identity(3)).unwrap();
    assert_eq!(sum.to_vec(), vec![vec![2, 0, 1], vec![0, 1, 1], vec![0, 1, 1]]);
    assert_eq!(
        sum.to_bool().to_vec(),
        vec![vec![1, 0, 1], vec![0, 1, 1], vec![0, 1, 1]]
    );
    assert_eq!(m.union(&BoolMatrix::identity(3)).unwrap(), sum.to_bool());

    let square = m.mat_mul(&m).unwrap();
    assert_eq!(
        square.to_vec(),
        vec![vec![1, 1, 1], vec![0, 1, 0], vec![0, 0, 1]]
    );

    assert_eq!(
        m.multiply(&BoolMatrix::identity(3)).unwrap().to_vec(),
        vec![vec![1, 0, 0], vec![0, 0, 0], vec![0, 0, 0]]
    );
    assert_eq!(
        m.multiply(2_i64).unwrap().to_vec(),
        vec![vec![2, 0, 2], vec![0, 0, 2], vec![0, 2, 0]]
    );
}

#[test]
fn shape_mismatch() {
    let m = sample();
    let r = BoolMatrix::zero(2, 3);

    assert_eq!(
        m.add(&r),
        Err(MatrixError::ShapeMismatch {
            op: "add",
            left: (3, 3),
            right: (2, 3)
        })
    );
    assert!(m.hadamard(&r).is_err());
    assert!(m.mat_mul(&r).is_err());
    assert_eq!(r.mat_mul(&m).unwrap().shape(), (2, 3));
    assert_ne!(m, BoolMatrix::zero(3, 2));
}

#[test]
fn closures() {
    let m = sample();
    assert_eq!(
        m.reflexive_closure().to_vec(),
        vec![vec![1, 0, 1], vec![0, 1, 1], vec![0, 1, 1]]
    );
    assert_eq!(
        m.transitive_closure().unwrap().to_vec(),
        vec![vec![1, 1, 1], vec![0, 1, 1], vec![0, 1, 1]]
    );
}

#[test]
fn transitive_closure_cap() {
    // a chain of five needs several rounds to settle
    let chain = BoolMatrix::from_pairs(5, 5, (0..4).map(|i| (i, i + 1))).unwrap();
    assert_eq!(
        chain.transitive_closure_with_limit(2),
        Err(MatrixError::NoConvergence { max_iterations: 2 })
    );
    assert_eq!(
        chain.transitive_closure_with_limit(0),
        Err(MatrixError::NoConvergence { max_iterations: 0 })
    );

    let closure = chain.transitive_closure().unwrap();
    assert_eq!(closure.to_pairs().len(), 4 + 3 + 2 + 1);
    assert!(matches!(
        BoolMatrix::zero(2, 3).transitive_closure(),
        Err(MatrixError::ShapeMismatch { .. })
    ));
}

#[test]
fn pairs() {
    let m = sample();
    assert_eq!(m.to_pairs(), vec![(0, 0), (0, 2), (1, 2), (2, 1)]);
    assert_eq!(BoolMatrix::from_pairs(3, 3, m.to_pairs()).unwrap(), m);

    // cells other than exactly one are not pairs
    let doubled = m.add(&m).unwrap();
    assert!(doubled.to_pairs().is_empty());

    let mut target = BoolMatrix::identity(3);
    target.assign_pairs([(0, 1)]).unwrap();
    assert_eq!(target.to_pairs(), vec![(0, 1)]);
    assert_eq!(
        BoolMatrix::from_pairs(2, 2, [(2, 0)]),
        Err(MatrixError::OutOfBounds {
            row: 2,
            col: 0,
            rows: 2,
            cols: 2
        })
    );
}

#[test]
fn predicates() {
    let m = sample();
    assert!(!m.is_symmetric());
    assert!(!m.is_reflexive());
    assert!(m.reflexive_closure().is_reflexive());
    assert!(BoolMatrix::identity(4).is_symmetric());
    assert!(!BoolMatrix::zero(2, 3).is_symmetric());

    let sym = m.union(&m.transpose()).unwrap();
    assert!(sym.is_symmetric());
}

#[test]
fn rendering() {
    insta::assert_snapshot!(sample().to_string(), @r"
[[1 0 1]
 [0 0 1]
 [0 1 0]]
");

    let mut out = Vec::new();
    sample().write_csv(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1,0,1\n0,0,1\n0,1,0\n");
}

proptest! {
    #[test]
    fn reflexive_closure_is_idempotent(m in bool_matrix(6)) {
        let once = m.reflexive_closure();
        prop_assert_eq!(once.reflexive_closure(), once.clone());
        prop_assert!(once.is_reflexive());
    }

    #[test]
    fn transitive_closure_is_idempotent(m in bool_matrix(6)) {
        let once = m.transitive_closure().unwrap();
        prop_assert_eq!(once.transitive_closure().unwrap(), once);
    }

    #[test]
    fn transitive_closure_matches_warshall(m in bool_matrix(7)) {
        prop_assert_eq!(m.transitive_closure().unwrap(), warshall(&m));
    }

    #[test]
    fn pairs_round_trip(m in bool_matrix(6)) {
        let (rows, cols) = m.shape();
        prop_assert_eq!(BoolMatrix::from_pairs(rows, cols, m.to_pairs()).unwrap(), m);
    }
}
