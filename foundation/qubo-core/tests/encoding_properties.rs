//! Property tests for the QUBO encoder and validator.

use proptest::prelude::*;
use qubo_core::{encode, Graph, PenaltyWeights, SolutionValidator, VariableLayout};

/// Random simple graph on 1..8 vertices.
fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..8).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..(n * 2 + 1)).prop_map(move |pairs| {
            let edges: Vec<(usize, usize)> = pairs.into_iter().filter(|(u, v)| u != v).collect();
            Graph::new(n, &edges).expect("filtered edges are valid")
        })
    })
}

fn weights_strategy() -> impl Strategy<Value = PenaltyWeights> {
    (-20.0f64..20.0, -20.0f64..20.0, -20.0f64..20.0)
        .prop_map(|(a, b, c)| PenaltyWeights::new(a, b, c))
}

/// Greedy proper coloring encoded as a solution vector, `y[k] = 1` iff used.
fn greedy_solution(graph: &Graph, num_colors: usize) -> Option<Vec<u8>> {
    let n = graph.num_vertices();
    let layout = VariableLayout::new(n, num_colors);
    let mut colors = vec![usize::MAX; n];
    for v in 0..n {
        let taken: Vec<usize> = graph.neighbors(v).into_iter().map(|u| colors[u]).collect();
        colors[v] = (0..num_colors).find(|k| !taken.contains(k))?;
    }
    let mut solution = vec![0u8; layout.num_variables()];
    for (v, &k) in colors.iter().enumerate() {
        solution[layout.x_index(v, k)] = 1;
        solution[layout.y_index(k)] = 1;
    }
    Some(solution)
}

proptest! {
    #[test]
    fn prop_encoding_is_symmetric(
        graph in graph_strategy(),
        c in 1usize..5,
        weights in weights_strategy(),
    ) {
        let q = encode(&graph, c, &weights);
        prop_assert_eq!(q.dim(), graph.num_vertices() * c + c);
        prop_assert!(q.is_symmetric());
    }

    #[test]
    fn prop_encoding_is_bit_identical(
        graph in graph_strategy(),
        c in 1usize..5,
        weights in weights_strategy(),
    ) {
        let a = encode(&graph, c, &weights);
        let b = encode(&graph, c, &weights);
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
        for (x, y) in a.as_array().iter().zip(b.as_array().iter()) {
            prop_assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn prop_objective_diagonal_sums_to_color_bound(
        graph in graph_strategy(),
        c in 1usize..6,
    ) {
        let q = encode(&graph, c, &PenaltyWeights::zero());
        let layout = q.layout();
        let y_diag: f64 = (0..c).map(|k| q.get(layout.y_index(k), layout.y_index(k))).sum();
        prop_assert_eq!(y_diag, c as f64);
    }

    #[test]
    fn prop_proper_coloring_validates(graph in graph_strategy()) {
        // n colors always suffice for a greedy coloring
        let c = graph.num_vertices();
        let solution = greedy_solution(&graph, c).expect("n colors suffice");
        let validator = SolutionValidator::new(&graph, c, solution).unwrap();
        prop_assert!(validator.validate_constraints());
        let used = validator.colors_used().len();
        prop_assert_eq!(validator.compute_chromatic_number(true), Some(used));
    }

    #[test]
    fn prop_empty_graph_never_violates_adjacency(
        n in 1usize..6,
        c in 1usize..4,
        bits in proptest::collection::vec(0u8..2, 0..40),
    ) {
        let graph = Graph::empty(n).unwrap();
        let len = n * c + c;
        let solution: Vec<u8> = (0..len).map(|i| bits.get(i).copied().unwrap_or(0)).collect();
        let validator = SolutionValidator::new(&graph, c, solution).unwrap();
        prop_assert!(validator.violations().iter().all(|v| v.constraint() != 3));
    }
}
