use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use pathviz_core::{Bounds, Grid, NodeKind, Pos};
use pathviz_paths::run;
use proptest::prelude::*;

/// Random boards up to 9x9 with roughly `density` of the cells walled.
fn board(density: f64) -> impl Strategy<Value = Grid> {
    (1..10i32, 2..10i32)
        .prop_flat_map(move |(rows, cols)| {
            let n = (rows * cols) as usize;
            (
                Just(rows),
                Just(cols),
                0..n,
                0..n,
                prop::collection::vec(prop::bool::weighted(density), n),
            )
        })
        .prop_filter("markers must differ", |(_, _, s, t, _)| s != t)
        .prop_map(|(rows, cols, s, t, walls)| {
            let b = Bounds::new(rows, cols);
            let mut g = Grid::new(rows, cols, b.pos(s), b.pos(t)).unwrap();
            for (i, wall) in walls.into_iter().enumerate() {
                let p = b.pos(i);
                if wall && !g.kind(p).is_some_and(NodeKind::is_marker) {
                    g.set_kind(p, NodeKind::Wall).unwrap();
                }
            }
            g
        })
}

/// Boards from [`board`] with every cell given an entry cost in `1..=9`.
fn weighted_board(density: f64) -> impl Strategy<Value = Grid> {
    board(density)
        .prop_flat_map(|g| {
            let n = g.bounds().len();
            (Just(g), prop::collection::vec(1..=9u32, n))
        })
        .prop_map(|(mut g, weights)| {
            for (i, w) in weights.into_iter().enumerate() {
                let p = g.bounds().pos(i);
                g.set_weight(p, w).unwrap();
            }
            g
        })
}

/// Heap-based Dijkstra: cheapest total entry cost from the start to each
/// non-wall cell.
fn reference_costs(g: &Grid) -> Vec<Option<u32>> {
    let b = g.bounds();
    let mut cost = vec![None; b.len()];
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0u32, g.start())));
    while let Some(Reverse((c, p))) = heap.pop() {
        let i = b.index(p).unwrap();
        if cost[i].is_some() {
            continue;
        }
        cost[i] = Some(c);
        for n in p.neighbors_4() {
            let Some(node) = g.node(n) else { continue };
            if node.is_wall() || cost[b.index(n).unwrap()].is_some() {
                continue;
            }
            heap.push(Reverse((c + node.weight(), n)));
        }
    }
    cost
}

/// Breadth-first distances from the start over non-wall cells.
fn bfs(g: &Grid) -> Vec<Option<usize>> {
    let b = g.bounds();
    let mut dist = vec![None; b.len()];
    let mut queue = VecDeque::new();
    dist[b.index(g.start()).unwrap()] = Some(0);
    queue.push_back(g.start());
    while let Some(p) = queue.pop_front() {
        let d = dist[b.index(p).unwrap()].unwrap();
        for n in p.neighbors_4() {
            let Some(i) = b.index(n) else { continue };
            if dist[i].is_none() && g.kind(n) != Some(NodeKind::Wall) {
                dist[i] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    dist
}

proptest! {
    #[test]
    fn open_board_path_is_manhattan(g in board(0.0)) {
        let res = run(&g, g.start()).unwrap();
        let path = res.path.expect("open board always connects");
        prop_assert_eq!(path.len() - 1, g.start().manhattan(g.target()) as usize);
    }

    #[test]
    fn visited_is_clean(g in board(0.3)) {
        let res = run(&g, g.start()).unwrap();
        let mut seen = HashSet::new();
        for &p in &res.visited {
            prop_assert!(p != g.start());
            prop_assert_eq!(g.kind(p), Some(NodeKind::Empty));
            prop_assert!(seen.insert(p), "{} visited twice", p);
        }
    }

    #[test]
    fn path_is_shortest_and_walkable(g in board(0.3)) {
        let res = run(&g, g.start()).unwrap();
        let oracle = bfs(&g)[g.bounds().index(g.target()).unwrap()];
        match (&res.path, oracle) {
            (Some(path), Some(d)) => {
                prop_assert_eq!(path.len() - 1, d);
                prop_assert_eq!(res.cost, Some(d as u32));
                prop_assert_eq!(path.first(), Some(&g.start()));
                prop_assert_eq!(path.last(), Some(&g.target()));
                for w in path.windows(2) {
                    prop_assert!(w[0].is_adjacent(w[1]));
                    prop_assert!(g.kind(w[1]) != Some(NodeKind::Wall));
                }
            }
            (None, None) => {}
            (found, expected) => {
                prop_assert!(false, "engine {:?} disagrees with bfs {:?}", found, expected);
            }
        }
    }

    #[test]
    fn unreachable_target_visits_whole_component(g in board(0.45)) {
        let res = run(&g, g.start()).unwrap();
        if res.path.is_none() {
            let reachable: HashSet<Pos> = bfs(&g)
                .iter()
                .enumerate()
                .filter(|(_, d)| d.is_some_and(|d| d > 0))
                .map(|(i, _)| g.bounds().pos(i))
                .collect();
            let visited: HashSet<Pos> = res.visited.iter().copied().collect();
            prop_assert_eq!(visited.len(), res.visited.len());
            prop_assert_eq!(visited, reachable);
        }
    }

    #[test]
    fn runs_are_deterministic(g in board(0.25)) {
        prop_assert_eq!(run(&g, g.start()).unwrap(), run(&g, g.start()).unwrap());
    }

    #[test]
    fn weighted_cost_matches_reference(g in weighted_board(0.25)) {
        let res = run(&g, g.start()).unwrap();
        let expected = reference_costs(&g)[g.bounds().index(g.target()).unwrap()];
        prop_assert_eq!(res.cost, expected);
        if let Some(path) = &res.path {
            let entered: u32 = path[1..]
                .iter()
                .map(|&p| g.node(p).unwrap().weight())
                .sum();
            prop_assert_eq!(Some(entered), res.cost);
            for w in path.windows(2) {
                prop_assert!(w[0].is_adjacent(w[1]));
            }
        }
    }
}
