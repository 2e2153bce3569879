use rand::{rngs::StdRng, Rng, SeedableRng};
use wayfind::{GraphError, RouteNetwork, WeightedDigraph};

const EPSILON: f64 = 1e-9;

// Random graph over nodes 0..nodes - duplicate picks just update the weight
fn random_graph(rng: &mut StdRng, nodes: u32, edges: usize) -> WeightedDigraph<u32, f64> {
    let mut graph = WeightedDigraph::new();
    for node in 0..nodes {
        graph.insert_node(node);
    }
    for _ in 0..edges {
        let source = rng.random_range(0..nodes);
        let successor = rng.random_range(0..nodes);
        let weight = rng.random_range(0.0..10.0);
        graph.insert_edge(source, successor, weight).unwrap();
    }
    graph
}

// Reference costs from Bellman-Ford
fn bellman_ford(graph: &WeightedDigraph<u32, f64>, start: u32, nodes: u32) -> Vec<Option<f64>> {
    let mut costs = vec![None; nodes as usize];
    costs[start as usize] = Some(0.0);

    for _ in 0..nodes {
        for (&source, &successor, weight) in graph.edges() {
            if let Some(cost) = costs[source as usize] {
                let candidate = cost + weight;
                match costs[successor as usize] {
                    Some(existing) if existing <= candidate => {}
                    _ => costs[successor as usize] = Some(candidate),
                }
            }
        }
    }
    costs
}

fn path_cost(graph: &WeightedDigraph<u32, f64>, path: &[u32]) -> f64 {
    path.windows(2).map(|hop| graph.get_edge(&hop[0], &hop[1]).unwrap()).sum()
}

#[test]
fn test_random_graphs_match_bellman_ford() {
    let mut rng = StdRng::seed_from_u64(7);

    for round in 0..40 {
        let nodes = rng.random_range(2..25);
        let edges = rng.random_range(0..(nodes as usize * 3));
        let graph = random_graph(&mut rng, nodes, edges);
        let start = rng.random_range(0..nodes);
        let expected = bellman_ford(&graph, start, nodes);

        for end in 0..nodes {
            match (expected[end as usize], graph.shortest_path_data(&start, &end)) {
                (Some(cost), Ok(path)) => {
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&end));
                    assert!((path_cost(&graph, &path) - cost).abs() < EPSILON, "round {round}: {start} -> {end}");
                    assert!((graph.shortest_path_cost(&start, &end).unwrap() - cost).abs() < EPSILON);
                }
                (None, Err(error)) => {
                    assert_eq!(error, GraphError::NoPathFound { start, end });
                }
                (expected, actual) => panic!("round {round}: {start} -> {end}, expected {expected:?}, got {actual:?}"),
            }
        }

        // single-source search settles exactly the reachable nodes
        let costs = graph.shortest_path_costs(&start).unwrap();
        assert_eq!(costs.len(), expected.iter().filter(|cost| cost.is_some()).count());
        for (node, cost) in &costs {
            let reference = expected[*node as usize].unwrap();
            assert!((cost - reference).abs() < EPSILON);
        }
    }
}

#[test]
fn test_via_cost_is_sum_of_legs() {
    let mut rng = StdRng::seed_from_u64(42);
    let graph = random_graph(&mut rng, 12, 60);

    for start in 0..12 {
        for via in 0..12 {
            let end = (start + via) % 12;
            let first = graph.shortest_path_cost(&start, &via);
            let second = graph.shortest_path_cost(&via, &end);

            match (first, second) {
                (Ok(first), Ok(second)) => {
                    let path = graph.shortest_path_via(&start, &via, &end).unwrap();
                    assert!(path.contains(&via));
                    assert!((path_cost(&graph, &path) - (first + second)).abs() < EPSILON);
                    assert!((graph.shortest_path_cost_via(&start, &via, &end).unwrap() - (first + second)).abs() < EPSILON);
                }
                _ => {
                    let error = graph.shortest_path_via(&start, &via, &end).unwrap_err();
                    assert_eq!(error, GraphError::NoPathFound { start, end });
                }
            }
        }
    }
}

#[test]
fn test_campus_data_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/campus.dot");
    let network = RouteNetwork::load_dot_file(path).unwrap();

    assert_eq!(network.locations().count(), 6);

    let route = network.find_shortest_path("Union South", "Helen C White Hall").unwrap();
    assert_eq!(route, vec!["Union South", "Mosse Humanities Building", "Memorial Union", "Helen C White Hall"]);

    let times = network.travel_times_on_path("Union South", "Helen C White Hall").unwrap();
    assert_eq!(times, vec![190.8, 236.0, 110.0]);
    let total = network.total_travel_time("Union South", "Helen C White Hall").unwrap();
    assert!((total - times.iter().sum::<f64>()).abs() < EPSILON);

    let via = network.find_shortest_path_via("Union South", "Atmospheric, Oceanic and Space Sciences", "Helen C White Hall").unwrap();
    assert_eq!(via.first().map(String::as_str), Some("Union South"));
    assert_eq!(via.iter().filter(|stop| *stop == "Atmospheric, Oceanic and Space Sciences").count(), 1);
}
