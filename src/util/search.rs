use {
    super::{
        grid_2d_try_index_from_pos_and_dimensions, manhattan_distance_2d, Direction, Grid2D,
        PosAndDir,
    },
    bitvec::prelude::*,
    glam::IVec2,
    std::{
        cmp::Ordering,
        collections::{BinaryHeap, HashMap, HashSet},
        hash::Hash,
    },
    strum::IntoEnumIterator,
};

/// A directed graph over copyable search states, with non-negative integer edge weights.
///
/// Edges are generated deterministically when the graph is built and never mutated afterwards. A
/// state with no outgoing edges (a dead end) is valid.
pub struct WeightedGraph<V: Copy + Eq + Hash> {
    adjacency: HashMap<V, Vec<(V, u32)>>,
}

impl<V: Copy + Eq + Hash> WeightedGraph<V> {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    pub fn add_edge(&mut self, from: V, to: V, weight: u32) {
        self.adjacency.entry(from).or_default().push((to, weight));
    }

    pub fn edges_from(&self, vertex: V) -> &[(V, u32)] {
        self.adjacency
            .get(&vertex)
            .map_or(&[], |edges| edges.as_slice())
    }

    pub fn edge_weight(&self, from: V, to: V) -> Option<u32> {
        self.edges_from(from)
            .iter()
            .find_map(|&(vertex, weight)| (vertex == to).then_some(weight))
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    fn iter_edges(&self) -> impl Iterator<Item = (V, V, u32)> + '_ {
        self.adjacency.iter().flat_map(|(&from, edges)| {
            edges.iter().map(move |&(to, weight)| (from, to, weight))
        })
    }
}

impl<V: Copy + Eq + Hash> Default for WeightedGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the unit-weight graph over bare positions: an edge from each passable cell to each of
/// its passable cardinal neighbors.
pub fn position_graph<T, P: Fn(&T) -> bool>(
    grid: &Grid2D<T>,
    passable: P,
) -> WeightedGraph<IVec2> {
    let mut graph: WeightedGraph<IVec2> = WeightedGraph::new();

    for pos in grid.iter_filtered_positions(&passable) {
        for neighbor in grid.iter_neighbors(pos) {
            if grid.get(neighbor).map_or(false, &passable) {
                graph.add_edge(pos, neighbor, 1_u32);
            }
        }
    }

    graph
}

/// Builds the graph over position-and-facing states. Encoding the facing into the state is what
/// lets a plain shortest-path search account for turn penalties: moving forward keeps the facing
/// at `step_cost`, while quarter turns in place cost `turn_cost`.
pub fn oriented_graph<T, P: Fn(&T) -> bool>(
    grid: &Grid2D<T>,
    passable: P,
    step_cost: u32,
    turn_cost: u32,
) -> WeightedGraph<PosAndDir> {
    let mut graph: WeightedGraph<PosAndDir> = WeightedGraph::new();

    for pos in grid.iter_filtered_positions(&passable) {
        for dir in Direction::iter() {
            let state: PosAndDir = PosAndDir::new(pos, dir);
            let forward: IVec2 = pos + dir.vec();

            if grid.get(forward).map_or(false, &passable) {
                graph.add_edge(state, PosAndDir::new(forward, dir), step_cost);
            }

            graph.add_edge(state, PosAndDir::new(pos, dir.prev()), turn_cost);
            graph.add_edge(state, PosAndDir::new(pos, dir.next()), turn_cost);
        }
    }

    graph
}

struct OpenSetElement<V> {
    cost: u32,
    vertex: V,
}

impl<V> PartialEq for OpenSetElement<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl<V> Eq for OpenSetElement<V> {}

impl<V> PartialOrd for OpenSetElement<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V> Ord for OpenSetElement<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the order so that cost is minimized when popping from the heap
        other.cost.cmp(&self.cost)
    }
}

/// Computes the minimum cost from `source` to every reachable vertex. Absence from the returned
/// map means unreachable.
pub fn dijkstra<V: Copy + Eq + Hash>(graph: &WeightedGraph<V>, source: V) -> HashMap<V, u32> {
    let mut cost_from_source: HashMap<V, u32> = HashMap::new();
    let mut open_set: BinaryHeap<OpenSetElement<V>> = BinaryHeap::new();

    cost_from_source.insert(source, 0_u32);
    open_set.push(OpenSetElement {
        cost: 0_u32,
        vertex: source,
    });

    while let Some(OpenSetElement { cost, vertex }) = open_set.pop() {
        if cost > cost_from_source[&vertex] {
            // A cheaper route to this vertex was already expanded.
            continue;
        }

        for &(neighbor, weight) in graph.edges_from(vertex) {
            let neighbor_cost: u32 = cost + weight;

            if cost_from_source
                .get(&neighbor)
                .map_or(true, |&known_cost| neighbor_cost < known_cost)
            {
                cost_from_source.insert(neighbor, neighbor_cost);
                open_set.push(OpenSetElement {
                    cost: neighbor_cost,
                    vertex: neighbor,
                });
            }
        }
    }

    cost_from_source
}

/// All distinct minimum-cost paths from one source to any member of an acceptable-target set,
/// together with that minimum cost. Every path has total edge weight equal to `cost`.
pub struct ShortestPathSet<V> {
    pub cost: u32,
    pub paths: Vec<Vec<V>>,
}

/// Finds the minimum cost from `source` to any of `targets`, then enumerates every path achieving
/// it. Returns `None` when no target is reachable.
///
/// The enumeration only ever walks tight edges, those `(from, to, weight)` with
/// `cost(source, from) + weight == cost(source, to)`. Restricting to the DAG they form is what
/// keeps this a bounded traversal instead of an exponential re-search. The worklist is explicit,
/// so path counts aren't limited by stack depth.
pub fn all_shortest_paths<V: Copy + Eq + Hash>(
    graph: &WeightedGraph<V>,
    source: V,
    targets: &[V],
) -> Option<ShortestPathSet<V>> {
    let cost_from_source: HashMap<V, u32> = dijkstra(graph, source);

    let cost: u32 = targets
        .iter()
        .filter_map(|target| cost_from_source.get(target))
        .copied()
        .min()?;

    let mut tight_predecessors: HashMap<V, Vec<V>> = HashMap::new();

    for (from, to, weight) in graph.iter_edges() {
        if let (Some(&from_cost), Some(&to_cost)) =
            (cost_from_source.get(&from), cost_from_source.get(&to))
        {
            if from_cost + weight == to_cost {
                tight_predecessors.entry(to).or_default().push(from);
            }
        }
    }

    let mut paths: Vec<Vec<V>> = Vec::new();
    let mut worklist: Vec<Vec<V>> = targets
        .iter()
        .copied()
        .filter(|target| cost_from_source.get(target) == Some(&cost))
        .map(|target| vec![target])
        .collect();

    while let Some(reversed_path) = worklist.pop() {
        let current: V = *reversed_path.last().unwrap();

        if current == source {
            let mut path: Vec<V> = reversed_path;

            path.reverse();
            paths.push(path);
        } else if let Some(predecessors) = tight_predecessors.get(&current) {
            for &predecessor in predecessors {
                let mut extended: Vec<V> = reversed_path.clone();

                extended.push(predecessor);
                worklist.push(extended);
            }
        }
    }

    Some(ShortestPathSet { cost, paths })
}

struct AStarOpenSetElement {
    estimate: u32,

    /// Monotonically increasing, so that equal estimates pop in insertion order.
    sequence: u64,

    pos: IVec2,
}

impl PartialEq for AStarOpenSetElement {
    fn eq(&self, other: &Self) -> bool {
        self.estimate == other.estimate && self.sequence == other.sequence
    }
}

impl Eq for AStarOpenSetElement {}

impl PartialOrd for AStarOpenSetElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AStarOpenSetElement {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the order so that the cheapest, oldest element pops first
        (other.estimate, other.sequence).cmp(&(self.estimate, self.sequence))
    }
}

/// Single-target A* over a bounded grid with a growing obstacle set.
///
/// Each `min_steps` invocation is a fresh, independent search; the only state carried between
/// calls is the obstacle set itself. The Manhattan heuristic never overestimates the true
/// remaining step count, so the first pop of the target is optimal.
pub struct GridAStar {
    obstacles: BitVec,
    dimensions: IVec2,
}

impl GridAStar {
    pub fn new(dimensions: IVec2) -> Self {
        assert!(dimensions.cmpgt(IVec2::ZERO).all());

        Self {
            obstacles: bitvec![0; dimensions.x as usize * dimensions.y as usize],
            dimensions,
        }
    }

    /// Returns `true` iff `pos` is in bounds and wasn't already an obstacle.
    pub fn add_obstacle(&mut self, pos: IVec2) -> bool {
        grid_2d_try_index_from_pos_and_dimensions(pos, self.dimensions).map_or(false, |index| {
            let was_open: bool = !self.obstacles[index];

            self.obstacles.set(index, true);

            was_open
        })
    }

    pub fn is_obstacle(&self, pos: IVec2) -> bool {
        grid_2d_try_index_from_pos_and_dimensions(pos, self.dimensions)
            .map_or(false, |index| self.obstacles[index])
    }

    /// The minimum step count from `start` to `end`, or `None` when the open set empties without
    /// reaching `end`. Unreachability is a normal result, not a failure.
    pub fn min_steps(&self, start: IVec2, end: IVec2) -> Option<u32> {
        let mut steps_from_start: HashMap<IVec2, u32> = HashMap::new();
        let mut open_set: BinaryHeap<AStarOpenSetElement> = BinaryHeap::new();
        let mut sequence: u64 = 0_u64;

        if !grid_2d_try_index_from_pos_and_dimensions(start, self.dimensions)
            .map_or(false, |index| !self.obstacles[index])
        {
            return None;
        }

        steps_from_start.insert(start, 0_u32);
        open_set.push(AStarOpenSetElement {
            estimate: manhattan_distance_2d(start, end) as u32,
            sequence,
            pos: start,
        });
        sequence += 1_u64;

        while let Some(AStarOpenSetElement { pos, .. }) = open_set.pop() {
            if pos == end {
                return Some(steps_from_start[&pos]);
            }

            let next_steps: u32 = steps_from_start[&pos] + 1_u32;

            for dir in Direction::iter() {
                let neighbor: IVec2 = pos + dir.vec();

                if grid_2d_try_index_from_pos_and_dimensions(neighbor, self.dimensions)
                    .map_or(false, |index| !self.obstacles[index])
                    && steps_from_start
                        .get(&neighbor)
                        .map_or(true, |&known_steps| next_steps < known_steps)
                {
                    steps_from_start.insert(neighbor, next_steps);
                    open_set.push(AStarOpenSetElement {
                        estimate: next_steps + manhattan_distance_2d(neighbor, end) as u32,
                        sequence,
                        pos: neighbor,
                    });
                    sequence += 1_u64;
                }
            }
        }

        None
    }
}

/// The distinct positions lying on at least one path of the set, with the facing component
/// dropped.
pub fn distinct_path_positions(paths: &[Vec<PosAndDir>]) -> HashSet<IVec2> {
    paths
        .iter()
        .flat_map(|path| path.iter().map(|state| state.pos))
        .collect()
}

/// Counts position pairs on `track` where jumping directly (a detour of Manhattan length at most
/// `max_detour`) saves at least `min_gain` steps versus following the track.
///
/// `track` is an ordered walk; the step count between two track indices is their index
/// difference, so the gain of a jump from index `i` to index `j` is `j - i - distance`.
pub fn count_shortcuts(track: &[IVec2], max_detour: i32, min_gain: i32) -> usize {
    let track_indices: HashMap<IVec2, usize> = track
        .iter()
        .enumerate()
        .map(|(index, &pos)| (pos, index))
        .collect();

    let mut shortcuts: usize = 0_usize;

    for (from_index, &from_pos) in track.iter().enumerate() {
        for y_offset in -max_detour..=max_detour {
            let x_budget: i32 = max_detour - y_offset.abs();

            for x_offset in -x_budget..=x_budget {
                let to_pos: IVec2 = from_pos + IVec2::new(x_offset, y_offset);

                if let Some(&to_index) = track_indices.get(&to_pos) {
                    let gain: i64 = to_index as i64
                        - from_index as i64
                        - manhattan_distance_2d(from_pos, to_pos) as i64;

                    if gain >= min_gain as i64 {
                        shortcuts += 1_usize;
                    }
                }
            }
        }
    }

    shortcuts
}
