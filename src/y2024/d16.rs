use {
    crate::*,
    glam::IVec2,
    nom::{combinator::map_opt, error::Error, Err, IResult},
    std::collections::HashSet,
    strum::IntoEnumIterator,
};

/* --- Day 16: Reindeer Maze ---

The Reindeer start on the Start Tile (marked S) facing East and need to reach the End Tile (marked
E) with the lowest score. Moving forward one tile costs 1 point; rotating clockwise or
counterclockwise 90 degrees costs 1000 points; walls (#) can't be entered.

Part one asks for the lowest score. Part two asks how many tiles are part of at least one of the
best paths through the maze, including the S and E tiles. */

define_cell! {
    #[repr(u8)]
    #[cfg_attr(test, derive(Debug))]
    #[derive(Clone, Copy, Default, PartialEq)]
    enum Cell {
        #[default]
        Empty = b'.',
        Wall = b'#',
        Start = b'S',
        End = b'E',
        BestPathTile = b'O',
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    grid: Grid2D<Cell>,
    start: IVec2,
    end: IVec2,
}

impl Solution {
    const START_DIR: Direction = Direction::East;
    const STEP_COST: u32 = 1_u32;
    const TURN_COST: u32 = 1000_u32;

    fn build_graph(&self) -> WeightedGraph<PosAndDir> {
        oriented_graph(
            &self.grid,
            |cell: &Cell| *cell != Cell::Wall,
            Self::STEP_COST,
            Self::TURN_COST,
        )
    }

    fn end_states(&self) -> Vec<PosAndDir> {
        // The end tile is acceptable at any final facing.
        Direction::iter()
            .map(|dir| PosAndDir::new(self.end, dir))
            .collect()
    }

    fn try_best_paths(&self) -> Option<ShortestPathSet<PosAndDir>> {
        all_shortest_paths(
            &self.build_graph(),
            PosAndDir::new(self.start, Self::START_DIR),
            &self.end_states(),
        )
    }

    fn try_min_score(&self) -> Option<u32> {
        self.try_best_paths().map(|path_set| path_set.cost)
    }

    fn try_best_path_tiles(&self) -> Option<HashSet<IVec2>> {
        self.try_best_paths()
            .map(|path_set| distinct_path_positions(&path_set.paths))
    }

    fn try_best_path_tile_count(&self) -> Option<usize> {
        self.try_best_path_tiles()
            .map(|best_path_tiles| best_path_tiles.len())
    }

    fn try_best_path_tile_count_and_string(&self) -> Option<(usize, String)> {
        self.try_best_path_tiles().map(|best_path_tiles| {
            let count: usize = best_path_tiles.len();
            let mut grid: Grid2D<Cell> = self.grid.clone();

            for best_path_tile in best_path_tiles {
                *grid.get_mut(best_path_tile).unwrap() = Cell::BestPathTile;
            }

            (count, grid.into())
        })
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_opt(Grid2D::parse, |grid: Grid2D<Cell>| {
            let has_no_best_path_tiles: bool = grid
                .iter_positions_with_cell(&Cell::BestPathTile)
                .next()
                .is_none();

            has_no_best_path_tiles
                .then(|| {
                    grid.try_find_single_position_with_cell(&Cell::Start)
                        .zip(grid.try_find_single_position_with_cell(&Cell::End))
                })
                .flatten()
                .map(|(start, end)| Self { grid, start, end })
        })(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        if let Some(min_score) = self.try_min_score() {
            dbg!(min_score);
        } else {
            eprintln!("Failed to find path to end.");
        }
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(self.try_best_path_tile_count());
        } else if let Some((best_path_tile_count, grid_string)) =
            self.try_best_path_tile_count_and_string()
        {
            dbg!(best_path_tile_count);
            println!("{grid_string}");
        } else {
            eprintln!("Failed to find path to end.");
        }
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STRS: &'static [&'static str] = &[
        "\
        ###############\n\
        #.......#....E#\n\
        #.#.###.#.###.#\n\
        #.....#.#...#.#\n\
        #.###.#####.#.#\n\
        #.#.#.......#.#\n\
        #.#.#####.###.#\n\
        #...........#.#\n\
        ###.#.#####.#.#\n\
        #...#.....#.#.#\n\
        #.#.#.###.#.#.#\n\
        #.....#...#.#.#\n\
        #.###.#.#.#.#.#\n\
        #S..#.....#...#\n\
        ###############\n",
        "\
        #################\n\
        #...#...#...#..E#\n\
        #.#.#.#.#.#.#.#.#\n\
        #.#.#.#...#...#.#\n\
        #.#.#.#.###.#.#.#\n\
        #...#.#.#.....#.#\n\
        #.#.#.#.#.#####.#\n\
        #.#...#.#.#.....#\n\
        #.#.#####.#.###.#\n\
        #.#.#.......#...#\n\
        #.#.###.#####.###\n\
        #.#.#...#.....#.#\n\
        #.#.#.#####.###.#\n\
        #.#.#.........#.#\n\
        #.#.#.#########.#\n\
        #S#.............#\n\
        #################\n",
    ];

    fn solution(index: usize) -> &'static Solution {
        static ONCE_LOCK: OnceLock<Vec<Solution>> = OnceLock::new();

        &ONCE_LOCK.get_or_init(|| {
            SOLUTION_STRS
                .iter()
                .copied()
                .map(|solution_str| Solution::try_from(solution_str).unwrap())
                .collect()
        })[index]
    }

    #[test]
    fn test_try_from_str() {
        for (index, (start, end)) in [
            (IVec2::new(1_i32, 13_i32), IVec2::new(13_i32, 1_i32)),
            (IVec2::new(1_i32, 15_i32), IVec2::new(15_i32, 1_i32)),
        ]
        .into_iter()
        .enumerate()
        {
            let solution: &Solution = solution(index);

            assert_eq!(solution.start, start);
            assert_eq!(solution.end, end);

            // The cell grid renders back to the input text unchanged.
            assert_eq!(
                String::from(solution.grid.clone()),
                SOLUTION_STRS[index]
            );
        }
    }

    #[test]
    fn test_try_from_str_rejects_malformed_grids() {
        for invalid_solution_str in [
            // No start tile
            "..E\n",
            // Duplicated start tile
            "SSE\n",
            // No end tile
            "S..\n",
            // A best-path tile can only be produced, never consumed
            "SOE\n",
        ] {
            assert!(Solution::try_from(invalid_solution_str).is_err());
        }
    }

    #[test]
    fn test_try_min_score() {
        for (index, min_score) in [Some(7036_u32), Some(11048_u32)].into_iter().enumerate() {
            assert_eq!(solution(index).try_min_score(), min_score);
        }
    }

    #[test]
    fn test_try_best_path_tile_count() {
        for (index, best_path_tile_count) in
            [Some(45_usize), Some(64_usize)].into_iter().enumerate()
        {
            assert_eq!(
                solution(index).try_best_path_tile_count(),
                best_path_tile_count
            );
        }
    }

    #[test]
    fn test_best_paths_share_the_minimum_cost() {
        for index in 0_usize..SOLUTION_STRS.len() {
            let solution: &Solution = solution(index);
            let graph: WeightedGraph<PosAndDir> = solution.build_graph();
            let path_set: ShortestPathSet<PosAndDir> = solution.try_best_paths().unwrap();

            assert!(!path_set.paths.is_empty());

            for path in &path_set.paths {
                let total_weight: u32 = path
                    .windows(2_usize)
                    .map(|pair| graph.edge_weight(pair[0_usize], pair[1_usize]).unwrap())
                    .sum();

                assert_eq!(total_weight, path_set.cost);
            }

            // Identical queries return path sets of identical size.
            assert_eq!(
                solution.try_best_paths().unwrap().paths.len(),
                path_set.paths.len()
            );
        }
    }
}
