use {
    crate::*,
    glam::IVec2,
    nom::{combinator::map_opt, error::Error, Err, IResult},
};

/* --- Day 20: Race Condition ---

The racetrack is a single twisting corridor from S to E; each move takes 1 picosecond. Exactly
once during a race, a program may cheat by disabling collision for a bounded number of moves,
jumping through walls between two track positions. Part one counts the cheats of length at most 2
that save at least 100 picoseconds; part two allows cheats of length at most 20. */

define_cell! {
    #[repr(u8)]
    #[cfg_attr(test, derive(Debug))]
    #[derive(Clone, Copy, Default, PartialEq)]
    enum Cell {
        #[default]
        Track = b'.',
        Wall = b'#',
        Start = b'S',
        End = b'E',
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    grid: Grid2D<Cell>,
    start: IVec2,
    end: IVec2,
}

impl Solution {
    const SHORT_CHEAT_DETOUR: i32 = 2_i32;
    const LONG_CHEAT_DETOUR: i32 = 20_i32;
    const MIN_GAIN: i32 = 100_i32;

    /// Walks the corridor from start to end, never backtracking. Returns `None` if the walk dead
    /// ends or branches off a single corridor for longer than the grid area allows.
    fn try_track(&self) -> Option<Vec<IVec2>> {
        let mut track: Vec<IVec2> = vec![self.start];

        while *track.last().unwrap() != self.end {
            if track.len() > self.grid.area() {
                return None;
            }

            let current: IVec2 = *track.last().unwrap();
            let previous: Option<IVec2> = track
                .len()
                .checked_sub(2_usize)
                .map(|previous_index| track[previous_index]);
            let next: IVec2 = self
                .grid
                .iter_neighbors(current)
                .find(|&neighbor| {
                    self.grid.get(neighbor).copied() != Some(Cell::Wall)
                        && Some(neighbor) != previous
                })?;

            track.push(next);
        }

        Some(track)
    }

    fn try_cheat_count(&self, max_detour: i32, min_gain: i32) -> Option<usize> {
        self.try_track()
            .map(|track| count_shortcuts(&track, max_detour, min_gain))
    }

    fn try_short_cheat_count(&self) -> Option<usize> {
        self.try_cheat_count(Self::SHORT_CHEAT_DETOUR, Self::MIN_GAIN)
    }

    fn try_long_cheat_count(&self) -> Option<usize> {
        self.try_cheat_count(Self::LONG_CHEAT_DETOUR, Self::MIN_GAIN)
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_opt(Grid2D::parse, |grid: Grid2D<Cell>| {
            grid.try_find_single_position_with_cell(&Cell::Start)
                .zip(grid.try_find_single_position_with_cell(&Cell::End))
                .map(|(start, end)| Self { grid, start, end })
        })(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        if let Some(short_cheat_count) = self.try_short_cheat_count() {
            dbg!(short_cheat_count);
        } else {
            eprintln!("Failed to walk the track from start to end.");
        }
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        if let Some(long_cheat_count) = self.try_long_cheat_count() {
            dbg!(long_cheat_count);
        } else {
            eprintln!("Failed to walk the track from start to end.");
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

    const SOLUTION_STRS: &'static [&'static str] = &["\
        ###############\n\
        #...#...#.....#\n\
        #.#.#.#.#.###.#\n\
        #S#...#.#.#...#\n\
        #######.#.#.###\n\
        #######.#.#...#\n\
        #######.#.###.#\n\
        ###..E#...#...#\n\
        ###.#######.###\n\
        #...###...#...#\n\
        #.#####.#.###.#\n\
        #.#...#.#.#...#\n\
        #.#.#.#.#.#.###\n\
        #...#...#...###\n\
        ###############\n"];

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
        let solution: &Solution = solution(0_usize);

        assert_eq!(solution.start, IVec2::new(1_i32, 3_i32));
        assert_eq!(solution.end, IVec2::new(5_i32, 7_i32));
    }

    #[test]
    fn test_try_track() {
        let track: Vec<IVec2> = solution(0_usize).try_track().unwrap();

        // The fastest time without cheating is 84 picoseconds.
        assert_eq!(track.len(), 85_usize);
        assert_eq!(*track.first().unwrap(), solution(0_usize).start);
        assert_eq!(*track.last().unwrap(), solution(0_usize).end);
    }

    #[test]
    fn test_try_short_cheat_counts() {
        let solution: &Solution = solution(0_usize);

        // From the worked example: 14 cheats save 2, 14 save 4, 2 save 6, 4 save 8, 2 save 10,
        // 3 save 12, and one each save 20, 36, 38, 40, and 64.
        for (min_gain, cheat_count) in [
            (2_i32, 44_usize),
            (4_i32, 30_usize),
            (12_i32, 8_usize),
            (20_i32, 5_usize),
            (38_i32, 3_usize),
            (64_i32, 1_usize),
            (65_i32, 0_usize),
        ] {
            assert_eq!(
                solution.try_cheat_count(Solution::SHORT_CHEAT_DETOUR, min_gain),
                Some(cheat_count),
                "min_gain {min_gain}"
            );
        }
    }

    #[test]
    fn test_try_long_cheat_counts() {
        let solution: &Solution = solution(0_usize);

        // From the worked example: 32 cheats save 50, 31 save 52, 29 save 54, 39 save 56, 25 save
        // 58, 23 save 60, 20 save 62, 19 save 64, 12 save 66, 14 save 68, 12 save 70, 22 save 72,
        // 4 save 74, and 3 save 76.
        for (min_gain, cheat_count) in [
            (50_i32, 285_usize),
            (60_i32, 129_usize),
            (72_i32, 29_usize),
            (74_i32, 7_usize),
            (76_i32, 3_usize),
            (77_i32, 0_usize),
        ] {
            assert_eq!(
                solution.try_cheat_count(Solution::LONG_CHEAT_DETOUR, min_gain),
                Some(cheat_count),
                "min_gain {min_gain}"
            );
        }
    }
}
