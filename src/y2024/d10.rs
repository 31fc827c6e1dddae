use {
    crate::*,
    glam::IVec2,
    nom::{character::complete::satisfy, combinator::map, error::Error, Err, IResult},
    std::collections::HashSet,
};

/* --- Day 10: Hoof It ---

The topographic map marks each position's height from 0 to 9. A hiking trail starts at height 0,
ends at height 9, and always increases by exactly 1 per step, in cardinal directions only. Part
one sums each trailhead's score, the number of distinct height-9 positions reachable from it.
Part two sums each trailhead's rating, the number of distinct hiking trails beginning at it. */

#[cfg_attr(test, derive(Debug))]
#[derive(Clone, Copy, Default, PartialEq)]
struct Height(u8);

impl Height {
    const TRAILHEAD: Self = Self(0_u8);
    const PEAK: Self = Self(9_u8);
}

impl Parse for Height {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(satisfy(|c| c.is_ascii_digit()), |c| Self(c as u8 - b'0'))(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Grid2D<Height>);

impl Solution {
    fn is_uphill_step(&self, from: IVec2, to: IVec2) -> bool {
        match (self.0.get(from), self.0.get(to)) {
            (Some(&Height(from_height)), Some(&Height(to_height))) => {
                to_height == from_height + 1_u8
            }
            _ => false,
        }
    }

    fn iter_trailheads(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.0.iter_positions_with_cell(&Height::TRAILHEAD)
    }

    /// The number of distinct peaks reachable from `trailhead`, via an explicit worklist so deep
    /// trails can't exhaust the stack.
    fn trailhead_score(&self, trailhead: IVec2) -> usize {
        let mut explored: HashSet<IVec2> = HashSet::new();
        let mut worklist: Vec<IVec2> = vec![trailhead];
        let mut peaks: usize = 0_usize;

        explored.insert(trailhead);

        while let Some(pos) = worklist.pop() {
            if self.0.get(pos) == Some(&Height::PEAK) {
                peaks += 1_usize;
            } else {
                for neighbor in self.0.iter_neighbors(pos) {
                    if self.is_uphill_step(pos, neighbor) && explored.insert(neighbor) {
                        worklist.push(neighbor);
                    }
                }
            }
        }

        peaks
    }

    /// The number of distinct trails from `trailhead` to any peak. Heights strictly increase
    /// along a trail, so re-pushing a position once per distinct route counts each trail exactly
    /// once without looping.
    fn trailhead_rating(&self, trailhead: IVec2) -> usize {
        let mut worklist: Vec<IVec2> = vec![trailhead];
        let mut trails: usize = 0_usize;

        while let Some(pos) = worklist.pop() {
            if self.0.get(pos) == Some(&Height::PEAK) {
                trails += 1_usize;
            } else {
                for neighbor in self.0.iter_neighbors(pos) {
                    if self.is_uphill_step(pos, neighbor) {
                        worklist.push(neighbor);
                    }
                }
            }
        }

        trails
    }

    fn trailhead_score_sum(&self) -> usize {
        self.iter_trailheads()
            .map(|trailhead| self.trailhead_score(trailhead))
            .sum()
    }

    fn trailhead_rating_sum(&self) -> usize {
        self.iter_trailheads()
            .map(|trailhead| self.trailhead_rating(trailhead))
            .sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(Grid2D::parse, Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.trailhead_score_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.trailhead_rating_sum());
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
        89010123\n\
        78121874\n\
        87430965\n\
        96549874\n\
        45678903\n\
        32019012\n\
        01329801\n\
        10456732\n"];

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

        assert_eq!(solution.0.dimensions(), IVec2::new(8_i32, 8_i32));
        assert_eq!(solution.iter_trailheads().count(), 9_usize);
    }

    #[test]
    fn test_trailhead_score_sum() {
        assert_eq!(solution(0_usize).trailhead_score_sum(), 36_usize);
    }

    #[test]
    fn test_trailhead_rating_sum() {
        assert_eq!(solution(0_usize).trailhead_rating_sum(), 81_usize);
    }
}
