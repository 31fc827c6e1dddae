use {
    crate::*,
    glam::IVec2,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::map,
        error::Error,
        multi::separated_list0,
        sequence::separated_pair,
        Err, IResult,
    },
};

/* --- Day 18: RAM Run ---

Bytes fall into a 71x71 memory space (coordinates 0 to 70), one per nanosecond, at the positions
listed in the input. Corrupted coordinates can't be entered. Part one asks for the minimum step
count from the top-left corner to the bottom-right exit after the first kilobyte of bytes has
fallen. Part two asks for the coordinates of the first byte that cuts the exit off entirely,
formatted as `x,y`. */

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<IVec2>);

impl Solution {
    const CORRUPTED_BYTE_COUNT: usize = 1024_usize;
    const DIMENSIONS: IVec2 = IVec2::new(71_i32, 71_i32);
    const START: IVec2 = IVec2::ZERO;
    const END: IVec2 = IVec2::new(Self::DIMENSIONS.x - 1_i32, Self::DIMENSIONS.y - 1_i32);

    fn search_after_corrupted_bytes(
        &self,
        corrupted_byte_count: usize,
        dimensions: IVec2,
    ) -> GridAStar {
        let mut search: GridAStar = GridAStar::new(dimensions);

        for corrupted_byte in &self.0[..corrupted_byte_count.min(self.0.len())] {
            search.add_obstacle(*corrupted_byte);
        }

        search
    }

    fn try_min_steps_to_exit(
        &self,
        corrupted_byte_count: usize,
        dimensions: IVec2,
        start: IVec2,
        end: IVec2,
    ) -> Option<u32> {
        self.search_after_corrupted_bytes(corrupted_byte_count, dimensions)
            .min_steps(start, end)
    }

    /// Adds bytes one at a time, re-running a fresh search after each addition. Only the obstacle
    /// set carries over between queries.
    fn try_first_byte_preventing_exit(
        &self,
        dimensions: IVec2,
        start: IVec2,
        end: IVec2,
    ) -> Option<IVec2> {
        let mut search: GridAStar = GridAStar::new(dimensions);

        self.0.iter().copied().find(|&corrupted_byte| {
            // A byte falling on an already-corrupted coordinate can't change reachability.
            search.add_obstacle(corrupted_byte) && search.min_steps(start, end).is_none()
        })
    }

    fn try_first_byte_preventing_exit_string(
        &self,
        dimensions: IVec2,
        start: IVec2,
        end: IVec2,
    ) -> Option<String> {
        self.try_first_byte_preventing_exit(dimensions, start, end)
            .map(|pos| format!("{},{}", pos.x, pos.y))
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            separated_list0(
                line_ending,
                map(
                    separated_pair(parse_integer, tag(","), parse_integer),
                    |(x, y)| IVec2 { x, y },
                ),
            ),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        if let Some(min_steps_to_exit) = self.try_min_steps_to_exit(
            Self::CORRUPTED_BYTE_COUNT,
            Self::DIMENSIONS,
            Self::START,
            Self::END,
        ) {
            dbg!(min_steps_to_exit);
        } else {
            eprintln!("Failed to find path to exit.");
        }
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        if let Some(first_byte_preventing_exit_string) =
            self.try_first_byte_preventing_exit_string(Self::DIMENSIONS, Self::START, Self::END)
        {
            dbg!(first_byte_preventing_exit_string);
        } else {
            eprintln!("Failed to find a byte preventing exit.");
        }
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
