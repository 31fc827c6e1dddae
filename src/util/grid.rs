use {
    super::Parse,
    glam::IVec2,
    nom::{
        character::complete::line_ending,
        combinator::{map_res, opt},
        error::{Error as NomError, ErrorKind as NomErrorKind},
        multi::many1_count,
        sequence::tuple,
        Err, IResult,
    },
    static_assertions::const_assert,
    std::{
        fmt::{Debug, DebugList, Formatter, Result as FmtResult, Write},
        mem::transmute,
        str::from_utf8,
    },
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

macro_rules! define_direction {
    {
        $( #[$meta:meta] )*
        $vis:vis enum $direction:ident {
            $( $variant:ident, )*
        }
    } => {
        $( #[$meta] )*
        $vis enum $direction {
            $( $variant, )*
        }

        const VECS: [IVec2; $direction::COUNT] = [
            $( $direction::$variant.vec_internal(), )*
        ];
    };
}

define_direction! {
    #[derive(Copy, Clone, Debug, EnumCount, EnumIter, Eq, Hash, PartialEq)]
    #[repr(u8)]
    pub enum Direction {
        North,
        East,
        South,
        West,
    }
}

// This guarantees we can safely convert from `u8` to `Direction` by masking the smallest 2 bits,
// which is the same as masking by `MASK`
const_assert!(Direction::COUNT == 4_usize);

impl Direction {
    pub const COUNT_U8: u8 = Self::COUNT as u8;
    pub const MASK: u8 = Self::COUNT_U8 - 1_u8;
    pub const HALF_COUNT: u8 = Self::COUNT_U8 / 2_u8;
    pub const PREV_DELTA: u8 = Self::COUNT_U8 - 1_u8;

    #[inline]
    pub const fn vec(self) -> IVec2 {
        VECS[self as usize]
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        // SAFETY: See `const_assert` above
        unsafe { transmute(value & Self::MASK) }
    }

    /// Clockwise quarter turn.
    #[inline]
    pub const fn next(self) -> Self {
        Self::from_u8(self as u8 + 1_u8)
    }

    /// Counter-clockwise quarter turn.
    #[inline]
    pub const fn prev(self) -> Self {
        Self::from_u8(self as u8 + Self::PREV_DELTA)
    }

    #[inline]
    pub const fn rev(self) -> Self {
        Self::from_u8(self as u8 + Self::HALF_COUNT)
    }

    const fn vec_internal(self) -> IVec2 {
        match self {
            Self::North => IVec2::NEG_Y,
            Self::East => IVec2::X,
            Self::South => IVec2::Y,
            Self::West => IVec2::NEG_X,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(value: Direction) -> Self {
        value.vec()
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl TryFrom<IVec2> for Direction {
    type Error = ();

    fn try_from(value: IVec2) -> Result<Self, Self::Error> {
        VECS.iter()
            .position(|vec| *vec == value)
            .map(|index| (index as u8).into())
            .ok_or(())
    }
}

/// A search state for grids where facing matters: a position plus the direction being faced.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PosAndDir {
    pub pos: IVec2,
    pub dir: Direction,
}

impl PosAndDir {
    pub const fn new(pos: IVec2, dir: Direction) -> Self {
        Self { pos, dir }
    }
}

pub fn manhattan_magnitude_2d(pos: IVec2) -> i32 {
    let abs: IVec2 = pos.abs();

    abs.x + abs.y
}

pub fn manhattan_distance_2d(a: IVec2, b: IVec2) -> i32 {
    manhattan_magnitude_2d(a - b)
}

pub fn grid_2d_contains(pos: IVec2, dimensions: IVec2) -> bool {
    (pos.cmpge(IVec2::ZERO) & pos.cmplt(dimensions)).all()
}

pub fn grid_2d_pos_from_index_and_dimensions(index: usize, dimensions: IVec2) -> IVec2 {
    let x: usize = dimensions.x as usize;

    IVec2::new((index % x) as i32, (index / x) as i32)
}

pub fn grid_2d_try_index_from_pos_and_dimensions(pos: IVec2, dimensions: IVec2) -> Option<usize> {
    grid_2d_contains(pos, dimensions)
        .then(|| pos.y as usize * dimensions.x as usize + pos.x as usize)
}

pub struct Grid2D<T> {
    cells: Vec<T>,

    /// Should only contain unsigned values, but is signed for ease of use for iterating
    dimensions: IVec2,
}

impl<T> Grid2D<T> {
    pub fn try_from_cells_and_width(cells: Vec<T>, width: usize) -> Option<Self> {
        let cells_len: usize = cells.len();

        if cells_len % width != 0_usize {
            None
        } else {
            Some(Self {
                cells,
                dimensions: IVec2::new(width as i32, (cells_len / width) as i32),
            })
        }
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn dimensions(&self) -> IVec2 {
        self.dimensions
    }

    #[inline]
    pub fn area(&self) -> usize {
        (self.dimensions.x * self.dimensions.y) as usize
    }

    #[inline]
    pub fn contains(&self, pos: IVec2) -> bool {
        grid_2d_contains(pos, self.dimensions)
    }

    pub fn try_index_from_pos(&self, pos: IVec2) -> Option<usize> {
        grid_2d_try_index_from_pos_and_dimensions(pos, self.dimensions)
    }

    pub fn pos_from_index(&self, index: usize) -> IVec2 {
        grid_2d_pos_from_index_and_dimensions(index, self.dimensions)
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.try_index_from_pos(pos)
            .map(|index: usize| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        self.try_index_from_pos(pos)
            .map(|index: usize| &mut self.cells[index])
    }

    /// The up-to-4 cardinal neighbors of `pos` that lie within the grid bounds. Out-of-bounds
    /// queries yield nothing rather than failing.
    pub fn iter_neighbors(&self, pos: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        Direction::iter()
            .map(move |dir| pos + dir.vec())
            .filter(|&neighbor| self.contains(neighbor))
    }

    pub fn iter_filtered_positions<'a, P: Fn(&T) -> bool + 'a>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = IVec2> + 'a {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| predicate(cell).then(|| self.pos_from_index(index)))
    }

    pub fn iter_positions_with_cell<'a>(&'a self, target: &'a T) -> impl Iterator<Item = IVec2> + 'a
    where
        T: PartialEq,
    {
        self.iter_filtered_positions(|cell| *cell == *target)
    }

    pub fn try_find_single_position_with_cell(&self, target: &T) -> Option<IVec2>
    where
        T: PartialEq,
    {
        self.iter_positions_with_cell(target)
            .try_fold(None, |prev_pos, curr_pos| {
                prev_pos.is_none().then_some(Some(curr_pos))
            })
            .flatten()
    }
}

impl<T: Clone> Clone for Grid2D<T> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            dimensions: self.dimensions,
        }
    }
}

impl<T: Debug> Debug for Grid2D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Grid2D")?;
        let mut y_list: DebugList = f.debug_list();

        for y in 0_i32..self.dimensions.y {
            let start: usize = (y * self.dimensions.x) as usize;

            y_list.entry(&&self.cells[start..(start + self.dimensions.x as usize)]);
        }

        y_list.finish()
    }
}

impl<T: Default> Grid2D<T> {
    pub fn default(dimensions: IVec2) -> Self {
        let capacity: usize = (dimensions.x * dimensions.y) as usize;
        let mut cells: Vec<T> = Vec::with_capacity(capacity);

        cells.resize_with(capacity, T::default);

        Self { cells, dimensions }
    }
}

impl<T: Parse> Parse for Grid2D<T> {
    /// Parses cells one at a time, learning the width from the first line ending. Ragged rows are
    /// a parse failure, not a recoverable condition.
    fn parse(input: &str) -> IResult<&str, Self> {
        let mut width: Option<usize> = None;
        let mut cells: Vec<T> = Vec::new();
        let (input, _) = many1_count(map_res(
            tuple((T::parse, opt(line_ending))),
            |(cell, opt_line_ending)| -> Result<(), ()> {
                cells.push(cell);

                if opt_line_ending.is_some() {
                    match width {
                        Some(width) => {
                            if cells.len() % width != 0_usize {
                                Err(())?;
                            }
                        }
                        None => {
                            width = Some(cells.len());
                        }
                    }
                }

                Ok(())
            },
        ))(input)?;

        // `many1_count` guarantees at least one cell, so the width is never zero.
        let width: usize = width.unwrap_or(cells.len());

        if cells.len() % width != 0_usize {
            Err(Err::Failure(NomError::new(input, NomErrorKind::ManyMN)))
        } else {
            Ok((
                input,
                Grid2D::try_from_cells_and_width(cells, width).unwrap(),
            ))
        }
    }
}

impl<T: PartialEq> PartialEq for Grid2D<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.cells == other.cells
    }
}

/// A marker trait to indicate that a type is a single byte, and any possible value is a valid
/// ASCII byte.
///
/// # Safety
///
/// Only implement this on a type where `size_of::<Self>() == 1_usize` and every value is valid
/// ASCII.
pub unsafe trait IsValidAscii {}

impl<T: IsValidAscii> From<Grid2D<T>> for String {
    fn from(value: Grid2D<T>) -> Self {
        let dimensions: IVec2 = value.dimensions;
        let width: usize = dimensions.x as usize;
        let height: usize = dimensions.y as usize;

        // SAFETY: Guaranteed by `T` implementing `IsValidAscii`
        let bytes: &[u8] = unsafe { transmute(value.cells()) };

        let mut string: String = String::with_capacity((width + 1_usize) * height);

        for y in 0_usize..height {
            let start: usize = y * width;
            let row_str: &str = from_utf8(&bytes[start..start + width]).unwrap_or_else(|e| {
                panic!("A `Grid2D` cell grid contained an invalid UTF-8 slice: {e:?}");
            });

            writeln!(&mut string, "{row_str}").unwrap_or_else(|e| {
                panic!("`String::write_fmt` failed for an in-memory string: {e:?}");
            });
        }

        string
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::define_cell};

    define_cell! {
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        enum Cell {
            #[default]
            Open = b'.',
            Wall = b'#',
        }
    }

    #[test]
    fn test_direction_rotations() {
        for dir in Direction::iter() {
            assert_eq!(dir.next().prev(), dir);
            assert_eq!(dir.rev().rev(), dir);
            assert_eq!(dir.next().vec().perp(), dir.rev().vec());
        }
    }

    #[test]
    fn test_direction_conversions() {
        for dir in Direction::iter() {
            assert_eq!(IVec2::from(dir), dir.vec());
            assert_eq!(Direction::from(dir as u8), dir);
            assert_eq!(Direction::try_from(dir.vec()), Ok(dir));
        }

        assert_eq!(Direction::try_from(IVec2::ZERO), Err(()));
        assert_eq!(Direction::try_from(IVec2::ONE), Err(()));
    }

    #[test]
    fn test_cell_try_from_char() {
        assert_eq!(Cell::try_from('.'), Ok(Cell::Open));
        assert_eq!(Cell::try_from('#'), Ok(Cell::Wall));
        assert_eq!(Cell::try_from('X'), Err(()));

        // U+012E shares its low byte with b'.', and must not alias onto it.
        assert_eq!(Cell::try_from('\u{12E}'), Err(()));
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!(Grid2D::<Cell>::parse("..\n.\n").is_err());
        assert!(Grid2D::<Cell>::parse("...\n....\n").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_cell() {
        // A byte outside the cell alphabet truncates its row, misaligning the cell count.
        assert!(Grid2D::<Cell>::parse("..\n.X\n").is_err());
    }

    #[test]
    fn test_iter_neighbors() {
        let grid: Grid2D<u8> = Grid2D::default(IVec2::new(3_i32, 3_i32));

        assert_eq!(grid.iter_neighbors(IVec2::ZERO).count(), 2_usize);
        assert_eq!(grid.iter_neighbors(IVec2::ONE).count(), 4_usize);
        assert_eq!(grid.iter_neighbors(IVec2::new(1_i32, 0_i32)).count(), 3_usize);

        // Out of bounds yields no entries, not an error.
        assert_eq!(grid.iter_neighbors(IVec2::new(5_i32, 5_i32)).count(), 0_usize);
        assert_eq!(grid.iter_neighbors(IVec2::NEG_ONE * 2_i32).count(), 0_usize);
    }

    #[test]
    fn test_manhattan_distance_2d() {
        assert_eq!(
            manhattan_distance_2d(IVec2::new(-2_i32, 3_i32), IVec2::new(4_i32, -1_i32)),
            10_i32
        );
        assert_eq!(manhattan_distance_2d(IVec2::ONE, IVec2::ONE), 0_i32);
    }
}
