/// Squares can't grow past this level. At level 62, the horizon `2^60` and the side length `2^62`
/// both still fit comfortably in a `u64`/`i64`.
pub const MAX_LEVEL: u8 = 62;

/// A `NodeId` is an index into the node arena of a [`World`](crate::world::World).
///
/// The two cells live at fixed indices, every square after them. An id is assigned once, when the
/// node is first inserted, and never reused, so comparing ids is comparing node identity. Ids are
/// only meaningful for the world that handed them out.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const DEAD: NodeId = NodeId(0);
    pub const ALIVE: NodeId = NodeId(1);

    pub fn index(self) -> usize {
        self.0
    }

    /// Check if the id points at one of the two cells.
    pub fn is_cell(self) -> bool {
        self.0 <= Self::ALIVE.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CellState {
    Dead,
    Alive,
}

impl CellState {
    pub fn id(self) -> NodeId {
        match self {
            CellState::Dead => NodeId::DEAD,
            CellState::Alive => NodeId::ALIVE,
        }
    }

    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive { CellState::Alive } else { CellState::Dead }
    }
}

/// The four quadrants of a square.
///
/// ```notrust
///   nw ne
///   sw se
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Quad<T> {
    pub nw: T,
    pub ne: T,
    pub se: T,
    pub sw: T,
}

impl<T> Quad<T> {
    pub fn splat(t: T) -> Self
    where
        T: Clone,
    {
        Self {
            nw: t.clone(),
            ne: t.clone(),
            se: t.clone(),
            sw: t,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Quad<U> {
        Quad {
            nw: f(self.nw),
            ne: f(self.ne),
            se: f(self.se),
            sw: f(self.sw),
        }
    }

    /// Like [`Quad::map`], but stops at the first error.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Quad<U>, E> {
        Ok(Quad {
            nw: f(self.nw)?,
            ne: f(self.ne)?,
            se: f(self.se)?,
            sw: f(self.sw)?,
        })
    }

    pub fn to_array(self) -> [T; 4] {
        [self.nw, self.ne, self.se, self.sw]
    }
}

/// The behaviour of a square, picked once from its level when the square is built.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    /// Level 1: a 2x2 group of cells. Too small to have a future.
    Smallest,

    /// Level 2: a 4x4 group of cells, whose center can be advanced by exactly one generation.
    Seed,

    /// Level 3 and up. Advanced by recursing into overlapping sub-squares.
    RecursivelyComputable,
}

impl Kind {
    /// The kind a square of `level` gets when none is asked for. Cells (level 0) have no kind.
    pub fn for_level(level: u8) -> Option<Kind> {
        match level {
            0 => None,
            1 => Some(Kind::Smallest),
            2 => Some(Kind::Seed),
            _ => Some(Kind::RecursivelyComputable),
        }
    }

    /// Whether a square of this kind can exist at `level`.
    pub fn fits(self, level: u8) -> bool {
        match self {
            Kind::Smallest => level == 1,
            Kind::Seed => level == 2,
            Kind::RecursivelyComputable => level >= 3,
        }
    }
}

/// A square of level `n >= 1`. All four quadrants have level `n - 1`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Square {
    pub level: u8,
    pub quad: Quad<NodeId>,
    pub kind: Kind,
}

impl Square {
    /// How many generations [`World::result`](crate::world::World::result) advances this square
    /// by: `2^(level - 2)`. `None` for squares that have no future.
    pub fn horizon(&self) -> Option<u64> {
        match self.kind {
            Kind::Smallest => None,
            Kind::Seed | Kind::RecursivelyComputable => Some(1 << (self.level - 2)),
        }
    }

    /// Side length in cells
    pub fn side(&self) -> u64 {
        1 << self.level
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Node {
    Cell(CellState),
    Square(Square),
}

impl Node {
    pub fn level(&self) -> u8 {
        match self {
            Node::Cell(_) => 0,
            Node::Square(square) => square.level,
        }
    }

    pub fn square(&self) -> Option<&Square> {
        match self {
            Node::Cell(_) => None,
            Node::Square(square) => Some(square),
        }
    }

    pub fn children(&self) -> Option<Quad<NodeId>> {
        self.square().map(|square| square.quad)
    }
}
