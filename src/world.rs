use std::collections::HashMap;

use tracing::debug;
use tracing::trace;

use crate::cell::CellState;
use crate::cell::Kind;
use crate::cell::MAX_LEVEL;
use crate::cell::Node;
use crate::cell::NodeId;
use crate::cell::Quad;
use crate::cell::Square;
use crate::error::LifeError;
use crate::error::Result;
use crate::rule_set::RuleSet;

/// The registry every node is built through.
///
/// A `World` owns all of the nodes it hands out, and guarantees that asking for the same four
/// quadrants twice yields the same [`NodeId`]. Since identical squares share an id, the results of
/// a square can be memoized on its id, which is what makes HashLife fast.
///
/// Nothing is global: independent worlds don't share nodes, rules or results.
pub struct World {
    /// Life rules. `None` until [`World::configure`] is called.
    rules: Option<RuleSet>,

    /// This is where all of our memory goes. A [`NodeId`] indexes into it. The dead and alive
    /// cells sit at the front.
    buf: Vec<Node>,

    /// Canonical squares, keyed on their quadrants. Bucket `i` holds the squares of level `i`, so
    /// bucket `0` is always empty.
    buckets: Vec<HashMap<Quad<NodeId>, NodeId>>,

    /// Memoized `result()` of a square
    results: HashMap<NodeId, NodeId>,

    /// Memoized `result_at_time(t)` of a square, for `0 < t < horizon`
    results_at: HashMap<(NodeId, u64), NodeId>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world with no rules installed.
    pub fn new() -> Self {
        let buf = vec![Node::Cell(CellState::Dead), Node::Cell(CellState::Alive)];

        Self {
            rules: None,
            buf,
            buckets: Vec::new(),
            results: HashMap::new(),
            results_at: HashMap::new(),
        }
    }

    /// Create an empty world running `rules`.
    pub fn with_rules(rules: RuleSet) -> Self {
        let mut world = Self::new();
        world.configure(rules);

        world
    }

    /// Install the rules results are computed with.
    ///
    /// Memoized results were computed under the previous rules, so installing different rules
    /// drops them. Squares themselves don't depend on the rules and stay canonical.
    pub fn configure(&mut self, rules: RuleSet) {
        if self.rules.is_some_and(|installed| installed != rules) {
            debug!(from = %self.rules.unwrap_or_default(), to = %rules, "Rules changed, dropping results");
            self.forget_results();
        }

        self.rules = Some(rules);
    }

    /// The installed rules
    pub fn rules(&self) -> Result<RuleSet> {
        self.rules.ok_or(LifeError::Unconfigured)
    }

    /// Get the canonical square made of `quad`, building it if this is the first time it's asked
    /// for. The kind of square is picked from its level.
    ///
    /// All four quadrants must have the same level, below [`MAX_LEVEL`].
    pub fn square_for(&mut self, quad: Quad<NodeId>) -> Result<NodeId> {
        let level = self.check_levels(quad)?;

        Ok(self.join_at(quad, level))
    }

    /// Like [`World::square_for`], but with an explicit kind, which has to fit the level.
    ///
    /// If the square already exists, the existing square is returned as is.
    pub fn square_for_kind(&mut self, quad: Quad<NodeId>, kind: Kind) -> Result<NodeId> {
        let level = self.check_levels(quad)?;
        if !kind.fits(level) {
            return Err(LifeError::InvalidKind { kind, level });
        }

        if let Some(id) = self.find(quad) {
            return Ok(id);
        }

        Ok(self.insert(Square { level, quad, kind }))
    }

    /// Unchecked [`World::square_for`], for callers that already know the quadrants share a
    /// level.
    pub(crate) fn join(&mut self, quad: Quad<NodeId>) -> NodeId {
        let level = self.level(quad.nw) + 1;
        debug_assert!(self.check_levels(quad).is_ok(), "mixed quadrant levels");

        self.join_at(quad, level)
    }

    fn join_at(&mut self, quad: Quad<NodeId>, level: u8) -> NodeId {
        if let Some(id) = self.find(quad) {
            return id;
        }

        // `for_level` only returns `None` for cells, and `level` is at least 1 here
        let kind = Kind::for_level(level).unwrap_or(Kind::Smallest);

        self.insert(Square { level, quad, kind })
    }

    /// Level of the square made of `quad`
    fn check_levels(&self, quad: Quad<NodeId>) -> Result<u8> {
        let levels = quad.map(|id| self.level(id)).to_array();

        if levels.iter().any(|&l| l != levels[0]) {
            return Err(LifeError::MixedLevels { levels });
        }

        if levels[0] >= MAX_LEVEL {
            return Err(LifeError::LevelOverflow {
                level: levels[0] as u32 + 1,
            });
        }

        Ok(levels[0] + 1)
    }

    /// Look up the canonical square made of `quad`, without building it.
    pub fn find(&self, quad: Quad<NodeId>) -> Option<NodeId> {
        let level = self.level(quad.nw) as usize + 1;

        self.buckets.get(level)?.get(&quad).copied()
    }

    /// Insert `square` into the world and make it the canonical square for its quadrants,
    /// replacing any previous one.
    ///
    /// The square is checked the same way [`World::square_for_kind`] checks its arguments, and its
    /// level has to be one more than its quadrants'.
    pub fn add(&mut self, square: Square) -> Result<NodeId> {
        let level = self.check_levels(square.quad)?;
        if square.level != level {
            return Err(LifeError::WrongLevel {
                level: square.level,
                expected: level,
            });
        }

        if !square.kind.fits(level) {
            return Err(LifeError::InvalidKind {
                kind: square.kind,
                level,
            });
        }

        Ok(self.insert(square))
    }

    fn insert(&mut self, square: Square) -> NodeId {
        let id = NodeId(self.buf.len());
        self.buf.push(Node::Square(square));

        let level = square.level as usize;
        if self.buckets.len() <= level {
            self.buckets.resize_with(level + 1, HashMap::new);
        }

        self.buckets[level].insert(square.quad, id);

        id
    }

    /// Drop every canonical square and every memoized result.
    ///
    /// Ids handed out before stay valid, but building the same square again yields a new id.
    pub fn clear(&mut self) {
        trace!(size = self.size(), "Clearing the canonical table");

        self.buckets.clear();
        self.forget_results();
    }

    /// Drop memoized results, keeping squares canonical.
    pub fn forget_results(&mut self) {
        self.results.clear();
        self.results_at.clear();
    }

    /// Number of canonical squares
    pub fn size(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    /// Number of nodes ever built, including the two cells and squares dropped by
    /// [`World::clear`].
    pub fn arena_len(&self) -> usize {
        self.buf.len()
    }

    /// Number of memoized results
    pub fn memo_size(&self) -> usize {
        self.results.len() + self.results_at.len()
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// If `id` was handed out by another world. The accessors below all go through this one and
    /// panic the same way. See [`World::try_node`] for ids of unknown origin.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.buf[id.0]
    }

    /// The node behind `id`, `None` if this world never built it.
    pub fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.buf.get(id.0)
    }

    pub fn level(&self, id: NodeId) -> u8 {
        self.node(id).level()
    }

    /// The quadrants of a square, `None` for a cell.
    pub fn quad(&self, id: NodeId) -> Option<Quad<NodeId>> {
        self.node(id).children()
    }

    /// The kind of a square, `None` for a cell.
    pub fn kind(&self, id: NodeId) -> Option<Kind> {
        self.node(id).square().map(|square| square.kind)
    }

    /// The state of a cell, `None` for a square.
    pub fn state(&self, id: NodeId) -> Option<CellState> {
        match self.node(id) {
            Node::Cell(state) => Some(*state),
            Node::Square(_) => None,
        }
    }

    /// Quadrants of a node the caller knows to be a square.
    pub(crate) fn children(&self, id: NodeId) -> Quad<NodeId> {
        match self.node(id) {
            Node::Square(square) => square.quad,
            Node::Cell(_) => unreachable!("cells have no quadrants"),
        }
    }

    pub(crate) fn square(&self, id: NodeId) -> Result<&Square> {
        match self.node(id) {
            Node::Square(square) => Ok(square),
            Node::Cell(_) => Err(LifeError::TooSmall { level: 0 }),
        }
    }

    pub(crate) fn memoized_result(&self, id: NodeId) -> Option<NodeId> {
        self.results.get(&id).copied()
    }

    pub(crate) fn memoize_result(&mut self, id: NodeId, res: NodeId) {
        self.results.insert(id, res);
    }

    pub(crate) fn memoized_result_at(&self, id: NodeId, t: u64) -> Option<NodeId> {
        self.results_at.get(&(id, t)).copied()
    }

    pub(crate) fn memoize_result_at(&mut self, id: NodeId, t: u64, res: NodeId) {
        self.results_at.insert((id, t), res);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::cell::NodeId as Id;

    fn quad(nw: Id, ne: Id, se: Id, sw: Id) -> Quad<Id> {
        Quad { nw, ne, se, sw }
    }

    #[test]
    fn same_quadrants_same_square() {
        let mut world = World::new();

        let a = world
            .square_for(quad(Id::ALIVE, Id::DEAD, Id::DEAD, Id::ALIVE))
            .unwrap();
        let size = world.size();
        let b = world
            .square_for(quad(Id::ALIVE, Id::DEAD, Id::DEAD, Id::ALIVE))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(world.size(), size);
        assert_eq!(world.kind(a), Some(Kind::Smallest));
        assert_eq!(world.level(a), 1);
    }

    #[test]
    fn different_quadrants_different_squares() {
        let mut world = World::new();

        let a = world
            .square_for(quad(Id::ALIVE, Id::DEAD, Id::DEAD, Id::DEAD))
            .unwrap();
        let b = world
            .square_for(quad(Id::DEAD, Id::ALIVE, Id::DEAD, Id::DEAD))
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(world.size(), 2);
    }

    #[test]
    fn kinds_by_level() {
        let mut world = World::new();

        let l1 = world.square_for(Quad::splat(Id::DEAD)).unwrap();
        let l2 = world.square_for(Quad::splat(l1)).unwrap();
        let l3 = world.square_for(Quad::splat(l2)).unwrap();

        assert_eq!(world.kind(l1), Some(Kind::Smallest));
        assert_eq!(world.kind(l2), Some(Kind::Seed));
        assert_eq!(world.kind(l3), Some(Kind::RecursivelyComputable));
        assert_eq!(world.kind(Id::ALIVE), None);
        assert_eq!(world.state(Id::ALIVE), Some(CellState::Alive));
        assert_eq!(world.state(l3), None);
    }

    #[test]
    fn mixed_levels_rejected() {
        let mut world = World::new();

        let l1 = world.square_for(Quad::splat(Id::DEAD)).unwrap();
        let err = world
            .square_for(quad(l1, Id::DEAD, Id::DEAD, Id::DEAD))
            .unwrap_err();

        assert_eq!(
            err,
            LifeError::MixedLevels {
                levels: [1, 0, 0, 0]
            }
        );
    }

    #[test]
    fn explicit_kind() {
        let mut world = World::new();

        let l1 = world
            .square_for_kind(Quad::splat(Id::ALIVE), Kind::Smallest)
            .unwrap();
        assert_eq!(world.square_for(Quad::splat(Id::ALIVE)).unwrap(), l1);

        let err = world
            .square_for_kind(Quad::splat(l1), Kind::RecursivelyComputable)
            .unwrap_err();
        assert_eq!(
            err,
            LifeError::InvalidKind {
                kind: Kind::RecursivelyComputable,
                level: 2
            }
        );
    }

    #[test]
    fn find_does_not_insert() {
        let mut world = World::new();

        assert_eq!(world.find(Quad::splat(Id::ALIVE)), None);
        assert_eq!(world.size(), 0);

        let id = world.square_for(Quad::splat(Id::ALIVE)).unwrap();
        assert_eq!(world.find(Quad::splat(Id::ALIVE)), Some(id));
    }

    #[test]
    fn clear_forgets_squares() {
        let mut world = World::new();

        let a = world.square_for(Quad::splat(Id::ALIVE)).unwrap();
        world.clear();
        assert_eq!(world.size(), 0);

        // The old id still points at a valid square
        assert_eq!(world.quad(a), Some(Quad::splat(Id::ALIVE)));

        let b = world.square_for(Quad::splat(Id::ALIVE)).unwrap();
        assert_ne!(a, b);
        assert_eq!(world.node(a), world.node(b));
    }

    #[test]
    fn level_cap() {
        let mut world = World::new();

        let mut top = Id::DEAD;
        for _ in 0..MAX_LEVEL {
            top = world.square_for(Quad::splat(top)).unwrap();
        }
        assert_eq!(world.level(top), MAX_LEVEL);

        let size = world.size();
        assert_eq!(
            world.square_for(Quad::splat(top)),
            Err(LifeError::LevelOverflow { level: 63 })
        );
        assert_eq!(
            world.square_for_kind(Quad::splat(top), Kind::RecursivelyComputable),
            Err(LifeError::LevelOverflow { level: 63 })
        );
        assert_eq!(world.size(), size);
    }

    #[test]
    fn add_checks_squares() {
        let mut world = World::new();
        let len = world.arena_len();

        // Cells make a level 1 square, not a seed
        let err = world
            .add(Square {
                level: 2,
                quad: Quad::splat(Id::DEAD),
                kind: Kind::Seed,
            })
            .unwrap_err();
        assert_eq!(
            err,
            LifeError::WrongLevel {
                level: 2,
                expected: 1
            }
        );

        let err = world
            .add(Square {
                level: 1,
                quad: Quad::splat(Id::DEAD),
                kind: Kind::Seed,
            })
            .unwrap_err();
        assert_eq!(
            err,
            LifeError::InvalidKind {
                kind: Kind::Seed,
                level: 1
            }
        );

        let l1 = world.square_for(Quad::splat(Id::DEAD)).unwrap();
        let err = world
            .add(Square {
                level: 2,
                quad: quad(l1, l1, l1, Id::DEAD),
                kind: Kind::Seed,
            })
            .unwrap_err();
        assert_eq!(
            err,
            LifeError::MixedLevels {
                levels: [1, 1, 1, 0]
            }
        );

        // Only the square built through `square_for` made it in
        assert_eq!(world.arena_len(), len + 1);
    }

    #[test]
    fn add_replaces_canonical_square() {
        let mut world = World::new();

        let a = world.square_for(Quad::splat(Id::ALIVE)).unwrap();
        let b = world
            .add(Square {
                level: 1,
                quad: Quad::splat(Id::ALIVE),
                kind: Kind::Smallest,
            })
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(world.find(Quad::splat(Id::ALIVE)), Some(b));
        assert_eq!(world.size(), 1);
    }

    #[test]
    fn foreign_ids() {
        let mut other = World::new();
        let mut top = Id::DEAD;
        for _ in 0..4 {
            top = other.square_for(Quad::splat(top)).unwrap();
        }

        let world = World::new();
        assert_eq!(world.try_node(top), None);
        assert_eq!(world.try_node(Id::ALIVE), Some(&Node::Cell(CellState::Alive)));
        assert_eq!(other.try_node(top), Some(other.node(top)));
    }

    #[test]
    fn unconfigured() {
        let world = World::new();
        assert_eq!(world.rules(), Err(LifeError::Unconfigured));

        let world = World::with_rules(RuleSet::default());
        assert_eq!(world.rules(), Ok(RuleSet::default()));
    }
}
