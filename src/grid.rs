//! Reading and writing cells by coordinates.
//!
//! Coordinates are `(x, y)` from the top left corner of a square, with `x` growing to the right
//! and `y` growing downwards.

use std::collections::HashMap;

use crate::cell::CellState;
use crate::cell::MAX_LEVEL;
use crate::cell::NodeId;
use crate::cell::Quad;
use crate::error::LifeError;
use crate::error::Result;
use crate::world::World;

impl World {
    /// Build a square of `level` where exactly `cells` are alive.
    pub fn from_cells<I>(&mut self, level: u8, cells: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        if level > MAX_LEVEL {
            return Err(LifeError::LevelOverflow {
                level: level as u32,
            });
        }

        let side = 1u64 << level;
        let cells: Vec<_> = cells.into_iter().collect();

        if let Some(&(x, y)) = cells.iter().find(|&&(x, y)| x >= side || y >= side) {
            return Err(LifeError::InvalidPattern {
                reason: format!("({x}, {y}) is outside of a {side}x{side} square"),
            });
        }

        Ok(self.build(level, &cells))
    }

    fn build(&mut self, level: u8, cells: &[(u64, u64)]) -> NodeId {
        if cells.is_empty() {
            return self.empty_at(level);
        }

        if level == 0 {
            return NodeId::ALIVE;
        }

        let half = 1 << (level - 1);
        let mut parts: Quad<Vec<(u64, u64)>> = Quad::splat(Vec::new());

        for &(x, y) in cells {
            match (x >= half, y >= half) {
                (false, false) => parts.nw.push((x, y)),
                (true, false) => parts.ne.push((x - half, y)),
                (true, true) => parts.se.push((x - half, y - half)),
                (false, true) => parts.sw.push((x, y - half)),
            }
        }

        let quad = parts.map(|part| self.build(level - 1, &part));

        self.join(quad)
    }

    /// Build the smallest square (of level 1 or more) holding `rows`, placed at its top left.
    ///
    /// `O`, `o` and `*` are alive cells, `.` and `b` dead ones. All rows must be as long.
    pub fn from_rows<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<NodeId> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());

        if height == 0 || width == 0 {
            return Err(LifeError::InvalidPattern {
                reason: "empty pattern".into(),
            });
        }

        let mut cells = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();

            if row.chars().count() != width {
                return Err(LifeError::InvalidPattern {
                    reason: format!("row {y} is not {width} cells wide"),
                });
            }

            for (x, c) in row.chars().enumerate() {
                match c {
                    '.' | 'b' => {}
                    'O' | 'o' | '*' => cells.push((x as u64, y as u64)),
                    c => {
                        return Err(LifeError::InvalidPattern {
                            reason: format!("unexpected '{c}' at row {y}, column {x}"),
                        });
                    }
                }
            }
        }

        let side = width.max(height) as u64;
        let level = side.next_power_of_two().trailing_zeros().max(1);
        let level = u8::try_from(level).map_err(|_| LifeError::LevelOverflow { level })?;

        self.from_cells(level, cells)
    }

    /// The state of cell `(x, y)` of square `id`, `None` if it's out of bounds.
    pub fn get(&self, id: NodeId, x: u64, y: u64) -> Option<CellState> {
        let level = self.level(id);
        if x >> level != 0 || y >> level != 0 {
            return None;
        }

        let (mut id, mut x, mut y) = (id, x, y);

        for level in (1..=level).rev() {
            let half = 1 << (level - 1);
            let quad = self.children(id);

            id = match (x >= half, y >= half) {
                (false, false) => quad.nw,
                (true, false) => quad.ne,
                (true, true) => quad.se,
                (false, true) => quad.sw,
            };

            x &= half - 1;
            y &= half - 1;
        }

        self.state(id)
    }

    /// Number of live cells in square `id`
    pub fn population(&self, id: NodeId) -> u64 {
        self.population_with(id, &mut HashMap::new())
    }

    fn population_with(&self, id: NodeId, memo: &mut HashMap<NodeId, u64>) -> u64 {
        if id.is_cell() {
            return u64::from(id == NodeId::ALIVE);
        }

        if let Some(&n) = memo.get(&id) {
            return n;
        }

        let n: u64 = self
            .children(id)
            .to_array()
            .into_iter()
            .map(|child| self.population_with(child, memo))
            .sum();

        memo.insert(id, n);

        n
    }

    /// Coordinates of every live cell of square `id`, row by row.
    pub fn live_cells(&self, id: NodeId) -> Vec<(u64, u64)> {
        let mut memo = HashMap::new();
        let mut cells = Vec::new();

        self.collect_cells(id, 0, 0, &mut memo, &mut cells);
        cells.sort_unstable_by_key(|&(x, y)| (y, x));

        cells
    }

    fn collect_cells(
        &self,
        id: NodeId,
        dx: u64,
        dy: u64,
        memo: &mut HashMap<NodeId, u64>,
        cells: &mut Vec<(u64, u64)>,
    ) {
        if self.population_with(id, memo) == 0 {
            return;
        }

        if id == NodeId::ALIVE {
            cells.push((dx, dy));
            return;
        }

        let half = 1 << (self.level(id) - 1);
        let quad = self.children(id);

        self.collect_cells(quad.nw, dx, dy, memo, cells);
        self.collect_cells(quad.ne, dx + half, dy, memo, cells);
        self.collect_cells(quad.se, dx + half, dy + half, memo, cells);
        self.collect_cells(quad.sw, dx, dy + half, memo, cells);
    }

    /// Repeatedly takes the center of square `id` until it's down to `level`. Undoes
    /// [`World::pad_by`].
    pub fn crop_to(&mut self, id: NodeId, level: u8) -> Result<NodeId> {
        let from = self.level(id);
        if level == 0 || level > from {
            return Err(LifeError::InvalidCrop { from, to: level });
        }

        let mut id = id;
        while self.level(id) > level {
            id = self.center(id);
        }

        Ok(id)
    }

    /// Render square `id` as rows of `O` (alive) and `.` (dead).
    ///
    /// Meant for small squares: a level `n` square renders to `4^n` characters.
    pub fn to_rows(&self, id: NodeId) -> Vec<String> {
        let side = 1usize << self.level(id);
        let mut rows = vec![vec!['.'; side]; side];

        for (x, y) in self.live_cells(id) {
            rows[y as usize][x as usize] = 'O';
        }

        rows.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}
