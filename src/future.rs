use tracing::debug;
use tracing::debug_span;

use crate::cell::MAX_LEVEL;
use crate::cell::NodeId;
use crate::cell::Quad;
use crate::error::LifeError;
use crate::error::Result;
use crate::world::World;

impl World {
    /// The all dead square of `level`. Every empty square of a level is the same square.
    pub fn empty(&mut self, level: u8) -> Result<NodeId> {
        if level > MAX_LEVEL {
            return Err(LifeError::LevelOverflow {
                level: level as u32,
            });
        }

        Ok(self.empty_at(level))
    }

    /// The all dead square of the same level as `id`.
    pub fn empty_copy(&mut self, id: NodeId) -> NodeId {
        let level = self.level(id);

        self.empty_at(level)
    }

    pub(crate) fn empty_at(&mut self, level: u8) -> NodeId {
        let mut id = NodeId::DEAD;
        for _ in 0..level {
            id = self.join(Quad::splat(id));
        }

        id
    }

    /// Surrounds square `id` with `n` layers of dead cells, each layer doubling the side length.
    /// The original square ends up at the center of the returned one.
    ///
    /// ```notrust
    ///   . . . .
    ///   . a b .
    ///   . d c .
    ///   . . . .
    /// ```
    pub fn pad_by(&mut self, id: NodeId, n: u32) -> Result<NodeId> {
        let level = self.level(id);
        if level == 0 {
            return Err(LifeError::TooSmall { level });
        }

        if level as u32 + n > MAX_LEVEL as u32 {
            return Err(LifeError::LevelOverflow {
                level: level as u32 + n,
            });
        }

        let mut id = id;
        for _ in 0..n {
            let Quad { nw, ne, se, sw } = self.children(id);
            let e = self.empty_copy(nw);

            let quad = Quad {
                nw: self.join(Quad {
                    nw: e,
                    ne: e,
                    se: nw,
                    sw: e,
                }),
                ne: self.join(Quad {
                    nw: e,
                    ne: e,
                    se: e,
                    sw: ne,
                }),
                se: self.join(Quad {
                    nw: se,
                    ne: e,
                    se: e,
                    sw: e,
                }),
                sw: self.join(Quad {
                    nw: e,
                    ne: sw,
                    se: e,
                    sw: e,
                }),
            };

            id = self.join(quad);
        }

        Ok(id)
    }

    /// What square `id` looks like `t` generations from now, in an otherwise empty, unbounded
    /// universe.
    ///
    /// The square is grown first so no live cell can reach its border in `t` generations. The
    /// returned square is bigger than `id`, with the region `id` covered at its center (see
    /// [`World::crop_to`]).
    pub fn future_at_time(&mut self, id: NodeId, t: i64) -> Result<NodeId> {
        let _span = debug_span!("future_at_time", ?id, t).entered();

        if t < 0 {
            return Err(LifeError::NoTimeMachine { t });
        }

        if t == 0 {
            return Ok(id);
        }

        let level = self.level(id);
        if level == 0 {
            return Err(LifeError::TooSmall { level });
        }

        // Smallest container with room for `t` cells of growth on each side
        let size = (1u128 << level) + 2 * t as u128;
        let new_level = u128::BITS - (size - 1).leading_zeros();

        // One more level on top, since a square only sees as far as its center
        let pad = new_level - level as u32 + 1;
        debug!(level, new_level, pad, "Growing");

        let base = self.pad_by(id, pad)?;
        let res = self.result_at_time(base, t as u64)?;

        debug!(size = self.size(), memo = self.memo_size(), "Done");

        Ok(res)
    }
}
