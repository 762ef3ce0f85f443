//! Advancing squares through time.
//!
//! A square of level `n` can tell what its center (the level `n - 1` square in its middle) looks
//! like up to `2^(n - 2)` generations ahead, without looking outside of itself: nothing travels
//! faster than one cell per generation. Seeds (level 2) do it by applying the rules directly,
//! bigger squares by recursing into overlapping sub-squares.

use tracing::trace;

use crate::cell::Kind;
use crate::cell::NodeId;
use crate::cell::Quad;
use crate::error::LifeError;
use crate::error::Result;
use crate::world::World;

mod recursive;
mod seed;

impl World {
    /// The center of square `id`, `2^(level - 2)` generations ahead.
    ///
    /// Results are memoized per square, so the same square is only ever computed once.
    pub fn result(&mut self, id: NodeId) -> Result<NodeId> {
        self.rules()?;
        let square = *self.square(id)?;

        if let Some(res) = self.memoized_result(id) {
            return Ok(res);
        }

        let res = match square.kind {
            Kind::Smallest => return Err(LifeError::TooSmall { level: square.level }),
            Kind::Seed => seed::result(self, id)?,
            Kind::RecursivelyComputable => recursive::result(self, id)?,
        };

        trace!(level = square.level, ?id, ?res, "Computed result");
        self.memoize_result(id, res);

        Ok(res)
    }

    /// The center of square `id`, `t` generations ahead.
    ///
    /// `t` can't be more than the square's horizon, `2^(level - 2)`. At `t = 0` this is the
    /// square's center as it is now, and at the horizon this is [`World::result`].
    pub fn result_at_time(&mut self, id: NodeId, t: u64) -> Result<NodeId> {
        self.rules()?;
        let square = *self.square(id)?;

        let Some(horizon) = square.horizon() else {
            return Err(LifeError::TooSmall { level: square.level });
        };

        if t > horizon {
            return Err(LifeError::HorizonExceeded {
                level: square.level,
                t,
                horizon,
            });
        }

        if t == 0 {
            return Ok(self.center(id));
        }

        if t == horizon {
            return self.result(id);
        }

        if let Some(res) = self.memoized_result_at(id, t) {
            return Ok(res);
        }

        // Seeds have a horizon of 1, so only recursive squares make it here
        let res = recursive::result_at_time(self, id, t)?;

        trace!(level = square.level, ?id, t, ?res, "Computed result at time");
        self.memoize_result_at(id, t, res);

        Ok(res)
    }

    /// Given a square, returns the square of the level below at its center
    ///
    /// ```notrust
    ///   . . . .
    ///   . x x .
    ///   . x x .
    ///   . . . .
    /// ```
    pub(crate) fn center(&mut self, id: NodeId) -> NodeId {
        let Quad { nw, ne, se, sw } = self.children(id);

        let quad = Quad {
            nw: self.children(nw).se,
            ne: self.children(ne).sw,
            se: self.children(se).nw,
            sw: self.children(sw).ne,
        };

        self.join(quad)
    }

    /// Given two squares with `w` to the left and `e` to the right, this returns the square of the
    /// same level centered on their boundary
    fn h_center(&mut self, w: NodeId, e: NodeId) -> NodeId {
        let (w, e) = (self.children(w), self.children(e));

        self.join(Quad {
            nw: w.ne,
            ne: e.nw,
            se: e.sw,
            sw: w.se,
        })
    }

    /// Given two squares with `n` above and `s` below, this returns the square of the same level
    /// centered on their boundary
    fn v_center(&mut self, n: NodeId, s: NodeId) -> NodeId {
        let (n, s) = (self.children(n), self.children(s));

        self.join(Quad {
            nw: n.sw,
            ne: n.se,
            se: s.ne,
            sw: s.nw,
        })
    }
}
