use crate::cell::NodeId;
use crate::cell::Quad;
use crate::error::Result;
use crate::world::World;

/// How far a pass advances each of the sub-squares it's given.
#[derive(Clone, Copy)]
enum Step {
    /// As far as the sub-square can see, its own `result()`
    Full,

    /// `t` generations, `result_at_time(t)`
    At(u64),
}

impl Step {
    fn apply(self, world: &mut World, id: NodeId) -> Result<NodeId> {
        match self {
            Step::Full => world.result(id),
            Step::At(t) => world.result_at_time(id, t),
        }
    }
}

/// Two full passes of `2^(n - 3)` generations each: `2^(n - 2)` in total.
pub(super) fn result(world: &mut World, id: NodeId) -> Result<NodeId> {
    two_pass(world, id, Step::Full, Step::Full)
}

/// Splits `t` over the two passes. The caller guarantees `0 < t < 2^(n - 2)`.
pub(super) fn result_at_time(world: &mut World, id: NodeId, t: u64) -> Result<NodeId> {
    let half = 1 << (world.level(id) - 3);

    if t <= half {
        // Get there in the first pass, the second one only crops
        two_pass(world, id, Step::At(t), Step::At(0))
    } else {
        two_pass(world, id, Step::Full, Step::At(t - half))
    }
}

/// Cuts a level `n` square into nine overlapping level `n - 1` squares, advances them by `first`,
/// regroups the nine results into four level `n - 1` squares and advances those by `second`. The
/// four results are the quadrants of the level `n - 1` answer.
///
///   n00 n01 n02
///   n10 n11 n12
///   n20 n21 n22
///
fn two_pass(world: &mut World, id: NodeId, first: Step, second: Step) -> Result<NodeId> {
    let Quad { nw, ne, se, sw } = world.children(id);

    let n01 = world.h_center(nw, ne);
    let n10 = world.v_center(nw, sw);
    let n11 = world.center(id);
    let n12 = world.v_center(ne, se);
    let n21 = world.h_center(sw, se);

    let nine = [[nw, n01, ne], [n10, n11, n12], [sw, n21, se]];

    let mut r = [[NodeId::DEAD; 3]; 3];
    for (i, row) in nine.iter().enumerate() {
        for (j, &square) in row.iter().enumerate() {
            r[i][j] = first.apply(world, square)?;
        }
    }

    let four = Quad {
        nw: Quad {
            nw: r[0][0],
            ne: r[0][1],
            se: r[1][1],
            sw: r[1][0],
        },
        ne: Quad {
            nw: r[0][1],
            ne: r[0][2],
            se: r[1][2],
            sw: r[1][1],
        },
        se: Quad {
            nw: r[1][1],
            ne: r[1][2],
            se: r[2][2],
            sw: r[2][1],
        },
        sw: Quad {
            nw: r[1][0],
            ne: r[1][1],
            se: r[2][1],
            sw: r[2][0],
        },
    };

    let quad = four.try_map(|quad| {
        let square = world.join(quad);
        second.apply(world, square)
    })?;

    Ok(world.join(quad))
}
