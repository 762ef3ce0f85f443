use crate::cell::CellState;
use crate::cell::NodeId;
use crate::cell::Quad;
use crate::error::Result;
use crate::world::World;

/// For a seed, computes the next generation of its 2x2 center by applying the rules to each of the
/// four center cells.
///
///   c00 c01 c02 c03
///   c10 c11 c12 c13
///   c20 c21 c22 c23
///   c30 c31 c32 c33
///
pub(super) fn result(world: &mut World, id: NodeId) -> Result<NodeId> {
    let rules = world.rules()?;

    let Quad { nw, ne, se, sw } = world.children(id);
    let [nw, ne, se, sw] = [nw, ne, se, sw].map(|id| world.children(id));

    let cells = [
        [nw.nw, nw.ne, ne.nw, ne.ne],
        [nw.sw, nw.se, ne.sw, ne.se],
        [sw.nw, sw.ne, se.nw, se.ne],
        [sw.sw, sw.se, se.sw, se.se],
    ]
    .map(|row| row.map(|id| id == NodeId::ALIVE));

    let next = |row: usize, col: usize| -> NodeId {
        let mut neighbours = 0;

        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if (r, c) != (row, col) && cells[r][c] {
                    neighbours += 1;
                }
            }
        }

        let state = CellState::from(cells[row][col]);

        rules.transition(state, neighbours).id()
    };

    let quad = Quad {
        nw: next(1, 1),
        ne: next(1, 2),
        se: next(2, 2),
        sw: next(2, 1),
    };

    Ok(world.join(quad))
}
