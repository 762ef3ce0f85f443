#![allow(dead_code)]

use std::collections::HashSet;

use hashlife::CellState;
use hashlife::NodeId;
use hashlife::RuleSet;
use hashlife::World;
use tracing_subscriber::EnvFilter;

/// Send library logs to the test output. Use `RUST_LOG=hashlife=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub type Cells = HashSet<(i64, i64)>;

/// One generation of `cells` in an unbounded universe, the slow way.
pub fn step(cells: &Cells, rules: RuleSet) -> Cells {
    let mut candidates = Cells::new();
    for &(x, y) in cells {
        for dy in -1..=1 {
            for dx in -1..=1 {
                candidates.insert((x + dx, y + dy));
            }
        }
    }

    candidates
        .into_iter()
        .filter(|&(x, y)| {
            let mut neighbours = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if (dx, dy) != (0, 0) && cells.contains(&(x + dx, y + dy)) {
                        neighbours += 1;
                    }
                }
            }

            let state = CellState::from(cells.contains(&(x, y)));
            rules.transition(state, neighbours).is_alive()
        })
        .collect()
}

pub fn steps(cells: &Cells, rules: RuleSet, t: u64) -> Cells {
    let mut cells = cells.clone();
    for _ in 0..t {
        cells = step(&cells, rules);
    }

    cells
}

/// Live cells of `id`, shifted so `(0, 0)` is the top left corner of the level `level` square at
/// its center.
pub fn centered_cells(world: &World, id: NodeId, level: u8) -> Cells {
    let offset = ((1i64 << world.level(id)) - (1i64 << level)) / 2;

    world
        .live_cells(id)
        .into_iter()
        .map(|(x, y)| (x as i64 - offset, y as i64 - offset))
        .collect()
}

pub fn to_cells(cells: &[(u64, u64)]) -> Cells {
    cells.iter().map(|&(x, y)| (x as i64, y as i64)).collect()
}
