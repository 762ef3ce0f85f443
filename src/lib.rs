//! HashLife for life-like cellular automata.
//!
//! Everything goes through a [`World`]: it builds canonical squares, holds the rules, and
//! remembers results.
//!
//! ```
//! use hashlife::rule_set::B3S23;
//! use hashlife::world::World;
//!
//! let mut world = World::with_rules(B3S23);
//! let blinker = world.from_rows(&["....", "OOO.", "....", "...."])?;
//!
//! let future = world.future_at_time(blinker, 2)?;
//! let future = world.crop_to(future, 2)?;
//! assert_eq!(future, blinker);
//! # Ok::<(), hashlife::error::LifeError>(())
//! ```

pub mod cell;
pub mod error;
pub mod rule_set;
pub mod world;

mod future;
mod grid;
mod hashlife;

pub use cell::CellState;
pub use cell::Kind;
pub use cell::NodeId;
pub use cell::Quad;
pub use error::LifeError;
pub use rule_set::RuleSet;
pub use world::World;
