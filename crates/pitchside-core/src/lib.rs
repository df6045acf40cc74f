// Library root: the catalog read models and the squad construction engine.

pub mod catalog;
pub mod error;
pub mod market;
pub mod squad;

pub use catalog::player::{Player, Position};
pub use catalog::Catalog;
pub use error::{Rejection, SquadError};
pub use squad::model::{Formation, Phase, Squad, SquadEntry};

#[cfg(test)]
pub(crate) mod fixtures;
