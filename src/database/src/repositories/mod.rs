mod exercises;
mod favorites;
mod matches;
mod roster;
mod users;

pub use exercises::*;
pub use favorites::*;
pub use matches::*;
pub use roster::*;
pub use users::*;
