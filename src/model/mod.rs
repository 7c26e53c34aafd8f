mod event;
mod game;
mod league;
mod request;
mod team;

pub use event::*;
pub use game::*;
pub use league::*;
pub use request::*;
pub use team::*;
