//!
//! memecraft  -- Captioned memes on demand
//!

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
#[macro_use] extern crate maplit;

#[cfg(test)] #[macro_use] extern crate spectral;


pub mod ai;
mod caption;
pub mod catalog;
mod model;
pub mod render;
mod resources;
mod util;


pub use caption::*;
pub use model::*;
pub use resources::*;
pub use util::cache::*;
