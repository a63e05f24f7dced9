#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate strum_macros;

pub mod error;
pub mod settings;
pub mod utils;
