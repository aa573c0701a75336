//! API request handlers

mod billing;
mod campaigns;
mod health;
mod verify;

pub use billing::*;
pub use campaigns::*;
pub use health::*;
pub use verify::*;
