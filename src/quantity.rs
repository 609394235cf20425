#[macro_use]
pub mod macros;

pub mod energy;
pub mod power;
pub mod time;
mod zero;

pub use self::zero::Zero;
