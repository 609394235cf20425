pub mod align;
pub mod interval;
pub mod rate;
