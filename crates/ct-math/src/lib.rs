//! ctree math utilities.

pub mod math;

pub use math::stable::*;
pub use math::entropy::*;
pub use math::multinomial;
pub use math::normalize::*;
