//! Core math modules.

pub mod stable;
pub mod entropy;
pub mod multinomial;
pub mod normalize;
