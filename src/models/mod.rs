pub mod attribute;
pub mod estimate;
pub mod floor;

pub use attribute::*;
pub use estimate::*;
pub use floor::*;
