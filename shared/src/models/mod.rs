//! Domain models for the lobster stock inventory

mod crate_item;
mod dispatch;
mod loose_stock;
mod loss;
mod offload;
mod receiving;
mod tank;

pub use crate_item::*;
pub use dispatch::*;
pub use loose_stock::*;
pub use loss::*;
pub use offload::*;
pub use receiving::*;
pub use tank::*;
