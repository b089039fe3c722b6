mod helpers;
mod money;

pub mod op;

pub use helpers::compute_total;
pub use money::{Money, MoneyConversionError};
