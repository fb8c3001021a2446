// Survey entities - the three reference tables as loaded from disk
//
// Each entity:
// - Maps its CSV columns through serde (survey column names kept verbatim)
// - Is immutable once loaded
// - Validates its own values at the loading boundary

pub mod household;
pub mod expense;
pub mod product;

pub use household::{Household, Locale};
pub use expense::Expense;
pub use product::Product;
