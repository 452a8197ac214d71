//! Query construction.
//!
//! - **filter**: search filters from request parameters
//! - **update**: sparse field sets for partial updates

mod filter;
mod update;

pub use filter::*;
pub use update::*;
