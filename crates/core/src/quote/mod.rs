//! Quote position construction
//!
//! Turns a project's rooms and measurements into the ordered list of quote
//! line items the submitter delivers: one text header per populated room,
//! followed by one priced position per measurement, grouped by category.

pub mod builder;
pub mod taxes;
pub mod text;
pub mod units;
