//! Window-bounded revenue recognition and supply cost allocation.
//!
//! The pipeline runs leaf-first: [`interval`] clamps each contract to
//! the reporting window, [`proration`] turns monthly values into
//! window-bounded revenue, [`dedup`] collapses multiply-matched supply
//! invoices per client, [`costs`] distributes the client's cost
//! pro-rata by revenue share, and [`aggregate`] rolls everything up
//! into ordered client aggregates and portfolio totals.

pub mod aggregate;
pub mod costs;
pub mod dedup;
pub mod interval;
pub mod proration;
