//! Pure, synchronous transformations over booking rows already fetched from
//! the store: customer aggregation, package-subtype classification, and the
//! stats reductions the dashboard pages consume. No I/O happens here; calls
//! are stateless and safe to issue concurrently.

pub mod classifier;
pub mod commissions;
pub mod customers;
pub mod payments;
