pub mod payment;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(all(feature = "schedule", feature = "closing_costs"))]
pub mod analysis;
