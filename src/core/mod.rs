pub mod annotate;
pub mod backup;
pub mod config;
pub mod log;
pub mod next_dose;
pub mod reconcile;
pub mod tracker;
