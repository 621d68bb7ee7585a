//! Register synchronisation: address layout, per-device items and the
//! orchestrator that drives them every cycle.

pub mod item;
pub mod map;
pub mod orchestrator;
