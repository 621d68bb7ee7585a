//! Application layer: collaborator contracts and the default wiring.
//!
//! The synchronisation core only talks to hardware and the Modbus server
//! through the **port traits** in [`ports`], keeping it testable without
//! real peripherals.  [`device_map`] lays the controller's I/O out on
//! registers.

pub mod device_map;
pub mod ports;
