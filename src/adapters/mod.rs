//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter         | Implements         | Connects to                  |
//! |-----------------|--------------------|------------------------------|
//! | `backend`       | PinBackend         | nothing / in-memory recorder |
//! | `hal`           | PinBackend         | `embedded-hal` pin drivers   |
//! | `local`         | PinBackend         | ESP32 GPIO + ADC1            |
//! | `register_bank` | RegisterTransport  | Modbus server register banks |
//! | `time`          | Clock              | ESP32 system timer / manual  |

pub mod backend;
pub mod hal;
pub mod local;
pub mod register_bank;
pub mod time;
