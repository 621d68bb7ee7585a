//! Pin assignments for the controller's local I/O.
//!
//! Single source of truth: the default device map and the link supervisor
//! reference this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relay outputs
// ---------------------------------------------------------------------------

/// Relay coils, in register order.
pub const RELAY_PINS: [u8; 4] = [1, 2, 3, 4];
/// Front-panel LED mirroring each relay.
pub const RELAY_LED_PINS: [u8; 4] = [11, 12, 13, 14];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Digital inputs with internal pull-up.
pub const DIGITAL_INPUT_PINS: [u8; 4] = [5, 6, 7, 8];
/// Analog inputs (ADC1 channels).
pub const ANALOG_INPUT_PINS: [u8; 4] = [0, 9, 10, 15];

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

/// Network OK.
pub const STATUS_GREEN_PIN: u8 = 16;
/// Network fault; blinks while the link is down.
pub const STATUS_RED_PIN: u8 = 17;
