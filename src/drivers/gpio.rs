//! Raw GPIO and ADC access for the local pin backend.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: configures pins with `gpio_config`, drives them with
//! `gpio_set_level` and samples ADC1 through the oneshot driver.
//! On host/test: a static simulated pin table that tests and the
//! simulation binary drive with [`sim_set_level`] / [`sim_set_analog`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::PinMode;

/// Highest pin number the simulated table covers (exclusive).
pub const SIM_PINS: usize = 64;

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    AdcInitFailed(i32),
    ConfigFailed(i32),
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::ConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

// ── Pin configuration ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn configure(pin: u8, mode: PinMode) -> Result<(), GpioError> {
    let (gpio_mode, pull_up) = match mode {
        PinMode::Input => (gpio_mode_t_GPIO_MODE_INPUT, false),
        PinMode::InputPullUp => (gpio_mode_t_GPIO_MODE_INPUT, true),
        // Input/output so the level can be read back.
        PinMode::Output => (gpio_mode_t_GPIO_MODE_INPUT_OUTPUT, false),
    };
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config only touches the pin named in the mask; called
    // from the single main task during device setup.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(GpioError::ConfigFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn configure(_pin: u8, _mode: PinMode) -> Result<(), GpioError> {
    Ok(())
}

// ── Digital I/O ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn write(pin: u8, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Main-loop only.
    unsafe {
        gpio_set_level(i32::from(pin), u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn write(pin: u8, high: bool) {
    sim_set_level(pin, high);
}

#[cfg(target_os = "espidf")]
pub fn read(pin: u8) -> bool {
    // SAFETY: gpio_get_level is a read-only register access.
    (unsafe { gpio_get_level(i32::from(pin)) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn read(pin: u8) -> bool {
    sim::LEVELS
        .get(pin as usize)
        .is_some_and(|l| l.load(core::sync::atomic::Ordering::Relaxed))
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single main task.  The handle is
/// written once in `init_adc()` before any read.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
pub fn init_adc() -> Result<(), GpioError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(GpioError::AdcInitFailed(ret));
    }
    info!("gpio: ADC1 unit ready");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> Result<(), GpioError> {
    log::info!("gpio(sim): ADC init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn configure_adc_channel(channel: u8) -> Result<(), GpioError> {
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret =
        unsafe { adc_oneshot_config_channel(adc1_handle(), u32::from(channel), &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(GpioError::AdcInitFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn configure_adc_channel(_channel: u8) -> Result<(), GpioError> {
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc_read(channel: u8) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), u32::from(channel), &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc_read(channel: u8) -> u16 {
    sim::ANALOG
        .get(channel as usize)
        .map_or(0, |a| a.load(core::sync::atomic::Ordering::Relaxed))
}

// ── Simulation table ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16};

    pub(super) static LEVELS: [AtomicBool; super::SIM_PINS] =
        [const { AtomicBool::new(false) }; super::SIM_PINS];
    pub(super) static ANALOG: [AtomicU16; super::SIM_PINS] =
        [const { AtomicU16::new(0) }; super::SIM_PINS];
}

/// Drive a simulated pin.  Out-of-range pins are ignored.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(pin: u8, high: bool) {
    if let Some(level) = sim::LEVELS.get(pin as usize) {
        level.store(high, core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_analog(channel: u8, raw: u16) {
    if let Some(value) = sim::ANALOG.get(channel as usize) {
        value.store(raw, core::sync::atomic::Ordering::Relaxed);
    }
}
