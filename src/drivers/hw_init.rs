//! One-shot hardware peripheral initialization.
//!
//! Configures the relay and LED outputs, the tank level inputs and the
//! soil moisture ADC channel using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts.
//!
//! The relay outputs are driven HIGH (pump off) as the very first step so
//! no pump can twitch on during boot.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::ActuatorError;
#[cfg(target_os = "espidf")]
use crate::error::SensorError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    RelayParkFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::RelayParkFailed(pin) => write!(f, "could not park relay on GPIO{}", pin),
        }
    }
}

impl std::error::Error for HwInitError {}

/// Relay outputs, parked HIGH (released) at boot.
pub const RELAY_PINS: [i32; 2] = [pins::WATER_PUMP_RELAY_GPIO, pins::FERTILIZER_PUMP_RELAY_GPIO];

/// Alert LED outputs, parked LOW (dark) at boot.
pub const LED_PINS: [i32; 2] = [pins::WATER_ALERT_LED_GPIO, pins::FERTILIZER_ALERT_LED_GPIO];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any other task exists.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_adc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    for pin in RELAY_PINS {
        gpio_write(pin, true).map_err(|_| HwInitError::RelayParkFailed(pin))?;
    }
    for pin in LED_PINS {
        gpio_write(pin, false).map_err(|_| HwInitError::GpioConfigFailed(pin))?;
    }
    log::info!("hw_init(sim): outputs parked, peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn configure_pin(pin: i32, mode: gpio_mode_t) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    match unsafe { gpio_config(&cfg) } {
        ret if ret == ESP_OK as i32 => Ok(()),
        ret => Err(HwInitError::GpioConfigFailed(ret)),
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for (&pin, level) in RELAY_PINS.iter().zip([1u32; 2]).chain(LED_PINS.iter().zip([0u32; 2])) {
        // Latch the level before switching to output so the pin never
        // glitches through the wrong state.
        let ret = unsafe { gpio_set_level(pin, level) };
        if ret != ESP_OK as i32 { return Err(HwInitError::RelayParkFailed(pin)); }

        unsafe { configure_pin(pin, gpio_mode_t_GPIO_MODE_OUTPUT)? };

        let ret = unsafe { gpio_set_level(pin, level) };
        if ret != ESP_OK as i32 { return Err(HwInitError::RelayParkFailed(pin)); }
    }

    info!("hw_init: relays released, alert LEDs off");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs(); the register write itself is atomic.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ActuatorError::GpioWriteFailed) }
}

#[cfg(not(target_os = "espidf"))]
static SIM_PIN_LEVEL: [core::sync::atomic::AtomicBool; 40] =
    [const { core::sync::atomic::AtomicBool::new(false) }; 40];

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    let slot = usize::try_from(pin)
        .ok()
        .and_then(|i| SIM_PIN_LEVEL.get(i))
        .ok_or(ActuatorError::GpioWriteFailed)?;
    slot.store(high, core::sync::atomic::Ordering::Relaxed);
    Ok(())
}

/// Last level written to `pin` in simulation.
#[cfg(not(target_os = "espidf"))]
pub fn sim_level(pin: i32) -> bool {
    usize::try_from(pin)
        .ok()
        .and_then(|i| SIM_PIN_LEVEL.get(i))
        .is_some_and(|slot| slot.load(core::sync::atomic::Ordering::Relaxed))
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for pin in [pins::WATER_LEVEL_GPIO, pins::FERTILIZER_LEVEL_GPIO] {
        // GPIO34..39 have no internal pulls.
        unsafe { configure_pin(pin, gpio_mode_t_GPIO_MODE_INPUT)? };
    }

    info!("hw_init: tank level inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Written once in `init_adc()` before the control loop starts;
/// afterwards only the control loop thread reads through it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::SOIL_MOISTURE_ADC_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 configured (CH{}=soil, 12-bit, 12 dB)", pins::SOIL_MOISTURE_ADC_CHANNEL);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, control loop thread only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.clamp(0, 4095) as u16)
}
