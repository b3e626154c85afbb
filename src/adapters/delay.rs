//! Blocking delay adapter.
//!
//! Implements [`DelayPort`] for the control loop thread.  On ESP-IDF the
//! wait is a FreeRTOS `vTaskDelay`, which yields the core to the HTTP
//! server and Wi-Fi tasks; on the host it is a plain thread sleep.

use core::time::Duration;

use crate::app::ports::DelayPort;

pub struct TaskDelay;

impl TaskDelay {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaskDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayPort for TaskDelay {
    #[cfg(target_os = "espidf")]
    fn delay(&mut self, duration: Duration) {
        let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
