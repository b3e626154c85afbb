//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | SensorPort         | ESP32 ADC1, GPIO inputs  |
//! |                | ActuatorPort       | Relay and LED GPIOs      |
//! | `delay`        | DelayPort          | FreeRTOS task delay      |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `wifi`         | –                  | ESP-IDF WiFi STA         |
//! | `http_server`  | –                  | ESP-IDF HTTP server      |

pub mod delay;
pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http_server;
pub mod log_sink;
pub mod wifi;
