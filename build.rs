fn main() {
    // Propagate the ESP-IDF build environment (linker args, sdkconfig) to
    // the firmware binary. Host-only builds skip this entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
