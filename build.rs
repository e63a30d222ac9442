fn main() {
    // ESP-IDF link arguments are only needed for the firmware image.
    // Host builds (tests, fuzzing) skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
