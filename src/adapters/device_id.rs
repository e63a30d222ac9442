//! Device identity derived from the ESP32 WiFi station MAC address.
//!
//! The identity is the 6-byte MAC formatted as colon-separated lowercase
//! hex, **unpadded** and in **reverse byte order** (byte 5 first).  The
//! collection server keys devices on this exact string, so the format
//! must not change.
//!
//! ```text
//! [0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]  →  "5f:4e:3d:2c:1b:a"
//! ```

use core::fmt::Write;

/// Formatted identity: at most 6 × 2 hex digits + 5 colons.
pub type DeviceIdString = heapless::String<17>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the WiFi station MAC address.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: `mac` is a valid 6-byte buffer for the duration of the call.
    let ret = unsafe {
        esp_idf_svc::sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_WIFI_STA,
        )
    };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        log::warn!("esp_read_mac failed (rc={}), identity will be zero", ret);
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x0A]
}

/// Format `mac` as the device identity string.
pub fn format_mac(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    for (i, byte) in mac.iter().rev().enumerate() {
        if i > 0 {
            let _ = id.push(':');
        }
        // Capacity is exact for the worst case; writes cannot overflow.
        let _ = write!(id, "{:x}", byte);
    }
    id
}
