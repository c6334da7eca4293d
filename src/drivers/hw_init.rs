//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit and the three light-sensor channels
//! using raw ESP-IDF sys calls. Called once from `main()` before
//! calibration. The servo's LEDC channel is built in `main` through
//! `esp-idf-hal`, since it needs typed peripheral ownership.

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[cfg(target_os = "espidf")]
use log::{info, warn};

use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::error::{Error, SensorError};
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe { init_adc() }?;
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path. No concurrent access is possible because
/// `init_adc()` completes before the control loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        warn!("hw_init: adc_oneshot_new_unit rc={}", ret);
        return Err(Error::Init("ADC1 unit init failed"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::OBSTACLE_A_ADC_CH, pins::OBSTACLE_B_ADC_CH, pins::AMBIENT_ADC_CH] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            warn!("hw_init: ADC1 CH{} config rc={}", channel, ret);
            return Err(Error::Init("ADC1 channel config failed"));
        }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=A, CH{}=B, CH{}=ambient)",
        pins::OBSTACLE_A_ADC_CH,
        pins::OBSTACLE_B_ADC_CH,
        pins::AMBIENT_ADC_CH
    );
    Ok(())
}

/// Raw 12-bit ADC1 read.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> core::result::Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}
