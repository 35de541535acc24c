//! System flags and the reportable status payload

use serde::Serialize;

use crate::altitude::TelemetryData;
use crate::calibration::{CalibrationData, CalibrationSnapshot};
use crate::flight::FlightState;
use crate::time::Timestamp;
use crate::VERSION;

/// Process-wide flags shared by the control loop and the command handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    hardware_ok: bool,
    calibrated: bool,
    monitoring: bool,
    logging: bool,
    flight_state: FlightState,
}

impl SystemStatus {
    /// Boot status; `hardware_ok` is fixed after sensor detection
    pub const fn new(hardware_ok: bool) -> Self {
        Self {
            hardware_ok,
            calibrated: false,
            monitoring: false,
            logging: false,
            flight_state: FlightState::Setup,
        }
    }

    /// Barometer acknowledged at init
    pub fn hardware_ok(&self) -> bool {
        self.hardware_ok
    }

    /// A usable baseline is installed
    pub fn calibrated(&self) -> bool {
        self.calibrated
    }

    /// Altitude updates are enabled
    pub fn monitoring(&self) -> bool {
        self.monitoring
    }

    /// Diagnostic telemetry lines are enabled
    pub fn logging(&self) -> bool {
        self.logging
    }

    /// Current flight mode
    pub fn flight_state(&self) -> FlightState {
        self.flight_state
    }

    /// Set after a completed calibration or a loaded blob
    pub fn set_calibrated(&mut self, calibrated: bool) {
        self.calibrated = calibrated;
    }

    /// Enable or pause altitude updates
    pub fn set_monitoring(&mut self, monitoring: bool) {
        self.monitoring = monitoring;
    }

    /// Enable or stop diagnostic lines
    pub fn set_logging(&mut self, logging: bool) {
        self.logging = logging;
    }

    /// Mirror the flight machine's mode
    pub fn set_flight_state(&mut self, state: FlightState) {
        self.flight_state = state;
    }
}

/// Status document served to the network layer
///
/// Live pressure is only present while monitoring. Altitude, temperature,
/// stability and baseline additionally require a calibration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    /// Barometer present
    pub hw_ok: bool,
    /// Baseline installed
    pub calibrated: bool,
    /// Calibration or zeroing running
    pub calibrating: bool,
    /// Calibration phase name
    pub calib_phase: &'static str,
    /// Calibration progress, 0–99
    pub calib_progress: u8,
    /// Base pressure last persisted (Pa)
    pub stored_base: f64,
    /// Altitude updates enabled
    pub monitoring: bool,
    /// Diagnostic lines enabled
    pub logging: bool,
    /// 0 Setup, 1 Armed, 2 Flight
    pub flight_mode: u8,
    /// Seconds since boot
    pub uptime_s: u64,
    /// Firmware version
    pub version: &'static str,
    /// Interval-averaged pressure (Pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_p: Option<f64>,
    /// Filtered altitude (m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<f32>,
    /// Sensor temperature (°C)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f32>,
    /// At rest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable: Option<bool>,
    /// Active base pressure (Pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
}

impl StatusReport {
    /// Assemble the payload from the controller's parts
    pub fn build(
        status: &SystemStatus,
        calibration: &CalibrationSnapshot,
        data: &CalibrationData,
        telemetry: &TelemetryData,
        now: Timestamp,
    ) -> Self {
        let live = status.monitoring;
        let with_altitude = live && status.calibrated;

        Self {
            hw_ok: status.hardware_ok,
            calibrated: status.calibrated,
            calibrating: calibration.calibrating,
            calib_phase: calibration.phase,
            calib_progress: calibration.progress,
            stored_base: data.stored_base_pressure,
            monitoring: status.monitoring,
            logging: status.logging,
            flight_mode: status.flight_state.code(),
            uptime_s: now / 1000,
            version: VERSION,
            current_p: live.then_some(telemetry.pressure),
            alt: with_altitude.then_some(telemetry.altitude),
            temp: with_altitude.then_some(telemetry.temperature),
            stable: with_altitude.then_some(telemetry.is_stable),
            base: with_altitude.then_some(data.base_pressure),
        }
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<alloc::string::String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
