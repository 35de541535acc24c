//! Calibration data and its persistence contract
//!
//! Only the base pressure is persisted, as `{"basePressure": <Pa>}`. The
//! adaptive baseline is working state: it starts from the base pressure and
//! then follows the atmosphere until the next calibration or re-zero.

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::errors::CalibrationBlobError;

/// Persisted and working baseline pressures (Pa)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CalibrationData {
    /// Mean pressure measured by the last full calibration
    pub base_pressure: f64,
    /// Live zero-altitude reference, drift compensated
    pub adaptive_baseline: f64,
    /// Base pressure as last written to storage, may lag `base_pressure`
    pub stored_base_pressure: f64,
}

/// On-disk shape
#[derive(Serialize, Deserialize)]
struct CalibrationBlob {
    #[serde(rename = "basePressure", default)]
    base_pressure: f64,
}

impl CalibrationData {
    /// Full calibration finished: both baselines restart from `base_pressure`
    pub fn apply_calibration(&mut self, base_pressure: f64) {
        self.base_pressure = base_pressure;
        self.adaptive_baseline = base_pressure;
    }

    /// Re-zero finished: only the live baseline moves
    pub fn apply_zero(&mut self, baseline: f64) {
        self.adaptive_baseline = baseline;
    }

    /// Blend the live baseline towards `pressure` by `alpha`
    pub fn blend_baseline(&mut self, pressure: f64, alpha: f64) {
        self.adaptive_baseline = self.adaptive_baseline * (1.0 - alpha) + pressure * alpha;
    }

    /// Record that `base_pressure` reached storage
    pub fn mark_persisted(&mut self) {
        self.stored_base_pressure = self.base_pressure;
    }

    /// Encode the persisted subset
    pub fn to_blob(&self) -> Result<String, CalibrationBlobError> {
        let blob = CalibrationBlob {
            base_pressure: self.base_pressure,
        };
        serde_json::to_string(&blob).map_err(|_| CalibrationBlobError::Malformed)
    }

    /// Decode a stored blob and adopt it as the active calibration
    ///
    /// All three pressures take the stored value. On error nothing changes.
    pub fn load_blob(&mut self, json: &str) -> Result<f64, CalibrationBlobError> {
        if json.is_empty() {
            return Err(CalibrationBlobError::Empty);
        }
        let blob: CalibrationBlob =
            serde_json::from_str(json).map_err(|_| CalibrationBlobError::Malformed)?;

        let value = blob.base_pressure;
        if !value.is_finite() || value <= 0.0 {
            return Err(CalibrationBlobError::NonPositiveBasePressure);
        }

        self.base_pressure = value;
        self.adaptive_baseline = value;
        self.stored_base_pressure = value;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_uses_camel_case_key() {
        let data = CalibrationData {
            base_pressure: 100_812.5,
            ..Default::default()
        };
        assert_eq!(data.to_blob().unwrap(), r#"{"basePressure":100812.5}"#);
    }

    #[test]
    fn load_adopts_all_three_pressures() {
        let mut data = CalibrationData::default();
        assert_eq!(data.load_blob(r#"{"basePressure": 99500.25}"#), Ok(99_500.25));
        assert_eq!(data.base_pressure, 99_500.25);
        assert_eq!(data.adaptive_baseline, 99_500.25);
        assert_eq!(data.stored_base_pressure, 99_500.25);
    }

    #[test]
    fn rejected_blobs_leave_data_untouched() {
        let mut data = CalibrationData::default();
        data.apply_calibration(101_000.0);
        let before = data;

        assert_eq!(data.load_blob(""), Err(CalibrationBlobError::Empty));
        assert_eq!(data.load_blob("not json"), Err(CalibrationBlobError::Malformed));
        assert_eq!(
            data.load_blob(r#"{"basePressure": 0}"#),
            Err(CalibrationBlobError::NonPositiveBasePressure)
        );
        assert_eq!(
            data.load_blob(r#"{"basePressure": -12.0}"#),
            Err(CalibrationBlobError::NonPositiveBasePressure)
        );
        assert_eq!(
            data.load_blob(r#"{"other": 1}"#),
            Err(CalibrationBlobError::NonPositiveBasePressure)
        );
        assert_eq!(data, before);
    }

    #[test]
    fn stored_pressure_lags_until_persisted() {
        let mut data = CalibrationData::default();
        data.apply_calibration(100_000.0);
        assert_eq!(data.stored_base_pressure, 0.0);

        data.mark_persisted();
        assert_eq!(data.stored_base_pressure, 100_000.0);
    }

    #[test]
    fn zero_moves_only_live_baseline() {
        let mut data = CalibrationData::default();
        data.apply_calibration(100_000.0);
        data.apply_zero(99_950.0);
        assert_eq!(data.base_pressure, 100_000.0);
        assert_eq!(data.adaptive_baseline, 99_950.0);
    }
}
