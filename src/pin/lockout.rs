use serde_json::Value;

/// Tag the server puts in `detail.type` when PIN attempts are locked out.
pub const ACCOUNT_LOCKED: &str = "account_locked";

/// Server-reported lockout after too many wrong PINs.
#[derive(Debug, Clone, PartialEq)]
pub struct LockoutInfo {
    pub message: String,
    /// Seconds until the lockout ends. NaN when the server sent something
    /// that is not a number.
    pub remaining_seconds: f64,
}

impl LockoutInfo {
    /// Reads a lockout from an error `detail` object, if it is one.
    #[must_use]
    pub fn from_detail(detail: &Value) -> Option<Self> {
        let object = detail.as_object()?;
        if object.get("type").and_then(Value::as_str) != Some(ACCOUNT_LOCKED) {
            return None;
        }

        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let remaining_seconds = object
            .get("remaining_seconds")
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN);

        Some(Self {
            message,
            remaining_seconds,
        })
    }

    /// Message shown to the user right before the redirect.
    #[must_use]
    pub fn redirect_message(&self) -> String {
        format!(
            "{} You will be redirected to the dashboard. Please try again in {}.",
            self.message,
            format_seconds_to_hms(self.remaining_seconds)
        )
    }
}

/// Formats a number of seconds as zero-padded `HH:MM:SS`.
///
/// Negative, NaN and infinite input renders as `00:00:00`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_seconds_to_hms(total_seconds: f64) -> String {
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return "00:00:00".to_string();
    }

    let total = total_seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_seconds_to_hms() {
        assert_eq!(format_seconds_to_hms(0.0), "00:00:00");
        assert_eq!(format_seconds_to_hms(59.9), "00:00:59");
        assert_eq!(format_seconds_to_hms(905.0), "00:15:05");
        assert_eq!(format_seconds_to_hms(3600.0), "01:00:00");
        assert_eq!(format_seconds_to_hms(86_399.0), "23:59:59");
        assert_eq!(format_seconds_to_hms(360_000.0), "100:00:00");
    }

    #[test]
    fn test_format_seconds_to_hms_invalid_input() {
        assert_eq!(format_seconds_to_hms(-5.0), "00:00:00");
        assert_eq!(format_seconds_to_hms(f64::NAN), "00:00:00");
        assert_eq!(format_seconds_to_hms(f64::INFINITY), "00:00:00");
        assert_eq!(format_seconds_to_hms(f64::NEG_INFINITY), "00:00:00");
    }

    #[test]
    fn test_from_detail_lockout() {
        let detail = json!({
            "type": "account_locked",
            "message": "Too many failed PIN attempts.",
            "remaining_seconds": 905
        });
        let info = LockoutInfo::from_detail(&detail).unwrap();
        assert_eq!(info.message, "Too many failed PIN attempts.");
        assert!((info.remaining_seconds - 905.0).abs() < f64::EPSILON);
        assert_eq!(
            info.redirect_message(),
            "Too many failed PIN attempts. You will be redirected to the dashboard. Please try again in 00:15:05."
        );
    }

    #[test]
    fn test_from_detail_non_numeric_seconds() {
        let detail = json!({
            "type": "account_locked",
            "message": "Locked.",
            "remaining_seconds": "soon"
        });
        let info = LockoutInfo::from_detail(&detail).unwrap();
        assert!(info.remaining_seconds.is_nan());
        assert!(info.redirect_message().ends_with("Please try again in 00:00:00."));
    }

    #[test]
    fn test_from_detail_other_shapes() {
        assert!(LockoutInfo::from_detail(&json!("Invalid PIN")).is_none());
        assert!(LockoutInfo::from_detail(&json!({"type": "invalid_pin"})).is_none());
        assert!(LockoutInfo::from_detail(&json!([{"msg": "field required"}])).is_none());
    }
}
