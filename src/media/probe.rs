use serde::Deserialize;

use crate::error::{ConvertError, Result};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Extract `format.duration` in seconds from `ffprobe -print_format json -show_format` output
pub fn parse_duration(json: &str) -> Result<f64> {
    let probe: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| ConvertError::DurationUnavailable(format!("Failed to parse ffprobe output: {}", e)))?;

    let raw = probe
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| ConvertError::DurationUnavailable("ffprobe reported no duration".to_string()))?;

    let duration: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConvertError::DurationUnavailable(format!("Invalid duration value '{}'", raw)))?;

    if !duration.is_finite() || duration < 0.0 {
        return Err(ConvertError::DurationUnavailable(format!(
            "Invalid duration value '{}'",
            raw
        )));
    }

    Ok(duration)
}
