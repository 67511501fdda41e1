//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for common error scenarios.

use std::fmt::Write;

use crate::provision::ProvisionError;
use crate::tracking::TrackingError;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    let error_msg = error.to_string();

    if let Some(tracking) = error.downcast_ref::<TrackingError>() {
        format_tracking_error(&mut output, tracking);
    } else if error_msg.contains("pose trace") {
        format_trace_error(&mut output, &error_msg);
    } else if error_msg.contains("config") {
        format_config_error(&mut output, &error_msg);
    } else {
        format_generic_error(&mut output, &error_msg);
    }

    writeln!(&mut output).ok();
    writeln!(&mut output, "{}", RULE).ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    writeln!(&mut output, "{}", RULE).ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: {} -vv",
        env!("CARGO_PKG_NAME")
    )
    .ok();
    writeln!(
        &mut output,
        "  - Or set RUST_LOG={}=trace for per-frame output",
        env!("CARGO_CRATE_NAME")
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_tracking_error(output: &mut String, error: &TrackingError) {
    match error {
        TrackingError::ModelUnavailable {
            load_attempts,
            source,
        } => {
            writeln!(output, "Hand Pose Model Unavailable").ok();
            writeln!(output).ok();
            writeln!(
                output,
                "Hand tracking could not start because the pose model did not load."
            )
            .ok();
            writeln!(output, "Reason: {}", source).ok();
            writeln!(output).ok();
            writeln!(output, "Common Causes:").ok();
            writeln!(output).ok();
            match source {
                ProvisionError::RuntimeInjection(_) | ProvisionError::RetriesExhausted { .. } => {
                    writeln!(
                        output,
                        "  1. Inference runtime failed to load ({} attempts)",
                        load_attempts
                    )
                    .ok();
                    writeln!(output, "     → Check network access to the model host").ok();
                    writeln!(
                        output,
                        "     → Raise [provisioning] max_attempts or retry_backoff_ms"
                    )
                    .ok();
                }
                ProvisionError::Initialization(_) => {
                    writeln!(output, "  1. Inference runtime did not initialize").ok();
                    writeln!(
                        output,
                        "     → Check [provisioning.detector] runtime backend support"
                    )
                    .ok();
                }
                ProvisionError::DetectorLoad(_) | ProvisionError::DetectorUnavailable => {
                    writeln!(output, "  1. Detector library did not initialize").ok();
                    writeln!(
                        output,
                        "     → Raise [provisioning] settle_delay_ms for slow devices"
                    )
                    .ok();
                }
                ProvisionError::DetectorCreation(_) => {
                    writeln!(output, "  1. Detector could not be created").ok();
                    writeln!(
                        output,
                        "     → Check [provisioning.detector] model_type and runtime"
                    )
                    .ok();
                }
            }
        }
        TrackingError::StoppedDuringStartup => {
            writeln!(output, "Tracking Cancelled").ok();
            writeln!(output).ok();
            writeln!(
                output,
                "Tracking was stopped before the model finished loading."
            )
            .ok();
        }
    }
}

fn format_trace_error(output: &mut String, _error: &str) {
    writeln!(output, "Pose Trace Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not read the recorded pose trace.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Trace file not found").ok();
    writeln!(output, "     → Check the path passed to --trace").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid trace format").ok();
    writeln!(
        output,
        "     → One JSON array of hands per line, e.g. [{{\"keypoints\":[...]}}]"
    )
    .ok();
    writeln!(output, "     → Use [] for frames without a hand").ok();
}

fn format_config_error(output: &mut String, _error: &str) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Configuration file not found").ok();
    if let Some(path) = crate::config::default_path() {
        writeln!(output, "     → Default location: {}", path.display()).ok();
    }
    writeln!(
        output,
        "     → Or specify: {} -c /path/to/config.toml",
        env!("CARGO_PKG_NAME")
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Out-of-range values").ok();
    writeln!(
        output,
        "     → max_attempts, frame_rate and pinch_threshold_px must be positive"
    )
    .ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Hand Tracking Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while tracking.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_user_error() {
        let error = anyhow::anyhow!("something broke");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("something broke"));
    }

    #[test]
    fn test_model_unavailable_formatting() {
        let error = anyhow::Error::new(TrackingError::ModelUnavailable {
            load_attempts: 3,
            source: ProvisionError::RetriesExhausted { attempts: 3 },
        });
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Hand Pose Model Unavailable"));
        assert!(formatted.contains("3 attempts"));
        assert!(formatted.contains("max_attempts"));
    }

    #[test]
    fn test_detector_failures_are_distinguished() {
        let unavailable = format_user_error(&anyhow::Error::new(TrackingError::ModelUnavailable {
            load_attempts: 0,
            source: ProvisionError::DetectorUnavailable,
        }));
        assert!(unavailable.contains("settle_delay_ms"));
        assert!(!unavailable.contains("could not be created"));

        let creation = format_user_error(&anyhow::Error::new(TrackingError::ModelUnavailable {
            load_attempts: 0,
            source: ProvisionError::DetectorCreation("unsupported backend".into()),
        }));
        assert!(creation.contains("Detector could not be created"));
        assert!(creation.contains("unsupported backend"));
        assert!(!creation.contains("settle_delay_ms"));
    }

    #[test]
    fn test_config_error_formatting() {
        let error = anyhow::anyhow!("Failed to parse config file");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Configuration Error"));
    }
}
