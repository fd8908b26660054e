// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain language with a clear suggestion.
// Severity drives how a front end presents the failure.

use crate::error::TactusError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Infrastructure blip — trying again may work.
    Transient,
    /// The user must do something (pick another file, fix a setting).
    ActionRequired,
    /// Retrying the same input cannot help.
    Permanent,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether a caller may reasonably retry.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `TactusError` into a `HumanError`.
///
/// Errors scoped to an image keep the image name in the message.
pub fn humanize_error(err: &TactusError) -> HumanError {
    match err {
        TactusError::InImage { image, source } => {
            let mut human = humanize_error(source);
            human.message = format!("{image}: {}", human.message);
            human
        }

        // -- Recognition errors --
        TactusError::ImageLoad { source_name, .. } => HumanError {
            message: format!("The picture {source_name} couldn't be opened."),
            suggestion: "The file may be damaged or not an image. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        TactusError::InvalidDetection { index, .. } => HumanError {
            message: "The symbol detector returned an impossible result.".into(),
            suggestion: format!(
                "Detection #{index} has a box with no area. The detector or its model may be broken; please report it."
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        TactusError::UnknownSymbol { label, table_len } => HumanError {
            message: "The detector found a symbol we don't know how to read.".into(),
            suggestion: format!(
                "Symbol {label} is outside the {table_len}-entry label table. Make sure the label table matches the detector model version."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TactusError::Detector(detail) => HumanError {
            message: "The symbol detector had a problem.".into(),
            suggestion: format!("Try again. If this keeps happening, check the detector setup. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Forward direction --
        TactusError::UnencodableText { token, line, column } => HumanError {
            message: "Some text can't be written in Braille with this table.".into(),
            suggestion: format!(
                "Remove or replace {token:?} (line {line}, column {column}), or use a label table that includes it."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Resources / configuration --
        TactusError::LabelTable(detail) => HumanError {
            message: "The Braille label table couldn't be used.".into(),
            suggestion: format!("Check the label table file. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TactusError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TactusError::Worker(_) => HumanError {
            message: "Processing this picture stopped unexpectedly.".into(),
            suggestion: "The other pictures were not affected. Please report this one along with the picture.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        TactusError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or copy the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Check that the disk is not full or disconnected, then run the command again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        TactusError::Serialization(_) => HumanError {
            message: "A data file couldn't be read.".into(),
            suggestion: "The file is not valid JSON or has the wrong shape. Check it and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolId;

    #[test]
    fn only_detector_failures_are_retriable() {
        let detector = humanize_error(&TactusError::Detector("model timed out".into()));
        assert!(detector.retriable);
        assert_eq!(detector.severity, Severity::Transient);

        let unknown = humanize_error(&TactusError::UnknownSymbol {
            label: SymbolId(80),
            table_len: 47,
        });
        assert!(!unknown.retriable);
        assert!(unknown.suggestion.contains("47-entry"));
    }

    #[test]
    fn crashed_workers_and_storage_faults_are_not_retriable() {
        let worker = humanize_error(
            &TactusError::Worker("task 2 panicked".into()).in_image("page-9.png"),
        );
        assert!(!worker.retriable);
        assert_eq!(worker.severity, Severity::Permanent);
        assert!(worker.message.starts_with("page-9.png: "));

        let io = humanize_error(&TactusError::Io(std::io::Error::other("disk gone")));
        assert!(!io.retriable);
    }

    #[test]
    fn image_load_is_permanent_and_named() {
        let human = humanize_error(&TactusError::ImageLoad {
            source_name: "scan.png".into(),
            reason: "bad header".into(),
        });
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains("scan.png"));
    }

    #[test]
    fn scoped_errors_keep_the_image_name() {
        let err = TactusError::Detector("offline".into()).in_image("page-3.jpg");
        let human = humanize_error(&err);
        assert!(human.message.starts_with("page-3.jpg: "));
        assert!(human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = TactusError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
