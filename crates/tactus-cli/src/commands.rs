// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use serde_json::json;
use tactus_core::config::PipelineConfig;
use tactus_core::error::{Result, TactusError};
use tactus_core::human_errors::humanize_error;
use tactus_core::labels::LabelTable;
use tactus_vision::{BrailleEncoder, ImageOutcome, Recognizer, SidecarDetector, recognize_batch};
use tracing::info;

/// Options shared by every subcommand.
#[derive(Debug, Default)]
pub struct Settings {
    pub config: Option<PathBuf>,
    pub labels: Option<PathBuf>,
}

impl Settings {
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(labels) = &self.labels {
            config.labels_path = Some(labels.clone());
        }
        Ok(config)
    }
}

/// The table named by the configuration, or the bundled one.
pub fn load_table(config: &PipelineConfig) -> Result<Arc<LabelTable>> {
    let table = match &config.labels_path {
        Some(path) => LabelTable::load(path)?,
        None => LabelTable::builtin()?,
    };
    info!(table = table.name(), entries = table.len(), "label table ready");
    Ok(Arc::new(table))
}

pub async fn recognize(
    settings: &Settings,
    images: Vec<PathBuf>,
    json: bool,
    concurrency: Option<usize>,
) -> Result<ExitCode> {
    let mut config = settings.pipeline_config()?;
    if let Some(concurrency) = concurrency {
        config.batch.max_concurrency = concurrency;
    }
    config.validate()?;

    let table = load_table(&config)?;
    let recognizer = Arc::new(Recognizer::new(
        &config,
        table,
        Arc::new(SidecarDetector::new()),
    ));
    info!(
        detector = recognizer.detector_name(),
        images = images.len(),
        "recognising"
    );
    let outcomes = recognize_batch(recognizer, images, config.batch.max_concurrency).await;

    for outcome in &outcomes {
        if json {
            println!("{}", render_json(outcome)?);
        } else {
            match &outcome.result {
                Ok(recognition) => {
                    println!("== {} ==", outcome.source.display());
                    print!("{}", recognition.text);
                }
                Err(err) => {
                    let human = humanize_error(err);
                    eprintln!("{}\n{}", human.message, human.suggestion);
                }
            }
        }
    }

    if outcomes.iter().all(ImageOutcome::is_ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// One JSON line per image: the recognition, or the error in plain language.
fn render_json(outcome: &ImageOutcome) -> Result<String> {
    let value = match &outcome.result {
        Ok(recognition) => serde_json::to_value(recognition)?,
        Err(err) => {
            let human = humanize_error(err);
            json!({
                "source": outcome.source.display().to_string(),
                "error": err.to_string(),
                "message": human.message,
                "suggestion": human.suggestion,
                "retriable": human.retriable,
            })
        }
    };
    Ok(serde_json::to_string(&value)?)
}

pub fn encode(settings: &Settings, text: Option<String>, input: Option<PathBuf>) -> Result<ExitCode> {
    let text = match (text, input) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => {
            return Err(TactusError::Config(
                "nothing to encode: pass text or --input <file>".into(),
            ));
        }
    };

    let config = settings.pipeline_config()?;
    let encoder = BrailleEncoder::new(load_table(&config)?);
    println!("{}", encoder.encode_to_cells(&text)?);
    Ok(ExitCode::SUCCESS)
}

pub fn labels(settings: &Settings) -> Result<ExitCode> {
    let config = settings.pipeline_config()?;
    let table = load_table(&config)?;
    println!("{} ({} entries)", table.name(), table.len());
    println!("fingerprint {}", table.fingerprint());
    for (id, entry) in table.iter() {
        println!("{:>4}  {}  {}", id.0, entry.cell, entry.text);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_flag_overrides_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("tactus.json");
        std::fs::write(&config_path, r#"{"labels_path": "/from/config.json"}"#).unwrap();

        let settings = Settings {
            config: Some(config_path.clone()),
            labels: Some(PathBuf::from("/from/flag.json")),
        };
        let config = settings.pipeline_config().unwrap();
        assert_eq!(config.labels_path, Some(PathBuf::from("/from/flag.json")));

        let from_file = Settings {
            config: Some(config_path),
            labels: None,
        };
        assert_eq!(
            from_file.pipeline_config().unwrap().labels_path,
            Some(PathBuf::from("/from/config.json"))
        );
    }

    #[test]
    fn default_settings_use_bundled_table() {
        let config = Settings::default().pipeline_config().unwrap();
        let table = load_table(&config).unwrap();
        assert_eq!(table.fingerprint(), LabelTable::builtin().unwrap().fingerprint());
    }

    #[test]
    fn failed_outcome_renders_plain_language_json() {
        let outcome = ImageOutcome {
            source: PathBuf::from("page-2.png"),
            result: Err(TactusError::Detector("timeout".into()).in_image("page-2.png")),
        };
        let value: serde_json::Value = serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();
        assert_eq!(value["source"], "page-2.png");
        assert_eq!(value["retriable"], true);
        assert!(value["error"].as_str().unwrap().contains("timeout"));
    }

    #[test]
    fn encode_without_input_is_rejected() {
        let err = encode(&Settings::default(), None, None).unwrap_err();
        assert!(matches!(err, TactusError::Config(_)));
    }
}
