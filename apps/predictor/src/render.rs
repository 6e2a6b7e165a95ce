//! Text rendering of the submission lifecycle.

use std::fmt::Write as _;

use client_core::SubmissionState;
use shared::{
    domain::{Field, FieldSet, GenotypeId, GENOTYPE_COUNT},
    protocol::PredictionResult,
};

struct TraitLabel {
    title: &'static str,
    unit: Option<&'static str>,
    note: Option<&'static str>,
}

const TRAIT_LABELS: [TraitLabel; 4] = [
    TraitLabel {
        title: "Yield",
        unit: Some("g"),
        note: None,
    },
    TraitLabel {
        title: "Sugar",
        unit: Some("Brix"),
        note: None,
    },
    TraitLabel {
        title: "Stress Tolerance",
        unit: None,
        note: Some("lower is better"),
    },
    TraitLabel {
        title: "Flowering",
        unit: Some("days"),
        note: None,
    },
];

pub const BUSY_INDICATOR: &str = "Predicting...";

/// Two-decimal display form used for every trait estimate.
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

fn trait_values(result: &PredictionResult) -> [f64; 4] {
    [
        result.predicted_yield,
        result.predicted_quality,
        result.predicted_stress,
        result.predicted_agronomic,
    ]
}

pub fn render_form(fields: &FieldSet) -> String {
    let width = Field::ALL
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or_default();
    let mut out = String::from("Plant Performance Predictor\n");
    for field in Field::ALL {
        let _ = writeln!(out, "  {:<width$}  {}", field.label(), fields.value(field));
    }
    out
}

pub fn render_result(result: &PredictionResult) -> String {
    let mut out = String::from("Predicted Performance\n");
    for (label, value) in TRAIT_LABELS.iter().zip(trait_values(result)) {
        let _ = write!(out, "  {:<16}  {}", label.title, format_value(value));
        if let Some(unit) = label.unit {
            let _ = write!(out, " {unit}");
        }
        if let Some(note) = label.note {
            let _ = write!(out, " ({note})");
        }
        out.push('\n');
    }
    out
}

pub fn render_state(state: &SubmissionState, fields: &FieldSet) -> String {
    match state {
        SubmissionState::Idle => render_form(fields),
        SubmissionState::Pending => format!("{BUSY_INDICATOR}\n"),
        SubmissionState::Succeeded(result) => render_result(result),
        SubmissionState::Failed(failure) => format!("Error: {}\n", failure.message),
    }
}

pub fn render_options(field: Field) -> String {
    let values = match field {
        Field::GenotypeId => format!(
            "{} .. {} ({GENOTYPE_COUNT} identifiers)",
            GenotypeId::FIRST,
            GenotypeId::LAST
        ),
        other => other.options().join(", "),
    };
    format!("{} [{}]: {values}\n", field.label(), field.name())
}

#[cfg(test)]
mod tests {
    use client_core::{Failure, FailureKind};

    use super::*;

    fn scenario_result() -> PredictionResult {
        PredictionResult {
            predicted_yield: 123.456,
            predicted_quality: 8.2,
            predicted_stress: 0.31,
            predicted_agronomic: 65.0,
        }
    }

    #[test]
    fn values_render_with_two_decimals() {
        assert_eq!(format_value(123.456), "123.46");
        assert_eq!(format_value(8.2), "8.20");
        assert_eq!(format_value(0.31), "0.31");
        assert_eq!(format_value(65.0), "65.00");
    }

    #[test]
    fn succeeded_state_renders_four_labeled_values() {
        let rendered = render_state(
            &SubmissionState::Succeeded(scenario_result()),
            &FieldSet::default(),
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("Yield") && lines[1].ends_with("123.46 g"));
        assert!(lines[2].contains("Sugar") && lines[2].ends_with("8.20 Brix"));
        assert!(lines[3].contains("Stress Tolerance"));
        assert!(lines[3].ends_with("0.31 (lower is better)"));
        assert!(lines[4].contains("Flowering") && lines[4].ends_with("65.00 days"));
    }

    #[test]
    fn every_state_has_a_rendering() {
        let fields = FieldSet::default();
        let idle = render_state(&SubmissionState::Idle, &fields);
        assert!(idle.contains("Genotype ID"));
        assert!(idle.contains("G0001"));
        assert!(idle.contains("Badlapur"));

        assert_eq!(
            render_state(&SubmissionState::Pending, &fields),
            "Predicting...\n"
        );

        let failed = render_state(
            &SubmissionState::Failed(Failure {
                kind: FailureKind::Transport,
                message: "Could not reach the prediction service.".to_string(),
            }),
            &fields,
        );
        assert_eq!(failed, "Error: Could not reach the prediction service.\n");
    }

    #[test]
    fn genotype_options_are_summarized() {
        assert_eq!(
            render_options(Field::GenotypeId),
            "Genotype ID [genotypeId]: G0001 .. G5000 (5000 identifiers)\n"
        );
        assert_eq!(
            render_options(Field::Location),
            "Location [location]: Badlapur, Nagpur\n"
        );
    }
}
