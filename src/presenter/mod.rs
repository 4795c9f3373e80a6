//! Turns a classification result into ranked display structures and
//! precaution text.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{ClassificationResult, Prediction};
use crate::content::PrecautionTable;
use crate::error::AppError;
use crate::utils::title_case;

pub const DEFAULT_TOP_N: usize = 3;
pub const NO_PRECAUTIONS: &str = "No specific precautions available.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub disorder: String,
    pub confidence_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub orientation: &'static str,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPrediction {
    pub label: String,
    pub display_label: String,
    pub confidence: f64,
    pub confidence_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Precautions {
    pub heading: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub top: TopPrediction,
    pub table: Vec<TableRow>,
    pub chart: BarChart,
    pub precautions: Precautions,
    pub analyzed_at: DateTime<Utc>,
}

/// Highest-confidence entry; the earliest one wins a tie.
pub fn top_prediction(result: &ClassificationResult) -> Option<&Prediction> {
    result
        .predictions
        .iter()
        .reduce(|best, p| if p.confidence > best.confidence { p } else { best })
}

/// Stable sort by descending confidence, truncated to `n`.
pub fn top_n(result: &ClassificationResult, n: usize) -> Vec<Prediction> {
    let mut ranked = result.predictions.clone();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked.truncate(n);
    ranked
}

pub fn normalise_label(label: &str) -> String {
    label.trim().to_lowercase()
}

pub fn precautions_for(table: &PrecautionTable, label: &str) -> Vec<String> {
    table
        .get(&normalise_label(label))
        .map(<[String]>::to_vec)
        .unwrap_or_else(|| vec![NO_PRECAUTIONS.to_string()])
}

/// `confidence` as a percentage rounded to two decimals.
pub fn confidence_pct(confidence: f64) -> f64 {
    (confidence * 100.0 * 100.0).round() / 100.0
}

// 91.0 显示为 "91.0%"，12.34 显示为 "12.34%"
fn format_pct(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{}%", pct)
    }
}

pub fn render_table(ranked: &[Prediction]) -> Vec<TableRow> {
    ranked
        .iter()
        .map(|p| TableRow {
            disorder: title_case(&p.label),
            confidence_pct: confidence_pct(p.confidence),
        })
        .collect()
}

const CHART_TITLE: &str = "Top 3 Predictions";

pub fn render_chart(rows: &[TableRow]) -> BarChart {
    BarChart {
        title: CHART_TITLE.into(),
        x_axis: "Confidence (%)".into(),
        y_axis: "Disorder".into(),
        orientation: "h",
        bars: rows
            .iter()
            .map(|row| Bar {
                label: row.disorder.clone(),
                value: row.confidence_pct,
                text: format_pct(row.confidence_pct),
            })
            .collect(),
    }
}

pub fn build_report(
    result: &ClassificationResult,
    table: &PrecautionTable,
    analyzed_at: DateTime<Utc>,
) -> Result<AnalysisReport, AppError> {
    let top = top_prediction(result).ok_or(AppError::NoPredictions)?;
    let label = normalise_label(&top.label);

    let rows = render_table(&top_n(result, DEFAULT_TOP_N));
    let chart = render_chart(&rows);

    Ok(AnalysisReport {
        top: TopPrediction {
            display_label: title_case(&label),
            label: label.clone(),
            confidence: top.confidence,
            confidence_pct: confidence_pct(top.confidence),
        },
        table: rows,
        chart,
        precautions: Precautions {
            heading: format!("Precautions for {}", title_case(&label)),
            tips: precautions_for(table, &label),
        },
        analyzed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContent;

    fn result_of(pairs: &[(&str, f64)]) -> ClassificationResult {
        ClassificationResult {
            predictions: pairs
                .iter()
                .map(|(label, confidence)| Prediction::new(*label, *confidence))
                .collect(),
        }
    }

    fn table() -> PrecautionTable {
        StaticContent::load().unwrap().precautions
    }

    #[test]
    fn normal_scenario_renders_top_three() {
        let result = result_of(&[("Normal", 0.91), ("Dystonia", 0.05), ("Tremor", 0.04)]);
        let report = build_report(&result, &table(), Utc::now()).unwrap();

        assert_eq!(report.top.label, "normal");
        assert_eq!(report.top.display_label, "Normal");
        assert_eq!(
            report.table,
            vec![
                TableRow { disorder: "Normal".into(), confidence_pct: 91.0 },
                TableRow { disorder: "Dystonia".into(), confidence_pct: 5.0 },
                TableRow { disorder: "Tremor".into(), confidence_pct: 4.0 },
            ]
        );
        let texts: Vec<_> = report.chart.bars.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["91.0%", "5.0%", "4.0%"]);
        assert_eq!(report.chart.title, "Top 3 Predictions");
        assert_eq!(report.precautions.heading, "Precautions for Normal");
        assert_eq!(
            report.precautions.tips[0],
            "✅ No abnormalities detected. Maintain healthy habits."
        );
    }

    #[test]
    fn chart_title_is_fixed_for_short_results() {
        let result = result_of(&[("Dystonia", 1.0)]);
        let report = build_report(&result, &table(), Utc::now()).unwrap();
        assert_eq!(report.chart.bars.len(), 1);
        assert_eq!(report.chart.title, "Top 3 Predictions");
        assert_eq!(
            report.precautions.tips[0],
            "🧘‍♀️ Reduce stress with mindfulness and relaxation techniques."
        );
    }

    #[test]
    fn empty_predictions_are_reported() {
        assert_eq!(top_prediction(&ClassificationResult::default()), None);
        assert!(matches!(
            build_report(&ClassificationResult::default(), &table(), Utc::now()),
            Err(AppError::NoPredictions)
        ));
    }

    #[test]
    fn top_prediction_prefers_first_of_equal_scores() {
        let result = result_of(&[("dystonia", 0.4), ("normal", 0.4), ("tremor", 0.2)]);
        assert_eq!(top_prediction(&result).unwrap().label, "dystonia");
    }

    #[test]
    fn top_n_is_bounded_stable_and_idempotent() {
        let result = result_of(&[
            ("a", 0.1),
            ("b", 0.3),
            ("c", 0.3),
            ("d", 0.2),
            ("e", 0.1),
        ]);
        let ranked = top_n(&result, 3);
        let labels: Vec<_> = ranked.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["b", "c", "d"]);

        let again = top_n(&ClassificationResult { predictions: ranked.clone() }, 3);
        assert_eq!(again, ranked);

        assert_eq!(top_n(&result, 10).len(), 5);
        assert!(top_n(&result, 0).is_empty());
    }

    #[test]
    fn precaution_lookup_ignores_case_and_whitespace() {
        let table = table();
        let upper = precautions_for(&table, "PARKINSON DISEASE");
        assert_eq!(upper, precautions_for(&table, " parkinson disease "));
        assert_eq!(upper.len(), 7);
    }

    #[test]
    fn unknown_label_gets_generic_precaution() {
        assert_eq!(
            precautions_for(&table(), "Tremor"),
            vec![NO_PRECAUTIONS.to_string()]
        );
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        assert_eq!(confidence_pct(0.123456), 12.35);
        assert_eq!(format_pct(12.35), "12.35%");
        assert_eq!(format_pct(100.0), "100.0%");
    }
}
