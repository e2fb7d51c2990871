//! Standalone HTML report for a finished diagnosis

use anyhow::{Context, Result};
use diagnosis_core::echo::{
    confidence_bar_width, confidence_percent, environment_summary, severity_tone,
};
use diagnosis_core::markdown::{escape_html, render};
use diagnosis_core::{image_source, ResultView};
use std::fmt::Write as _;
use std::path::Path;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;color:#1f2937}\
.severity-high{color:#b91c1c}.severity-medium{color:#b45309}.severity-low{color:#15803d}\
.bar{background:#e5e7eb;height:.5rem;border-radius:.25rem}\
.bar>div{background:#16a34a;height:100%;border-radius:.25rem}\
.fallback{background:#fef3c7;padding:.5rem 1rem;border-radius:.25rem}\
img{max-width:100%}td{padding:.25rem 1rem .25rem 0}";

/// Build the report document
pub fn render_report(view: &ResultView, generated_at: &str) -> String {
    let prediction = &view.result.prediction;
    let tone = severity_tone(&prediction.severity);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Diagnosis Results</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<h1>Diagnosis Results</h1>\n");
    let _ = writeln!(html, "<p><small>Generated {}</small></p>", escape_html(generated_at));

    if view.result.is_fallback() {
        html.push_str(
            "<p class=\"fallback\">The backend could not be reached; \
             showing demonstration data.</p>\n",
        );
    }

    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&prediction.disease));
    let _ = writeln!(
        html,
        "<p>Severity: <strong class=\"{}\">{}</strong></p>",
        tone.css_class(),
        escape_html(prediction.severity.as_str())
    );
    let _ = writeln!(
        html,
        "<p>Confidence: {}</p>\n<div class=\"bar\"><div style=\"width:{}%\"></div></div>",
        confidence_percent(prediction.confidence),
        confidence_bar_width(prediction.confidence)
    );

    html.push_str("<h2>Recommended Treatment</h2>\n");
    html.push_str(&render(Some(&view.result.remedy_markdown)));
    html.push('\n');

    html.push_str("<h2>Reference Image</h2>\n");
    let _ = writeln!(
        html,
        "<img src=\"{}\" alt=\"Reference image\">",
        escape_html(&image_source::resolve(view.result.reference_image.as_deref()))
    );

    html.push_str("<h2>Environmental Details Provided</h2>\n<table>\n");
    for row in environment_summary(&view.environment) {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            row.label,
            escape_html(&row.value)
        );
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// Write the report to `path`
pub fn write_report(view: &ResultView, path: &Path) -> Result<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    std::fs::write(path, render_report(view, &generated_at))
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Save a `data:` reference image to disk; returns false for URLs or missing images
pub fn save_reference_image(view: &ResultView, path: &Path) -> Result<bool> {
    let uri = image_source::resolve(view.result.reference_image.as_deref());
    let Some((mime, bytes)) = image_source::decode_data_uri(&uri) else {
        return Ok(false);
    };
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write reference image to {}", path.display()))?;
    tracing::info!(path = %path.display(), %mime, bytes = bytes.len(), "reference image saved");
    Ok(true)
}
