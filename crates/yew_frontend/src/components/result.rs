//! Result mode: prediction, treatment, reference image, environment echo

use diagnosis_core::echo::{
    confidence_bar_width, confidence_percent, environment_summary, severity_tone,
};
use diagnosis_core::{image_source, markdown, ResultView};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ResultProps {
    pub view: ResultView,
    pub on_new: Callback<()>,
}

pub fn confidence_style(confidence: f64) -> String {
    format!("width: {}%", confidence_bar_width(confidence))
}

#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultProps) -> Html {
    let result = &props.view.result;
    let prediction = &result.prediction;
    let tone = severity_tone(&prediction.severity);

    let remedy_html = use_memo(result.remedy_markdown.clone(), |remedy| {
        AttrValue::from(markdown::render(Some(remedy.as_str())))
    });
    let reference = use_memo(result.reference_image.clone(), |image| {
        AttrValue::from(image_source::resolve(image.as_deref()))
    });
    let remedy = Html::from_html_unchecked((*remedy_html).clone());

    html! {
        <div class="result-panel" data-testid="result">
            <h2>{ "Diagnosis Results" }</h2>
            if result.is_fallback() {
                <p class="fallback-notice" data-testid="fallback-notice">
                    { "Showing demonstration data because the request failed." }
                </p>
            }

            <div class="prediction">
                <h3 data-testid="disease">{ &prediction.disease }</h3>
                <span class={classes!("severity", tone.css_class())}>
                    { prediction.severity.as_str() }
                </span>
                <p>{ "Confidence: " }{ confidence_percent(prediction.confidence) }</p>
                <div class="confidence-bar">
                    <div style={confidence_style(prediction.confidence)}></div>
                </div>
            </div>

            <div class="remedy" data-testid="remedy">
                <h3>{ "Recommended Treatment" }</h3>
                { remedy }
            </div>

            <div class="reference">
                <h3>{ "Reference Image" }</h3>
                <img src={(*reference).clone()} alt="Reference image" />
            </div>

            <div class="environment-echo">
                <h3>{ "Environmental Details Provided" }</h3>
                <dl>
                    { for environment_summary(&props.view.environment).into_iter().map(|row| html! {
                        <>
                            <dt>{ row.label }</dt>
                            <dd>{ row.value }</dd>
                        </>
                    })}
                </dl>
            </div>

            <div class="step-actions">
                <button onclick={props.on_new.reform(|_| ())} data-testid="new-diagnosis-button">
                    { "New Diagnosis" }
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_style_is_clamped() {
        assert_eq!(confidence_style(0.5), "width: 50%");
        assert_eq!(confidence_style(1.7), "width: 100%");
    }
}
