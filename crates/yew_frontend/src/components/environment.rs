//! Step 2: optional field conditions, then submit

use diagnosis_core::form::input_value;
use diagnosis_core::{EnvField, EnvironmentRecord, SoilStatus, Weather};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EnvironmentProps {
    pub environment: EnvironmentRecord,
    pub loading: bool,
    pub can_submit: bool,
    pub on_field: Callback<(EnvField, String)>,
    pub on_soil: Callback<SoilStatus>,
    pub on_weather: Callback<Weather>,
    pub on_back: Callback<()>,
    pub on_submit: Callback<()>,
}

pub fn choice_class(selected: bool) -> &'static str {
    if selected {
        "choice selected"
    } else {
        "choice"
    }
}

pub fn submit_label(loading: bool) -> &'static str {
    if loading {
        "Analyzing..."
    } else {
        "Get Diagnosis"
    }
}

fn text_input(field: EnvField, on_field: &Callback<(EnvField, String)>) -> Callback<InputEvent> {
    on_field.reform(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        (field, input.value())
    })
}

#[function_component(EnvironmentStep)]
pub fn environment_step(props: &EnvironmentProps) -> Html {
    let env = &props.environment;

    let soil_buttons = SoilStatus::KNOWN.iter().map(|soil| {
        let selected = env.soil_status.as_ref() == Some(soil);
        let onclick = {
            let soil = soil.clone();
            props.on_soil.reform(move |_| soil.clone())
        };
        html! {
            <button type="button" class={choice_class(selected)} {onclick}>
                { soil.label() }
            </button>
        }
    });

    let weather_buttons = Weather::KNOWN.iter().map(|weather| {
        let selected = env.weather.as_ref() == Some(weather);
        let onclick = {
            let weather = weather.clone();
            props.on_weather.reform(move |_| weather.clone())
        };
        html! {
            <button type="button" class={choice_class(selected)} {onclick}>
                <span class="icon">{ weather.icon() }</span>
                { weather.label() }
            </button>
        }
    });

    html! {
        <div class="environment-step" data-testid="step-environment">
            <h2>{ "Environmental Details (optional)" }</h2>

            <label>
                { "Location" }
                <input
                    type="text"
                    placeholder="e.g. Nagpur, Maharashtra"
                    value={input_value(env, EnvField::Location)}
                    oninput={text_input(EnvField::Location, &props.on_field)}
                />
            </label>
            <label>
                { "Temperature (°C)" }
                <input
                    type="number"
                    step="0.1"
                    value={input_value(env, EnvField::Temp)}
                    oninput={text_input(EnvField::Temp, &props.on_field)}
                />
            </label>
            <label>
                { "Humidity (%)" }
                <input
                    type="number"
                    step="0.1"
                    min="0"
                    max="100"
                    value={input_value(env, EnvField::Humidity)}
                    oninput={text_input(EnvField::Humidity, &props.on_field)}
                />
            </label>

            <h3>{ "Soil Status" }</h3>
            <div class="choices">{ for soil_buttons }</div>

            <h3>{ "Weather" }</h3>
            <div class="choices">{ for weather_buttons }</div>

            <div class="step-actions">
                <button
                    class="secondary"
                    onclick={props.on_back.reform(|_| ())}
                    data-testid="back-button"
                >
                    { "Back" }
                </button>
                <button
                    disabled={!props.can_submit}
                    onclick={props.on_submit.reform(|_| ())}
                    data-testid="submit-button"
                >
                    { submit_label(props.loading) }
                </button>
            </div>
        </div>
    }
}
