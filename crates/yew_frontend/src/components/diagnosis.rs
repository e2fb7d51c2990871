//! The three-step diagnosis page

use crate::browser::{self, BrowserPreviews};
use crate::components::environment::EnvironmentStep;
use crate::components::result::ResultPanel;
use crate::components::upload::UploadStep;
use diagnosis_core::{CoreError, DiagnosisPage, EnvField, PageView, SoilStatus, Step, Weather};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::File;
use yew::prelude::*;

type SharedPage = Rc<RefCell<DiagnosisPage<BrowserPreviews>>>;

/// CSS class of one entry in the progress header
pub fn step_class(step: Step, current: Step) -> &'static str {
    if step == current {
        "step active"
    } else if step.number() < current.number() {
        "step done"
    } else {
        "step"
    }
}

#[function_component(StepIndicator)]
fn step_indicator(props: &StepIndicatorProps) -> Html {
    let steps = [
        (Step::Upload, "Upload"),
        (Step::Environment, "Environment"),
        (Step::Result, "Result"),
    ];
    html! {
        <ol class="steps">
            { for steps.iter().map(|(step, label)| html! {
                <li class={step_class(*step, props.current)}>
                    <span class="step-number">{ step.number().to_string() }</span>
                    { *label }
                </li>
            })}
        </ol>
    }
}

#[derive(Properties, PartialEq)]
struct StepIndicatorProps {
    current: Step,
}

fn submit(page: SharedPage, refresh: UseForceUpdateHandle) {
    let request = match page.borrow_mut().begin_submission() {
        Ok(request) => request,
        Err(err) => {
            browser::alert(&err.to_string());
            return;
        }
    };
    refresh.force_update();

    spawn_local(async move {
        let outcome = browser::post_diagnosis(&request).await;
        let completed = page.borrow_mut().complete_submission(request.ticket, outcome);
        match completed {
            Ok(effects) => {
                if let Some(alert) = effects.alert {
                    browser::alert(&alert);
                }
                if effects.scroll_to_top {
                    browser::scroll_to_top();
                }
            }
            // Navigated away or unmounted while waiting
            Err(CoreError::StaleSubmission) => {}
            Err(err) => gloo::console::warn!(err.to_string()),
        }
        refresh.force_update();
    });
}

#[function_component(DiagnosisWizard)]
pub fn diagnosis_wizard() -> Html {
    let page: SharedPage = use_mut_ref(|| DiagnosisPage::new(BrowserPreviews));
    let refresh = use_force_update();

    {
        let page = page.clone();
        use_effect_with((), move |_| move || page.borrow_mut().teardown());
    }

    let on_file = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |file: File| {
            let page = page.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match browser::read_image_file(&file).await {
                    Ok(image) => {
                        page.borrow_mut().set_image(image);
                        refresh.force_update();
                    }
                    Err(err) => browser::alert(&format!("Could not read {}: {}", file.name(), err)),
                }
            });
        })
    };

    let on_clear = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            page.borrow_mut().clear_image();
            refresh.force_update();
        })
    };

    let on_next = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            let moved = page.borrow_mut().go_to_environment();
            if let Err(err) = moved {
                browser::alert(&err.to_string());
            }
            refresh.force_update();
        })
    };

    let on_back = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            let moved = page.borrow_mut().back_to_upload();
            if let Err(err) = moved {
                gloo::console::warn!(err.to_string());
            }
            refresh.force_update();
        })
    };

    let on_field = {
        let page = page.clone();
        Callback::from(move |(field, value): (EnvField, String)| {
            let updated = page.borrow_mut().set_field(field, &value);
            if let Err(err) = updated {
                gloo::console::warn!(err.to_string());
            }
        })
    };

    let on_soil = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |soil: SoilStatus| {
            page.borrow_mut().select_soil(soil);
            refresh.force_update();
        })
    };

    let on_weather = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |weather: Weather| {
            page.borrow_mut().select_weather(weather);
            refresh.force_update();
        })
    };

    let on_submit = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| submit(page.clone(), refresh.clone()))
    };

    let on_new = {
        let page = page.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            let reset = page.borrow_mut().new_diagnosis();
            if let Err(err) = reset {
                gloo::console::warn!(err.to_string());
            }
            refresh.force_update();
        })
    };

    let current = page.borrow();
    let body = match current.view() {
        PageView::Input {
            step: Step::Upload,
            image,
            ..
        } => html! {
            <UploadStep
                preview={image.map(|i| AttrValue::from(i.preview.to_string()))}
                file_name={image.map(|i| AttrValue::from(i.file.name.clone()))}
                {on_file}
                {on_clear}
                {on_next}
            />
        },
        PageView::Input {
            environment,
            loading,
            ..
        } => html! {
            <EnvironmentStep
                environment={environment.clone()}
                {loading}
                can_submit={current.can_submit()}
                {on_field}
                {on_soil}
                {on_weather}
                {on_back}
                {on_submit}
            />
        },
        PageView::Result(view) => html! {
            <ResultPanel view={view.clone()} {on_new} />
        },
    };

    html! {
        <div class="diagnosis">
            <StepIndicator current={current.step()} />
            { body }
        </div>
    }
}
