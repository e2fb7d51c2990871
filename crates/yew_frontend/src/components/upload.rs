//! Step 1: pick or drop a leaf photo

use web_sys::{DragEvent, Event, File, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct UploadProps {
    /// Object URL of the held image
    pub preview: Option<AttrValue>,
    pub file_name: Option<AttrValue>,
    pub on_file: Callback<File>,
    pub on_clear: Callback<()>,
    pub on_next: Callback<()>,
}

pub fn drop_zone_class(dragging: bool) -> &'static str {
    if dragging {
        "drop-zone dragover"
    } else {
        "drop-zone"
    }
}

#[function_component(UploadStep)]
pub fn upload_step(props: &UploadProps) -> Html {
    let dragging = use_state(|| false);

    let on_file_change = {
        let on_file = props.on_file.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                on_file.emit(file);
            }
            // Allow picking the same file again after a clear
            input.set_value("");
        })
    };

    let on_drop = {
        let on_file = props.on_file.clone();
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(false);
            let file = e
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                on_file.emit(file);
            }
        })
    };

    let on_drag_over = {
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(true);
        })
    };

    let on_drag_leave = {
        let dragging = dragging.clone();
        Callback::from(move |_: DragEvent| dragging.set(false))
    };

    html! {
        <div class="upload-step" data-testid="step-upload">
            <h2>{ "Upload a Leaf Photo" }</h2>
            <div
                class={drop_zone_class(*dragging)}
                ondrop={on_drop}
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
            >
                if let Some(preview) = &props.preview {
                    <img src={preview.clone()} alt="Selected leaf" data-testid="preview-image" />
                    if let Some(name) = &props.file_name {
                        <p class="file-name">{ name.clone() }</p>
                    }
                    <button
                        class="secondary"
                        onclick={props.on_clear.reform(|_| ())}
                        data-testid="clear-button"
                    >
                        { "Remove" }
                    </button>
                } else {
                    <p>{ "Drag & drop an image here, or choose a file" }</p>
                    <input
                        type="file"
                        accept="image/*"
                        onchange={on_file_change}
                        data-testid="file-input"
                    />
                }
            </div>
            <div class="step-actions">
                <button
                    disabled={props.preview.is_none()}
                    onclick={props.on_next.reform(|_| ())}
                    data-testid="next-button"
                >
                    { "Next" }
                </button>
            </div>
        </div>
    }
}
