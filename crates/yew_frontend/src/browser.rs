//! Browser glue: object URLs, file reading, the `/diagnose` POST

use diagnosis_core::submission::{DIAGNOSE_PATH, ENV_PART, IMAGE_PART};
use diagnosis_core::{ImageFile, PreviewRef, PreviewUrls, RawReply, SubmissionError, SubmissionRequest};
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, FormData, ScrollBehavior, ScrollToOptions, Url};

/// Backend the page talks to
pub const BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Object URLs via `URL.createObjectURL` / `URL.revokeObjectURL`
#[derive(Debug, Default)]
pub struct BrowserPreviews;

impl PreviewUrls for BrowserPreviews {
    fn create(&mut self, file: &ImageFile) -> PreviewRef {
        let url = bytes_to_blob(&file.bytes, &file.content_type())
            .and_then(|blob| Url::create_object_url_with_blob(&blob));
        match url {
            Ok(url) => PreviewRef::new(url),
            Err(err) => {
                gloo::console::warn!("could not create preview URL", err);
                PreviewRef::new("")
            }
        }
    }

    fn revoke(&mut self, preview: &PreviewRef) {
        if preview.as_str().is_empty() {
            return;
        }
        if let Err(err) = Url::revoke_object_url(preview.as_str()) {
            gloo::console::warn!("could not revoke preview URL", err);
        }
    }
}

fn bytes_to_blob(bytes: &[u8], mime: &str) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Read a picked or dropped file into memory
pub async fn read_image_file(file: &File) -> Result<ImageFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(js_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let image = ImageFile::new(file.name(), bytes);
    let mime = file.type_();
    Ok(if mime.is_empty() {
        image
    } else {
        image.with_mime_type(mime)
    })
}

/// POST the image and `env_data` as multipart form data
pub async fn post_diagnosis(request: &SubmissionRequest) -> Result<RawReply, SubmissionError> {
    let transport = |err: JsValue| SubmissionError::Transport(js_error(err));

    let blob = bytes_to_blob(&request.image.bytes, &request.image.content_type()).map_err(transport)?;
    let form = FormData::new().map_err(transport)?;
    form.append_with_blob_and_filename(IMAGE_PART, &blob, &request.image.name)
        .map_err(transport)?;
    form.append_with_str(ENV_PART, &request.env_json())
        .map_err(transport)?;

    let url = format!("{}{}", BACKEND_URL, DIAGNOSE_PATH);
    let response = Request::post(&url)
        .body(form)
        .map_err(|e| SubmissionError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| SubmissionError::Transport(e.to_string()))?;

    let status = response.status();
    let status_text = response.status_text();
    let body = response
        .text()
        .await
        .map_err(|e| SubmissionError::Transport(e.to_string()))?;

    Ok(RawReply {
        status,
        reason: (!status_text.is_empty()).then_some(status_text),
        body,
    })
}

pub fn alert(message: &str) {
    gloo::dialogs::alert(message);
}

pub fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}
