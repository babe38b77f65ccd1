//! Thin wrappers over the browser APIs the app touches.

use dreamspace_core::theme::{Theme, THEME_STORAGE_KEY};
use dreamspace_core::DownloadableImage;
use leptos::logging::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Theme saved in local storage, else the system color scheme
pub fn initial_theme() -> Theme {
    let Some(window) = web_sys::window() else {
        return Theme::Light;
    };
    let saved = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten());
    let prefers_dark = window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false);

    Theme::resolve(saved.as_deref(), prefers_dark)
}

/// Toggle the `dark` class on the root element and persist the choice
pub fn apply_theme(theme: Theme) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(root) = window.document().and_then(|doc| doc.document_element()) {
        let result = if theme.is_dark() {
            root.class_list().add_1("dark")
        } else {
            root.class_list().remove_1("dark")
        };
        if let Err(e) = result {
            warn!("Failed to update theme class: {:?}", e);
        }
    }
    if let Some(storage) = window.local_storage().ok().flatten() {
        if let Err(e) = storage.set_item(THEME_STORAGE_KEY, theme.as_str()) {
            warn!("Failed to persist theme: {:?}", e);
        }
    }
}

/// Read `file` as a data URI and hand it to `on_load`
pub fn read_as_data_url(file: web_sys::File, on_load: impl FnOnce(String) + 'static) {
    let reader = match web_sys::FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            error!("Failed to create FileReader: {:?}", e);
            return;
        }
    };
    let reader_clone = reader.clone();
    let mut on_load = Some(on_load);

    let onload = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(data_url) = reader_clone.result().ok().and_then(|result| result.as_string()) {
            if let Some(callback) = on_load.take() {
                callback(data_url);
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();
    if let Err(e) = reader.read_as_data_url(&file) {
        error!("Failed to read {}: {:?}", file.name(), e);
    }
}

/// Save the image through a temporary `<a download>` element
pub fn save_image(download: &DownloadableImage) {
    if let Err(e) = try_save_image(download) {
        error!("Download failed: {:?}", e);
    }
}

fn try_save_image(download: &DownloadableImage) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let link = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    link.set_href(download.image.as_str());
    link.set_download(&download.filename);

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Ok(())
}
