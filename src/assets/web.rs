//! DOM asset loading
//!
//! Starts browser loads and reports each outcome once through a completion
//! callback. Listeners may fire more than once (media elements re-raise
//! `canplaythrough` after seeking); the cache drops the repeats.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, EventTarget, HtmlImageElement, HtmlMediaElement, HtmlVideoElement};

use super::ReadinessHandle;
use crate::error::FeedbackError;

/// Receives the outcome of a load
pub type Completion = Rc<dyn Fn(ReadinessHandle, Result<(), FeedbackError>)>;

/// Start loading an image
pub fn load_image(handle: ReadinessHandle, path: &str, done: Completion) -> Result<HtmlImageElement, FeedbackError> {
    let image = HtmlImageElement::new().map_err(|e| FeedbackError::asset(path, format!("{:?}", e)))?;
    watch(&image, "load", "error", handle, path, done);
    image.set_src(path);
    Ok(image)
}

/// Start loading a muted, looping background video
pub fn load_video(
    document: &Document,
    handle: ReadinessHandle,
    path: &str,
    done: Completion,
) -> Result<HtmlVideoElement, FeedbackError> {
    let video = document
        .create_element("video")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
        .ok_or_else(|| FeedbackError::asset(path, "cannot create video element"))?;
    video.set_muted(true);
    video.set_loop(true);
    video.set_autoplay(true);
    let _ = video.set_attribute("playsinline", "");
    watch_media(&video, handle, path, done);
    video.set_src(path);
    Ok(video)
}

/// Track readiness of an existing audio/video element
pub fn watch_media(element: &HtmlMediaElement, handle: ReadinessHandle, path: &str, done: Completion) {
    watch(element, "canplaythrough", "error", handle, path, done);
}

fn watch(target: &EventTarget, ready: &str, failed: &str, handle: ReadinessHandle, path: &str, done: Completion) {
    {
        let done = done.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            done(handle, Ok(()));
        });
        let _ = target.add_event_listener_with_callback(ready, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let path = path.to_string();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            done(handle, Err(FeedbackError::asset(path.as_str(), "failed to load")));
        });
        let _ = target.add_event_listener_with_callback(failed, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
