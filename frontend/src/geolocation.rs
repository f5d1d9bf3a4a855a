use std::{cell::RefCell, rc::Rc};

use futures::channel::oneshot;
use gloo_utils::window;
use thiserror::Error;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::js_sys::{Function, Reflect};
use workout_lib::workout::Coords;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("position unavailable: {0}")]
    Denied(String),

    #[error("position has no coordinates")]
    MissingCoordinates,
}

type Sender = Rc<RefCell<Option<oneshot::Sender<Result<Coords, GeolocationError>>>>>;

/// One-shot position request. Resolves once the browser answers, which may be
/// never if the user ignores the permission prompt.
pub async fn current_position() -> Result<Coords, GeolocationError> {
    let geolocation = window().navigator().geolocation().map_err(|_| GeolocationError::Unsupported)?;

    let (tx, rx) = oneshot::channel();
    let tx: Sender = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::once_into_js(move |position: JsValue| send(&tx, read_coords(&position)))
    };
    let on_error = {
        let tx = tx.clone();
        Closure::once_into_js(move |err: JsValue| {
            let message = Reflect::get(&err, &"message".into())
                .ok()
                .and_then(|m| m.as_string())
                .unwrap_or_default();
            send(&tx, Err(GeolocationError::Denied(message)))
        })
    };

    geolocation
        .get_current_position_with_error_callback(on_success.unchecked_ref::<Function>(), Some(on_error.unchecked_ref::<Function>()))
        .map_err(|_| GeolocationError::Unsupported)?;

    rx.await.unwrap_or(Err(GeolocationError::Unsupported))
}

fn send(tx: &Sender, result: Result<Coords, GeolocationError>) {
    if let Some(tx) = tx.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

fn read_coords(position: &JsValue) -> Result<Coords, GeolocationError> {
    let coords = Reflect::get(position, &"coords".into()).map_err(|_| GeolocationError::MissingCoordinates)?;
    let field = |name: &str| {
        Reflect::get(&coords, &name.into())
            .ok()
            .and_then(|v| v.as_f64())
            .ok_or(GeolocationError::MissingCoordinates)
    };

    Ok(Coords(field("latitude")?, field("longitude")?))
}
