//! Bridge WASM <-> JavaScript trung lập framework cho logic tương tác.

use flowtada_core::{
    reduce, validate_login, ConfigOverrides, ControllerConfig, HeaderVariant, UiEvent, ViewState,
};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

fn read_config(config: Option<JsValue>) -> Result<ControllerConfig, JsValue> {
    let overrides: Option<ConfigOverrides> = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => Some(
            from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
        ),
        _ => None,
    };
    ControllerConfig::resolve(overrides).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Kiểm tra thông tin đăng nhập; lỗi trả về là thông báo cho người dùng.
#[wasm_bindgen(js_name = validateLogin)]
pub fn validate_login_js(
    email: &str,
    password: &str,
    config: Option<JsValue>,
) -> Result<(), JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    validate_login(email, password, cfg.min_password_len)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Tính trạng thái kế tiếp và hiệu ứng cho một sự kiện, dạng `{ state, effects }`.
#[wasm_bindgen(js_name = nextViewState)]
pub fn next_view_state(
    state: JsValue,
    event: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let state: ViewState = if state.is_undefined() || state.is_null() {
        ViewState::default()
    } else {
        from_value(state)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được state: {err}")))?
    };
    let event: UiEvent = from_value(event)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được sự kiện: {err}")))?;
    let cfg = read_config(config)?;

    let transition = reduce(&state, event, &cfg);
    to_value(&transition)
        .map_err(|err| JsValue::from_str(&format!("Không serialize transition: {err}")))
}

/// Style inline của header tương ứng với độ cuộn dọc.
#[wasm_bindgen(js_name = headerStyleFor)]
pub fn header_style_for(offset_y: f64, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    let cfg = read_config(config)?;
    let style = HeaderVariant::for_offset(offset_y, cfg.header_threshold_px).style();
    to_value(&style).map_err(|err| JsValue::from_str(&format!("Không serialize style: {err}")))
}
