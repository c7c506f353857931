#![cfg(target_arch = "wasm32")]

//! Trạng thái bộ điều khiển phía trình duyệt và bước áp dụng hiệu ứng lên DOM.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use flowtada_core::{
    pending_reveals, ButtonWrite, ControllerConfig, Effect, HeaderVariant, ModalStyleMemory,
    ModalStyleWrite, RevealCandidate, RevealStrategy, SubmitButtonMemory, ThrottleTicket,
    TrailingThrottle, UiEvent, ViewState,
};
use js_sys::Function;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    console, Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, Window,
};

use crate::listener::Timeout;

pub const FADE_IN_SELECTOR: &str = ".fade-in";
pub const VISIBLE_CLASS: &str = "visible";
const MOBILE_MENU_SELECTOR: &str = ".mobile-menu";
const ACTIVE_CLASS: &str = "active";
const MODAL_ID: &str = "portalModal";
const EMAIL_ID: &str = "email";
const PASSWORD_ID: &str = "password";
const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";

pub type SharedController = Rc<RefCell<Controller>>;

pub struct Controller {
    config: ControllerConfig,
    state: ViewState,
    window: Window,
    document: Document,
    strategy: RevealStrategy,
    throttle: TrailingThrottle,
    scroll_ticket: Option<ThrottleTicket>,
    scroll_timer: Option<i32>,
    scroll_tick: Option<Function>,
    submit_target: Option<Element>,
    busy_button: Option<HtmlButtonElement>,
    submit_memory: SubmitButtonMemory,
    login_timer: Option<Timeout>,
    modal_memory: ModalStyleMemory,
    self_ref: Weak<RefCell<Controller>>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        window: Window,
        document: Document,
        strategy: RevealStrategy,
    ) -> SharedController {
        let throttle = TrailingThrottle::new(config.throttle_ms);
        Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                config,
                state: ViewState::default(),
                window,
                document,
                strategy,
                throttle,
                scroll_ticket: None,
                scroll_timer: None,
                scroll_tick: None,
                submit_target: None,
                busy_button: None,
                submit_memory: SubmitButtonMemory::default(),
                login_timer: None,
                modal_memory: ModalStyleMemory::default(),
                self_ref: self_ref.clone(),
            })
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn strategy(&self) -> RevealStrategy {
        self.strategy
    }

    pub fn set_scroll_tick(&mut self, tick: Function) {
        self.scroll_tick = Some(tick);
    }

    /// Dừng mọi timer còn treo; gọi khi gỡ bộ điều khiển.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.scroll_timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        self.throttle.cancel();
        self.scroll_ticket = None;
        self.scroll_tick = None;
        self.login_timer = None;
        self.restore_submit();
    }

    /// Hẹn lại timer throttle cho một sự kiện `scroll`.
    pub fn schedule_scroll_tick(&mut self) {
        if let Some(handle) = self.scroll_timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(tick) = self.scroll_tick.clone() else {
            return;
        };
        let ticket = self.throttle.trigger();
        self.scroll_ticket = Some(ticket);
        let wait = i32::try_from(self.throttle.wait_ms()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&tick, wait)
        {
            Ok(handle) => self.scroll_timer = Some(handle),
            Err(err) => console::error_1(&err),
        }
    }

    /// Timer throttle đã nổ: trả về độ cuộn hiện tại nếu lượt này được chạy.
    pub fn take_scroll_tick(&mut self) -> Option<f64> {
        self.scroll_timer = None;
        let ticket = self.scroll_ticket.take()?;
        if !self.throttle.fire(ticket) {
            return None;
        }
        Some(self.window.scroll_y().unwrap_or(0.0))
    }

    pub fn remember_submit_target(&mut self, target: Option<Element>) {
        self.submit_target = target;
    }

    pub fn credentials(&self) -> Option<(String, String)> {
        let email = self.input(EMAIL_ID)?;
        let password = self.input(PASSWORD_ID)?;
        Some((email.value(), password.value()))
    }

    /// Một lượt quét `.fade-in`: gắn `.visible` cho phần tử đã vào vùng nhìn.
    pub fn reveal_pass(&self) {
        let elements = match query_all(&self.document, FADE_IN_SELECTOR) {
            Ok(elements) => elements,
            Err(err) => {
                console::error_1(&err);
                return;
            }
        };
        let Some(viewport_height) = self.window.inner_height().ok().and_then(|h| h.as_f64()) else {
            return;
        };

        let candidates: Vec<RevealCandidate> = elements
            .iter()
            .map(|element| RevealCandidate {
                top: element.get_bounding_client_rect().top(),
                visible: element.class_list().contains(VISIBLE_CLASS),
            })
            .collect();

        for index in pending_reveals(&candidates, viewport_height, self.config.reveal_offset_px) {
            report(elements[index].class_list().add_1(VISIBLE_CLASS));
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SetMenuOpen { open } => {
                if let Ok(Some(menu)) = self.document.query_selector(MOBILE_MENU_SELECTOR) {
                    report(menu.class_list().toggle_with_force(ACTIVE_CLASS, open).map(|_| ()));
                }
            }
            Effect::SetModalVisible { visible } => self.set_modal_visible(visible),
            Effect::SetHeader { variant } => self.apply_header(variant),
            Effect::Alert { message } => report(self.window.alert_with_message(&message)),
            Effect::SetSubmitBusy { label } => self.mark_submit_busy(&label),
            Effect::RestoreSubmit => self.restore_submit(),
            Effect::ClearCredentials => {
                for id in [EMAIL_ID, PASSWORD_ID] {
                    if let Some(input) = self.input(id) {
                        input.set_value("");
                    }
                }
            }
            Effect::ScheduleLogin { ticket, delay_ms } => {
                let weak = self.self_ref.clone();
                let timer = Timeout::schedule(&self.window, delay_ms, move || {
                    if let Some(controller) = weak.upgrade() {
                        dispatch(&controller, UiEvent::LoginCompleted { ticket });
                    }
                });
                match timer {
                    Ok(timer) => self.login_timer = Some(timer),
                    Err(err) => console::error_1(&err),
                }
            }
            Effect::CancelLogin { .. } => {
                self.login_timer = None;
            }
        }
    }

    fn set_modal_visible(&mut self, visible: bool) {
        let Some(modal) = self.html_element_by_id(MODAL_ID) else {
            return;
        };
        let body = self.document.body();

        let ModalStyleWrite { display, overflow } = if visible {
            self.modal_memory.open(
                modal.style().get_property_value("display").unwrap_or_default(),
                body.as_ref()
                    .and_then(|body| body.style().get_property_value("overflow").ok())
                    .unwrap_or_default(),
            )
        } else {
            self.modal_memory.close()
        };

        report(write_property(&modal, "display", display.as_deref()));
        if let Some(body) = body {
            report(write_property(&body, "overflow", overflow.as_deref()));
        }
    }

    fn apply_header(&self, variant: HeaderVariant) {
        let Some(header) = self
            .document
            .query_selector("header")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let style = variant.style();
        let declaration = header.style();
        report(declaration.set_property("background", style.background));
        report(declaration.set_property("backdrop-filter", style.backdrop_filter));
        report(declaration.set_property("box-shadow", style.box_shadow));
    }

    fn mark_submit_busy(&mut self, label: &str) {
        let button = self
            .submit_target
            .as_ref()
            .and_then(|form| form.query_selector(SUBMIT_SELECTOR).ok().flatten())
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        let Some(button) = button else {
            return;
        };
        let write = self.submit_memory.busy(button.text_content(), label);
        write_button(&button, &write);
        self.busy_button = Some(button);
    }

    fn restore_submit(&mut self) {
        let button = self.busy_button.take();
        if let (Some(button), Some(write)) = (button, self.submit_memory.restore()) {
            write_button(&button, &write);
        }
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    fn html_element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

/// Đưa sự kiện qua hàm chuyển trạng thái rồi áp dụng hiệu ứng.
///
/// Nếu controller đang được mượn (hiệu ứng kích hoạt đồng bộ một sự kiện
/// khác), sự kiện bị bỏ và ghi cảnh báo.
pub fn dispatch(controller: &SharedController, event: UiEvent) {
    let Ok(mut guard) = controller.try_borrow_mut() else {
        console::warn_1(&JsValue::from_str(&format!(
            "flowtada: bỏ qua sự kiện lồng nhau {event:?}"
        )));
        return;
    };
    let inner = &mut *guard;
    let effects = inner.state.apply(event, &inner.config);
    for effect in effects {
        inner.apply_effect(effect);
    }
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// `None` là gỡ thuộc tính inline.
fn write_property(element: &HtmlElement, name: &str, value: Option<&str>) -> Result<(), JsValue> {
    match value {
        Some(value) => element.style().set_property(name, value),
        None => element.style().remove_property(name).map(|_| ()),
    }
}

fn write_button(button: &HtmlButtonElement, write: &ButtonWrite) {
    button.set_text_content(write.label.as_deref());
    button.set_disabled(write.disabled);
}

pub fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        console::error_1(&err);
    }
}
