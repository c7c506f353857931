//! Gắn tương tác cho trang FlowTada trong môi trường WebAssembly: cuộn mượt,
//! hiện dần khi cuộn, menu mobile, modal đăng nhập portal, header đổi kiểu
//! theo độ cuộn và chữ thay thế khi logo lỗi.

#[cfg(target_arch = "wasm32")]
mod controller;
#[cfg(target_arch = "wasm32")]
mod listener;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::controller::{
        dispatch, query_all, report, Controller, SharedController, FADE_IN_SELECTOR,
        VISIBLE_CLASS,
    };
    use crate::listener::Listener;
    use crate::styles;
    use flowtada_core::{
        resolve_anchor, ConfigOverrides, ControllerConfig, ObserverOptions, RevealStrategy,
        UiEvent,
    };
    use js_sys::{Array, Reflect};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        console, Document, Element, Event, EventTarget, IntersectionObserver,
        IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, Node,
        ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
    };

    type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

    /// Mọi thứ đã gắn vào trang; drop là gỡ sạch.
    struct Site {
        generation: u32,
        controller: SharedController,
        listeners: Vec<Listener>,
        observer: Option<(IntersectionObserver, ObserverCallback)>,
        _scroll_tick: Closure<dyn FnMut()>,
    }

    impl Drop for Site {
        fn drop(&mut self) {
            if let Some((observer, _)) = &self.observer {
                observer.disconnect();
            }
            self.listeners.clear();
            match self.controller.try_borrow_mut() {
                Ok(mut controller) => controller.shutdown(),
                Err(_) => console::warn_1(&JsValue::from_str(
                    "flowtada: controller đang bận khi gỡ, bỏ qua shutdown",
                )),
            }
        }
    }

    thread_local! {
        static ACTIVE_SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
        static NEXT_GENERATION: Cell<u32> = const { Cell::new(0) };
    }

    fn active_controller() -> Option<SharedController> {
        ACTIVE_SITE.with(|site| site.borrow().as_ref().map(|site| site.controller.clone()))
    }

    /// Tay cầm trả về cho JavaScript để gỡ các binding.
    #[wasm_bindgen]
    pub struct SiteHandle {
        generation: u32,
    }

    #[wasm_bindgen]
    impl SiteHandle {
        /// Gỡ listener, ngắt observer và hủy timer. Gọi lại nhiều lần vẫn an toàn.
        pub fn dispose(&self) {
            let removed = ACTIVE_SITE.with(|slot| {
                let mut slot = slot.borrow_mut();
                let current = slot
                    .as_ref()
                    .is_some_and(|site| site.generation == self.generation);
                if current {
                    slot.take()
                } else {
                    None
                }
            });
            drop(removed);
        }
    }

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

    #[wasm_bindgen(js_name = mountSiteInteractions)]
    pub fn mount_site_interactions(config: Option<JsValue>) -> Result<SiteHandle, JsValue> {
        console_error_panic_hook::set_once();

        let config = read_config(config)?;
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        if let Err(err) = styles::ensure_styles(&document) {
            console::error_1(&err);
        }

        // Lần mount mới thay thế lần trước.
        let previous = ACTIVE_SITE.with(|slot| slot.borrow_mut().take());
        drop(previous);

        let observer_available =
            Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
        let strategy = RevealStrategy::select(observer_available);
        let observer_options = config.observer_options();
        let controller = Controller::new(config, window.clone(), document.clone(), strategy);

        let scroll_tick = {
            let weak = Rc::downgrade(&controller);
            Closure::<dyn FnMut()>::new(move || {
                if let Some(controller) = weak.upgrade() {
                    run_scroll_tick(&controller);
                }
            })
        };
        controller
            .borrow_mut()
            .set_scroll_tick(scroll_tick.as_ref().unchecked_ref::<js_sys::Function>().clone());

        let mut listeners = Vec::new();
        bind_anchors(&document, &mut listeners)?;
        bind_menu(&document, &controller, &mut listeners)?;
        bind_keyboard(&document, &controller, &mut listeners)?;
        bind_modal(&document, &controller, &mut listeners)?;
        bind_scroll(&window, &controller, &mut listeners)?;
        bind_logo_fallback(&document, &controller, &mut listeners)?;
        bind_login_form(&document, &controller, &mut listeners)?;

        let observer = match strategy {
            RevealStrategy::Observer => Some(observe_fade_ins(&document, &observer_options)?),
            RevealStrategy::Poll => {
                controller.borrow().reveal_pass();
                let weak = Rc::downgrade(&controller);
                listeners.push(Listener::attach(&window, "load", move |_| {
                    if let Some(controller) = weak.upgrade() {
                        controller.borrow().reveal_pass();
                    }
                })?);
                None
            }
        };

        let generation = NEXT_GENERATION.with(|next| {
            let value = next.get();
            next.set(value.wrapping_add(1));
            value
        });
        ACTIVE_SITE.with(|slot| {
            *slot.borrow_mut() = Some(Site {
                generation,
                controller,
                listeners,
                observer,
                _scroll_tick: scroll_tick,
            });
        });

        Ok(SiteHandle { generation })
    }

    #[wasm_bindgen(js_name = openPortal)]
    pub fn open_portal() {
        if let Some(controller) = active_controller() {
            dispatch(&controller, UiEvent::PortalOpened);
        }
    }

    #[wasm_bindgen(js_name = closePortal)]
    pub fn close_portal() {
        if let Some(controller) = active_controller() {
            dispatch(&controller, UiEvent::PortalClosed);
        }
    }

    /// Handler cho `onsubmit` của form đăng nhập portal.
    #[wasm_bindgen(js_name = handlePortalLogin)]
    pub fn handle_portal_login(event: Event) {
        event.prevent_default();
        if let Some(controller) = active_controller() {
            submit_login(&controller, &event);
        }
    }

    fn submit_login(controller: &SharedController, event: &Event) {
        let credentials = {
            let Ok(mut inner) = controller.try_borrow_mut() else {
                return;
            };
            inner.remember_submit_target(
                event.target().and_then(|target| target.dyn_into::<Element>().ok()),
            );
            inner.credentials()
        };
        if let Some((email, password)) = credentials {
            dispatch(controller, UiEvent::LoginSubmitted { email, password });
        }
    }

    fn run_scroll_tick(controller: &SharedController) {
        let tick = {
            let Ok(mut inner) = controller.try_borrow_mut() else {
                return;
            };
            inner.take_scroll_tick().map(|offset| (offset, inner.strategy()))
        };
        let Some((offset_y, strategy)) = tick else {
            return;
        };
        dispatch(controller, UiEvent::Scrolled { offset_y });
        if strategy == RevealStrategy::Poll {
            controller.borrow().reveal_pass();
        }
    }

    fn skip(binding: &str) {
        console::debug_1(&JsValue::from_str(&format!(
            "flowtada: không tìm thấy phần tử cho {binding}, bỏ qua"
        )));
    }

    fn bind_anchors(document: &Document, listeners: &mut Vec<Listener>) -> Result<(), JsValue> {
        for anchor in query_all(document, "a[href^=\"#\"]")? {
            let document = document.clone();
            let link = anchor.clone();
            listeners.push(Listener::attach(&anchor, "click", move |event| {
                event.prevent_default();
                let Some(href) = link.get_attribute("href") else {
                    return;
                };
                // Selector sai cú pháp hoặc không khớp: bỏ qua im lặng.
                let target =
                    resolve_anchor(&href, |selector| document.query_selector(selector).ok().flatten());
                if let Some(target) = target {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                }
            })?);
        }
        Ok(())
    }

    fn bind_menu(
        document: &Document,
        controller: &SharedController,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        match document.query_selector(".hamburger")? {
            Some(hamburger) => {
                let weak = Rc::downgrade(controller);
                listeners.push(Listener::attach(&hamburger, "click", move |_| {
                    if let Some(controller) = weak.upgrade() {
                        dispatch(&controller, UiEvent::HamburgerClicked);
                    }
                })?);
            }
            None => skip(".hamburger"),
        }

        match document.query_selector("nav")? {
            Some(nav) => {
                let weak = Rc::downgrade(controller);
                listeners.push(Listener::attach(document, "click", move |event| {
                    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                    let inside_nav = nav.contains(target.as_ref());
                    if let Some(controller) = weak.upgrade() {
                        dispatch(&controller, UiEvent::DocumentClicked { inside_nav });
                    }
                })?);
            }
            None => skip("nav"),
        }
        Ok(())
    }

    fn bind_keyboard(
        document: &Document,
        controller: &SharedController,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let weak = Rc::downgrade(controller);
        listeners.push(Listener::attach(document, "keydown", move |event| {
            let Ok(event) = event.dyn_into::<KeyboardEvent>() else {
                return;
            };
            if let Some(controller) = weak.upgrade() {
                dispatch(&controller, UiEvent::KeyPressed { key: event.key() });
            }
        })?);
        Ok(())
    }

    fn bind_modal(
        document: &Document,
        controller: &SharedController,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let Some(modal) = document.get_element_by_id("portalModal") else {
            skip("#portalModal");
            return Ok(());
        };
        let weak = Rc::downgrade(controller);
        let backdrop: Node = modal.clone().into();
        listeners.push(Listener::attach(&modal, "click", move |event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let on_backdrop = backdrop.is_same_node(target.as_ref());
            if let Some(controller) = weak.upgrade() {
                dispatch(&controller, UiEvent::ModalClicked { on_backdrop });
            }
        })?);
        Ok(())
    }

    fn bind_scroll(
        window: &Window,
        controller: &SharedController,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let weak = Rc::downgrade(controller);
        listeners.push(Listener::attach(window, "scroll", move |_| {
            if let Some(controller) = weak.upgrade() {
                if let Ok(mut inner) = controller.try_borrow_mut() {
                    inner.schedule_scroll_tick();
                }
            }
        })?);
        Ok(())
    }

    fn bind_logo_fallback(
        document: &Document,
        controller: &SharedController,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let Some(logo) = document.query_selector(".logo-img")? else {
            skip(".logo-img");
            return Ok(());
        };
        let wordmark = controller.borrow().config().wordmark.clone();
        let document = document.clone();
        listeners.push(Listener::attach(&logo, "error", move |_| {
            report(replace_with_wordmark(&document, &wordmark));
        })?);
        Ok(())
    }

    fn replace_with_wordmark(document: &Document, wordmark: &str) -> Result<(), JsValue> {
        let Some(container) = document.query_selector(".logo-container")? else {
            return Ok(());
        };
        let logo = document.create_element("div")?;
        logo.set_class_name("logo");
        logo.set_text_content(Some(wordmark));
        container.set_text_content(None);
        container.append_child(&logo)?;
        Ok(())
    }

    fn bind_login_form(
        document: &Document,
        controller: &SharedController,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let Some(selector) = controller.borrow().config().login_form_selector.clone() else {
            return Ok(());
        };
        let Some(form) = document.query_selector(&selector)? else {
            skip(&selector);
            return Ok(());
        };
        let weak = Rc::downgrade(controller);
        let target: &EventTarget = &form;
        listeners.push(Listener::attach(target, "submit", move |event| {
            event.prevent_default();
            if let Some(controller) = weak.upgrade() {
                submit_login(&controller, &event);
            }
        })?);
        Ok(())
    }

    fn observe_fade_ins(
        document: &Document,
        options: &ObserverOptions,
    ) -> Result<(IntersectionObserver, ObserverCallback), JsValue> {
        let callback: ObserverCallback = Closure::new(
            |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        report(target.class_list().add_1(VISIBLE_CLASS));
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        for element in query_all(document, FADE_IN_SELECTOR)? {
            observer.observe(&element);
        }
        Ok((observer, callback))
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{
    close_portal, handle_portal_login, mount_site_interactions, open_portal, SiteHandle,
};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_site_interactions(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "flowtada-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
