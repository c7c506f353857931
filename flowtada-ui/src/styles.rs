#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-flowtada-ui]";

/// Baseline rules for the reveal and header transitions. Injected ahead of
/// the site's own stylesheets so page rules of equal specificity win.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --flowtada-reveal-distance: 30px;
  --flowtada-reveal-duration: 0.6s;
  --flowtada-header-transition: 0.3s ease;
}

.fade-in {
  opacity: 0;
  transform: translateY(var(--flowtada-reveal-distance));
  transition: opacity var(--flowtada-reveal-duration) ease,
    transform var(--flowtada-reveal-duration) ease;
}

.fade-in.visible {
  opacity: 1;
  transform: translateY(0);
}

header {
  transition: background var(--flowtada-header-transition),
    backdrop-filter var(--flowtada-header-transition),
    box-shadow var(--flowtada-header-transition);
}

@media (prefers-reduced-motion: reduce) {
  .fade-in {
    transition: none;
    transform: none;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-flowtada-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    let first = head.first_child();
    head.insert_before(&style_el.dyn_into::<Node>()?, first.as_ref())?;

    Ok(())
}
