//! Quyết định ghi/khôi phục giá trị trên DOM, tách khỏi lời gọi web-sys để
//! kiểm thử được ngoài trình duyệt.

use crate::anchor_selector;

pub const MODAL_OPEN_DISPLAY: &str = "flex";
pub const MODAL_CLOSED_DISPLAY: &str = "none";
pub const BODY_LOCKED_OVERFLOW: &str = "hidden";
pub const BODY_UNLOCKED_OVERFLOW: &str = "auto";

/// Giá trị inline cần ghi lại khi khôi phục. `None` nghĩa là gỡ thuộc tính.
///
/// Chuỗi rỗng đã lưu tức là trước đó không có inline style, nên gỡ đi; chưa
/// lưu gì thì dùng `fallback`.
pub fn restore_value<'a>(saved: Option<&'a str>, fallback: &'a str) -> Option<&'a str> {
    match saved {
        Some("") => None,
        Some(value) => Some(value),
        None => Some(fallback),
    }
}

/// Các thuộc tính inline của modal và `body` cần ghi cho một lần mở/đóng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalStyleWrite {
    pub display: Option<String>,
    pub overflow: Option<String>,
}

#[derive(Debug, Clone)]
struct SavedModalStyle {
    display: String,
    overflow: String,
}

/// Nhớ `display` của modal và `overflow` của `body` trước khi mở.
#[derive(Debug, Clone, Default)]
pub struct ModalStyleMemory {
    saved: Option<SavedModalStyle>,
}

impl ModalStyleMemory {
    /// Lưu giá trị hiện tại rồi trả về giá trị khi mở.
    pub fn open(
        &mut self,
        current_display: String,
        current_overflow: String,
    ) -> ModalStyleWrite {
        self.saved = Some(SavedModalStyle {
            display: current_display,
            overflow: current_overflow,
        });
        ModalStyleWrite {
            display: Some(MODAL_OPEN_DISPLAY.to_string()),
            overflow: Some(BODY_LOCKED_OVERFLOW.to_string()),
        }
    }

    pub fn close(&mut self) -> ModalStyleWrite {
        let saved = self.saved.take();
        ModalStyleWrite {
            display: restore_value(
                saved.as_ref().map(|s| s.display.as_str()),
                MODAL_CLOSED_DISPLAY,
            )
            .map(str::to_string),
            overflow: restore_value(
                saved.as_ref().map(|s| s.overflow.as_str()),
                BODY_UNLOCKED_OVERFLOW,
            )
            .map(str::to_string),
        }
    }
}

/// Nhãn và trạng thái `disabled` cần gán cho nút submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonWrite {
    pub label: Option<String>,
    pub disabled: bool,
}

/// Nhớ nhãn gốc của nút submit trong lúc đăng nhập giả lập.
#[derive(Debug, Clone, Default)]
pub struct SubmitButtonMemory {
    original_label: Option<Option<String>>,
}

impl SubmitButtonMemory {
    /// Chuyển sang trạng thái bận. Nếu đã bận, giữ nhãn gốc lần đầu.
    pub fn busy(&mut self, current_label: Option<String>, busy_label: &str) -> ButtonWrite {
        if self.original_label.is_none() {
            self.original_label = Some(current_label);
        }
        ButtonWrite {
            label: Some(busy_label.to_string()),
            disabled: true,
        }
    }

    /// `None` khi nút không ở trạng thái bận.
    pub fn restore(&mut self) -> Option<ButtonWrite> {
        self.original_label.take().map(|label| ButtonWrite {
            label,
            disabled: false,
        })
    }
}

/// Tìm phần tử đích của anchor nội trang qua `lookup` (thường là
/// `querySelector`). `lookup` chỉ được gọi khi `href` là fragment.
pub fn resolve_anchor<T, F>(href: &str, lookup: F) -> Option<T>
where
    F: FnOnce(&str) -> Option<T>,
{
    anchor_selector(href).and_then(lookup)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn restore_value_rules() {
        assert_eq!(restore_value(Some(""), "none"), None);
        assert_eq!(restore_value(Some("block"), "none"), Some("block"));
        assert_eq!(restore_value(None, "none"), Some("none"));
    }

    #[test]
    fn modal_round_trip_restores_original_inline_values() {
        let mut memory = ModalStyleMemory::default();
        let opened = memory.open("block".to_string(), "scroll".to_string());
        assert_eq!(
            opened,
            ModalStyleWrite {
                display: Some("flex".to_string()),
                overflow: Some("hidden".to_string()),
            }
        );
        assert_eq!(
            memory.close(),
            ModalStyleWrite {
                display: Some("block".to_string()),
                overflow: Some("scroll".to_string()),
            }
        );
    }

    #[test]
    fn modal_round_trip_removes_absent_inline_values() {
        let mut memory = ModalStyleMemory::default();
        memory.open(String::new(), String::new());
        assert_eq!(
            memory.close(),
            ModalStyleWrite {
                display: None,
                overflow: None,
            }
        );
    }

    #[test]
    fn close_without_open_uses_fallbacks() {
        let mut memory = ModalStyleMemory::default();
        assert_eq!(
            memory.close(),
            ModalStyleWrite {
                display: Some("none".to_string()),
                overflow: Some("auto".to_string()),
            }
        );
        // Lần mở trước chỉ được dùng một lần.
        memory.open("grid".to_string(), String::new());
        memory.close();
        assert_eq!(memory.close().display.as_deref(), Some("none"));
    }

    #[test]
    fn submit_busy_then_restore() {
        let mut memory = SubmitButtonMemory::default();
        let busy = memory.busy(Some("Sign In".to_string()), "Signing In...");
        assert_eq!(
            busy,
            ButtonWrite {
                label: Some("Signing In...".to_string()),
                disabled: true,
            }
        );

        assert_eq!(
            memory.restore(),
            Some(ButtonWrite {
                label: Some("Sign In".to_string()),
                disabled: false,
            })
        );
        assert_eq!(memory.restore(), None);
    }

    #[test]
    fn repeated_busy_keeps_first_label() {
        let mut memory = SubmitButtonMemory::default();
        memory.busy(Some("Sign In".to_string()), "Signing In...");
        memory.busy(Some("Signing In...".to_string()), "Signing In...");
        assert_eq!(
            memory.restore().and_then(|write| write.label).as_deref(),
            Some("Sign In")
        );
    }

    #[test]
    fn anchor_resolves_exact_element() {
        let page: HashMap<&str, u32> = [("#pricing", 7), ("#features", 3)].into_iter().collect();

        assert_eq!(
            resolve_anchor("#pricing", |selector| page.get(selector).copied()),
            Some(7)
        );
        assert_eq!(
            resolve_anchor("#missing", |selector| page.get(selector).copied()),
            None
        );
    }

    #[test]
    fn non_fragment_href_skips_lookup() {
        let mut calls = 0;
        let found: Option<u32> = resolve_anchor("#", |_| {
            calls += 1;
            Some(1)
        });
        assert_eq!(found, None);
        let found: Option<u32> = resolve_anchor("/portal/", |_| {
            calls += 1;
            Some(1)
        });
        assert_eq!(found, None);
        assert_eq!(calls, 0);
    }
}
