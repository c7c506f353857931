//! Logic lõi điều khiển tương tác trên trang FlowTada: cấu hình, trạng thái
//! hiển thị, sự kiện giao diện và hàm chuyển trạng thái thuần.
//!
//! Lớp DOM chỉ việc chuyển sự kiện trình duyệt thành [`UiEvent`], gọi
//! [`reduce`] rồi áp dụng các [`Effect`] trả về.

mod header;
mod login;
mod reveal;
mod surface;
mod throttle;

pub use header::{HeaderStyle, HeaderVariant};
pub use login::{validate_email, validate_login, welcome_message, LoginError};
pub use reveal::{
    pending_reveals, should_reveal, ObserverOptions, RevealCandidate, RevealStrategy,
};
pub use surface::{
    resolve_anchor, restore_value, ButtonWrite, ModalStyleMemory, ModalStyleWrite,
    SubmitButtonMemory,
};
pub use throttle::{ThrottleTicket, TrailingThrottle};

use serde::{Deserialize, Serialize};

pub const ESCAPE_KEY: &str = "Escape";

/// Các ngưỡng và nhãn điều chỉnh được của bộ điều khiển.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerConfig {
    /// Vượt quá độ cuộn này (px) thì header chuyển sang kiểu "scrolled".
    pub header_threshold_px: f64,
    /// Phần tử hiện khi `top < innerHeight - reveal_offset_px`.
    pub reveal_offset_px: f64,
    pub throttle_ms: u32,
    /// Độ trễ giả lập của lượt đăng nhập (không có request thật).
    pub login_delay_ms: u32,
    pub min_password_len: usize,
    pub observer_threshold: f64,
    pub observer_root_margin: String,
    pub busy_label: String,
    /// Chữ thay thế khi ảnh logo không tải được.
    pub wordmark: String,
    /// Nếu có, gắn listener `submit` cho form này thay vì dựa vào `onsubmit` inline.
    #[serde(default)]
    pub login_form_selector: Option<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            header_threshold_px: 100.0,
            reveal_offset_px: 150.0,
            throttle_ms: 16,
            login_delay_ms: 1500,
            min_password_len: 6,
            observer_threshold: 0.1,
            observer_root_margin: "0px 0px -50px 0px".to_string(),
            busy_label: "Signing In...".to_string(),
            wordmark: "FlowTada".to_string(),
            login_form_selector: None,
        }
    }
}

impl ControllerConfig {
    /// Gộp cấu hình từng phần (nếu có) vào mặc định rồi kiểm tra.
    pub fn resolve(overrides: Option<ConfigOverrides>) -> Result<Self, ControllerError> {
        let cfg = overrides.map(Self::from).unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ControllerError> {
        if !(0.0..=1.0).contains(&self.observer_threshold) {
            return Err(ControllerError::InvalidConfig(format!(
                "observer_threshold phải nằm trong [0, 1], nhận {}",
                self.observer_threshold
            )));
        }
        if self.min_password_len == 0 {
            return Err(ControllerError::InvalidConfig(
                "min_password_len phải lớn hơn 0".to_string(),
            ));
        }
        if self.wordmark.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(
                "wordmark không được rỗng".to_string(),
            ));
        }
        Ok(())
    }

    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.observer_threshold,
            root_margin: self.observer_root_margin.clone(),
        }
    }
}

/// Cấu hình từng phần do JavaScript truyền vào; trường thiếu giữ mặc định.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub header_threshold_px: Option<f64>,
    #[serde(default)]
    pub reveal_offset_px: Option<f64>,
    #[serde(default)]
    pub throttle_ms: Option<u32>,
    #[serde(default)]
    pub login_delay_ms: Option<u32>,
    #[serde(default)]
    pub min_password_len: Option<usize>,
    #[serde(default)]
    pub observer_threshold: Option<f64>,
    #[serde(default)]
    pub observer_root_margin: Option<String>,
    #[serde(default)]
    pub busy_label: Option<String>,
    #[serde(default)]
    pub wordmark: Option<String>,
    #[serde(default)]
    pub login_form_selector: Option<String>,
}

impl From<ConfigOverrides> for ControllerConfig {
    fn from(cfg: ConfigOverrides) -> Self {
        let base = ControllerConfig::default();
        Self {
            header_threshold_px: cfg.header_threshold_px.unwrap_or(base.header_threshold_px),
            reveal_offset_px: cfg.reveal_offset_px.unwrap_or(base.reveal_offset_px),
            throttle_ms: cfg.throttle_ms.unwrap_or(base.throttle_ms),
            login_delay_ms: cfg.login_delay_ms.unwrap_or(base.login_delay_ms),
            min_password_len: cfg.min_password_len.unwrap_or(base.min_password_len),
            observer_threshold: cfg.observer_threshold.unwrap_or(base.observer_threshold),
            observer_root_margin: cfg
                .observer_root_margin
                .unwrap_or(base.observer_root_margin),
            busy_label: cfg.busy_label.unwrap_or(base.busy_label),
            wordmark: cfg.wordmark.unwrap_or(base.wordmark),
            login_form_selector: cfg.login_form_selector.or(base.login_form_selector),
        }
    }
}

/// Giai đoạn của lượt đăng nhập giả lập.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LoginPhase {
    #[default]
    Idle,
    Pending { ticket: u64, email: String },
}

/// Toàn bộ trạng thái hiển thị của trang. Không tồn tại qua lần tải lại.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewState {
    pub menu_open: bool,
    pub modal_visible: bool,
    pub header: HeaderVariant,
    pub login: LoginPhase,
    #[serde(default)]
    pub next_ticket: u64,
}

impl ViewState {
    /// Áp dụng sự kiện tại chỗ, trả về danh sách hiệu ứng cần thực thi.
    pub fn apply(&mut self, event: UiEvent, config: &ControllerConfig) -> Vec<Effect> {
        let Transition { state, effects } = reduce(self, event, config);
        *self = state;
        effects
    }

    pub fn login_pending(&self) -> bool {
        matches!(self.login, LoginPhase::Pending { .. })
    }
}

/// Sự kiện giao diện đã được lớp DOM chuẩn hóa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    HamburgerClicked,
    DocumentClicked { inside_nav: bool },
    KeyPressed { key: String },
    PortalOpened,
    PortalClosed,
    ModalClicked { on_backdrop: bool },
    Scrolled { offset_y: f64 },
    LoginSubmitted { email: String, password: String },
    LoginCompleted { ticket: u64 },
}

/// Hiệu ứng lên DOM, theo đúng thứ tự cần áp dụng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    SetMenuOpen { open: bool },
    SetModalVisible { visible: bool },
    SetHeader { variant: HeaderVariant },
    Alert { message: String },
    SetSubmitBusy { label: String },
    RestoreSubmit,
    ClearCredentials,
    ScheduleLogin { ticket: u64, delay_ms: u32 },
    CancelLogin { ticket: u64 },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub effects: Vec<Effect>,
}

/// Hàm chuyển trạng thái thuần: không chạm DOM, không đọc đồng hồ.
pub fn reduce(state: &ViewState, event: UiEvent, config: &ControllerConfig) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        UiEvent::HamburgerClicked => {
            next.menu_open = !next.menu_open;
            effects.push(Effect::SetMenuOpen {
                open: next.menu_open,
            });
        }
        UiEvent::DocumentClicked { inside_nav } => {
            if !inside_nav {
                close_menu(&mut next, &mut effects);
            }
        }
        UiEvent::KeyPressed { key } => {
            if key == ESCAPE_KEY {
                close_modal(&mut next, &mut effects);
                close_menu(&mut next, &mut effects);
            }
        }
        UiEvent::PortalOpened => {
            if !next.modal_visible {
                next.modal_visible = true;
                effects.push(Effect::SetModalVisible { visible: true });
            }
        }
        UiEvent::PortalClosed => close_modal(&mut next, &mut effects),
        UiEvent::ModalClicked { on_backdrop } => {
            if on_backdrop {
                close_modal(&mut next, &mut effects);
            }
        }
        UiEvent::Scrolled { offset_y } => {
            next.header = HeaderVariant::for_offset(offset_y, config.header_threshold_px);
            effects.push(Effect::SetHeader {
                variant: next.header,
            });
        }
        UiEvent::LoginSubmitted { email, password } => {
            // Nút submit đã bị khóa trong lúc chờ; lượt gửi trùng thì bỏ qua.
            if !next.login_pending() {
                match validate_login(&email, &password, config.min_password_len) {
                    Err(err) => effects.push(Effect::Alert {
                        message: err.to_string(),
                    }),
                    Ok(()) => {
                        let ticket = next.next_ticket;
                        next.next_ticket += 1;
                        next.login = LoginPhase::Pending { ticket, email };
                        effects.push(Effect::SetSubmitBusy {
                            label: config.busy_label.clone(),
                        });
                        effects.push(Effect::ScheduleLogin {
                            ticket,
                            delay_ms: config.login_delay_ms,
                        });
                    }
                }
            }
        }
        UiEvent::LoginCompleted { ticket } => {
            let welcome = match &next.login {
                LoginPhase::Pending {
                    ticket: pending,
                    email,
                } if *pending == ticket => Some(welcome_message(email)),
                _ => None,
            };
            if let Some(message) = welcome {
                next.login = LoginPhase::Idle;
                effects.push(Effect::Alert { message });
                effects.push(Effect::RestoreSubmit);
                effects.push(Effect::ClearCredentials);
                close_modal(&mut next, &mut effects);
            }
        }
    }

    Transition {
        state: next,
        effects,
    }
}

fn close_menu(state: &mut ViewState, effects: &mut Vec<Effect>) {
    if state.menu_open {
        state.menu_open = false;
        effects.push(Effect::SetMenuOpen { open: false });
    }
}

fn close_modal(state: &mut ViewState, effects: &mut Vec<Effect>) {
    if let LoginPhase::Pending { ticket, .. } = state.login {
        state.login = LoginPhase::Idle;
        effects.push(Effect::CancelLogin { ticket });
        effects.push(Effect::RestoreSubmit);
    }
    if state.modal_visible {
        state.modal_visible = false;
        effects.push(Effect::SetModalVisible { visible: false });
    }
}

/// Selector cho anchor nội trang; `None` nếu `href` không phải fragment.
pub fn anchor_selector(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(fragment) if !fragment.is_empty() => Some(href),
        _ => None,
    }
}

/// Một bước khi phát lại chuỗi sự kiện.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplayStep {
    pub event: UiEvent,
    pub state: ViewState,
    pub effects: Vec<Effect>,
}

/// Đọc kịch bản sự kiện dạng mảng JSON.
pub fn parse_event_script(input: &str) -> Result<Vec<UiEvent>, ControllerError> {
    serde_json::from_str(input).map_err(|err| ControllerError::Parse(err.to_string()))
}

/// Chạy lần lượt các sự kiện từ trạng thái ban đầu, ghi lại từng bước.
pub fn replay(events: Vec<UiEvent>, config: &ControllerConfig) -> Vec<ReplayStep> {
    let mut state = ViewState::default();
    events
        .into_iter()
        .map(|event| {
            let effects = state.apply(event.clone(), config);
            ReplayStep {
                event,
                state: state.clone(),
                effects,
            }
        })
        .collect()
}

/// Lỗi chung của bộ điều khiển.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Cấu hình không hợp lệ: {0}")]
    InvalidConfig(String),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}
