use serde::{Deserialize, Serialize};

/// Hai biến thể hiển thị của `header` theo vị trí cuộn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeaderVariant {
    #[default]
    Top,
    Scrolled,
}

/// Bộ giá trị inline style gán cho `header`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct HeaderStyle {
    pub background: &'static str,
    pub backdrop_filter: &'static str,
    pub box_shadow: &'static str,
}

impl HeaderVariant {
    /// `Scrolled` khi đã cuộn quá ngưỡng (so sánh chặt), ngược lại `Top`.
    pub fn for_offset(offset_y: f64, threshold: f64) -> Self {
        if offset_y > threshold {
            HeaderVariant::Scrolled
        } else {
            HeaderVariant::Top
        }
    }

    pub fn style(self) -> HeaderStyle {
        match self {
            HeaderVariant::Top => HeaderStyle {
                background: "rgba(255, 255, 255, 0.95)",
                backdrop_filter: "blur(10px)",
                box_shadow: "none",
            },
            HeaderVariant::Scrolled => HeaderStyle {
                background: "rgba(255, 255, 255, 0.98)",
                backdrop_filter: "blur(20px)",
                box_shadow: "0 2px 20px rgba(0,0,0,0.1)",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(HeaderVariant::for_offset(99.0, 100.0), HeaderVariant::Top);
        assert_eq!(HeaderVariant::for_offset(100.0, 100.0), HeaderVariant::Top);
        assert_eq!(
            HeaderVariant::for_offset(101.0, 100.0),
            HeaderVariant::Scrolled
        );
    }

    #[test]
    fn scrolled_style_is_heavier() {
        let top = HeaderVariant::Top.style();
        let scrolled = HeaderVariant::Scrolled.style();
        assert_eq!(top.box_shadow, "none");
        assert_eq!(scrolled.backdrop_filter, "blur(20px)");
        assert_ne!(top.background, scrolled.background);
    }
}
