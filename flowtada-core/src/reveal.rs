/// Cơ chế hiện dần được chọn một lần khi mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStrategy {
    /// Dùng `IntersectionObserver` của trình duyệt.
    Observer,
    /// Quét vị trí phần tử sau mỗi nhịp cuộn đã throttle.
    Poll,
}

impl RevealStrategy {
    pub fn select(observer_available: bool) -> Self {
        if observer_available {
            RevealStrategy::Observer
        } else {
            RevealStrategy::Poll
        }
    }
}

/// Tham số cho observer: tỷ lệ hiển thị tối thiểu và lề gốc.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

/// Một phần tử `.fade-in` tại thời điểm quét.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealCandidate {
    /// `getBoundingClientRect().top`
    pub top: f64,
    pub visible: bool,
}

pub fn should_reveal(top: f64, viewport_height: f64, offset: f64) -> bool {
    top < viewport_height - offset
}

/// Chỉ số các phần tử cần gắn `.visible`. Không bao giờ gỡ `.visible`, và
/// phần tử đã hiện thì bỏ qua nên chạy lại là vô hại.
pub fn pending_reveals(
    candidates: &[RevealCandidate],
    viewport_height: f64,
    offset: f64,
) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| {
            !candidate.visible && should_reveal(candidate.top, viewport_height, offset)
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_boundary() {
        assert!(should_reveal(649.0, 800.0, 150.0));
        assert!(!should_reveal(650.0, 800.0, 150.0));
        assert!(should_reveal(-40.0, 800.0, 150.0));
    }

    #[test]
    fn second_pass_is_noop() {
        let mut candidates = vec![
            RevealCandidate { top: 100.0, visible: false },
            RevealCandidate { top: 900.0, visible: false },
            RevealCandidate { top: 300.0, visible: false },
        ];
        let first = pending_reveals(&candidates, 800.0, 150.0);
        assert_eq!(first, vec![0, 2]);

        for index in first {
            candidates[index].visible = true;
        }
        assert!(pending_reveals(&candidates, 800.0, 150.0).is_empty());
    }

    #[test]
    fn visible_elements_stay_visible_offscreen() {
        let candidates = [RevealCandidate { top: 5000.0, visible: true }];
        assert!(pending_reveals(&candidates, 800.0, 150.0).is_empty());
    }

    #[test]
    fn strategy_prefers_observer() {
        assert_eq!(RevealStrategy::select(true), RevealStrategy::Observer);
        assert_eq!(RevealStrategy::select(false), RevealStrategy::Poll);
    }
}
