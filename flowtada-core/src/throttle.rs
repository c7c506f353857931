/// Vé ứng với một lần hẹn giờ của throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleTicket(u64);

/// Throttle kiểu trailing-edge, không phụ thuộc đồng hồ.
///
/// Mỗi sự kiện gọi `trigger` và hẹn lại timer `wait_ms`; khi timer nổ, `fire`
/// chỉ trả `true` cho vé mới nhất. Một loạt sự kiện dồn dập vì vậy chỉ chạy
/// một lần, sau sự kiện cuối cùng cộng thêm `wait_ms`.
#[derive(Debug, Clone)]
pub struct TrailingThrottle {
    wait_ms: u32,
    generation: u64,
    pending: bool,
}

impl TrailingThrottle {
    pub fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            generation: 0,
            pending: false,
        }
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    pub fn trigger(&mut self) -> ThrottleTicket {
        self.generation += 1;
        self.pending = true;
        ThrottleTicket(self.generation)
    }

    pub fn fire(&mut self, ticket: ThrottleTicket) -> bool {
        if self.pending && ticket.0 == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Giả lập `setTimeout`: mỗi sự kiện hẹn lại deadline, trả về các mốc chạy.
    fn simulate(wait_ms: u32, events: &[u64], until: u64) -> Vec<u64> {
        let mut throttle = TrailingThrottle::new(wait_ms);
        let mut timer: Option<(u64, ThrottleTicket)> = None;
        let mut runs = Vec::new();
        let mut events = events.iter().copied().peekable();

        for now in 0..=until {
            if let Some((deadline, ticket)) = timer {
                if deadline == now {
                    timer = None;
                    if throttle.fire(ticket) {
                        runs.push(now);
                    }
                }
            }
            while events.peek() == Some(&now) {
                events.next();
                let ticket = throttle.trigger();
                timer = Some((now + u64::from(throttle.wait_ms()), ticket));
            }
        }
        runs
    }

    #[test]
    fn burst_collapses_to_one_run() {
        let runs = simulate(16, &[0, 5, 10, 15, 20], 100);
        assert_eq!(runs, vec![36]);
    }

    #[test]
    fn separated_bursts_run_separately() {
        let runs = simulate(16, &[0, 4, 60, 61], 200);
        assert_eq!(runs, vec![20, 77]);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut throttle = TrailingThrottle::new(16);
        let first = throttle.trigger();
        let second = throttle.trigger();
        assert!(!throttle.fire(first));
        assert!(throttle.fire(second));
        assert!(!throttle.fire(second));
    }

    #[test]
    fn cancel_drops_pending_run() {
        let mut throttle = TrailingThrottle::new(16);
        let ticket = throttle.trigger();
        throttle.cancel();
        assert!(!throttle.fire(ticket));
    }
}
