/// Highest percentage shown before the service confirms completion.
pub const MAX_PENDING_PERCENT: f64 = 99.0;

/// Displayed upload progress.
///
/// Never moves backwards and stays at or below [`MAX_PENDING_PERCENT`]
/// until [`complete`](Self::complete) is called.
#[derive(Debug, Clone, Default)]
pub struct ProgressGauge {
    percent: f64,
}

impl ProgressGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current percentage, rounded down.
    pub fn percent(&self) -> u8 {
        self.percent.floor() as u8
    }

    /// Applies local progress (`uploaded / total` chunks).
    pub fn update_local(&mut self, uploaded: u32, total: u32) -> u8 {
        self.advance(ratio(uploaded, total));
        self.percent()
    }

    /// Folds a server-reported percentage into the gauge:
    /// `max(min(server, 99), local)`.
    pub fn merge_server(&mut self, server_percent: f64, uploaded: u32, total: u32) -> u8 {
        let merged = server_percent.min(MAX_PENDING_PERCENT).max(ratio(uploaded, total));
        self.advance(merged);
        self.percent()
    }

    /// Marks the upload confirmed: 100%.
    pub fn complete(&mut self) -> u8 {
        self.percent = 100.0;
        100
    }

    fn advance(&mut self, candidate: f64) {
        let capped = candidate.min(MAX_PENDING_PERCENT);
        if capped > self.percent {
            self.percent = capped;
        }
    }
}

fn ratio(uploaded: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    uploaded as f64 / total as f64 * 100.0
}
