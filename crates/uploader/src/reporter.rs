//! Progress events for the file being transferred.

use beicun_transfer::ProgressGauge;
use tokio::sync::mpsc;

use crate::types::UploadEvent;

/// Wraps a [`ProgressGauge`] and emits [`UploadEvent::Progress`] whenever the
/// displayed percentage changes.
pub(crate) struct ProgressReporter<'a> {
    events_tx: &'a mpsc::UnboundedSender<UploadEvent>,
    name: String,
    gauge: ProgressGauge,
    last: Option<u8>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(
        events_tx: &'a mpsc::UnboundedSender<UploadEvent>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            events_tx,
            name: name.into(),
            gauge: ProgressGauge::new(),
            last: None,
        }
    }

    pub(crate) fn percent(&self) -> u8 {
        self.gauge.percent()
    }

    pub(crate) fn local(&mut self, uploaded: u32, total: u32) {
        let percent = self.gauge.update_local(uploaded, total);
        self.emit(percent);
    }

    pub(crate) fn server(&mut self, server_percent: f64, uploaded: u32, total: u32) {
        let percent = self.gauge.merge_server(server_percent, uploaded, total);
        self.emit(percent);
    }

    pub(crate) fn complete(&mut self) {
        let percent = self.gauge.complete();
        self.emit(percent);
    }

    fn emit(&mut self, percent: u8) {
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        let _ = self.events_tx.send(UploadEvent::Progress {
            name: self.name.clone(),
            percent,
        });
    }
}
