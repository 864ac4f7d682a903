use std::time::Duration;

use beicun_uploader::{NoticeKind, UploadEvent};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

const BAR_TEMPLATE: &str = "{prefix:.bold} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// Renders upload events with indicatif until the sender side closes.
pub async fn render(mut events: mpsc::UnboundedReceiver<UploadEvent>) {
    let mut bar: Option<ProgressBar> = None;

    while let Some(event) = events.recv().await {
        match event {
            UploadEvent::Started { name, class, size } => {
                if let Some(old) = bar.take() {
                    old.finish_and_clear();
                }
                let pb = ProgressBar::new(100);
                if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                    pb.set_style(style.progress_chars("=> "));
                }
                pb.set_prefix(name);
                pb.set_message(format!("{class}, {}", HumanBytes(size)));
                pb.enable_steady_tick(Duration::from_millis(200));
                bar = Some(pb);
            }
            UploadEvent::Progress { percent, .. } => {
                if let Some(pb) = &bar {
                    pb.set_position(u64::from(percent));
                }
            }
            UploadEvent::Completed { instant, .. } => {
                if let Some(pb) = bar.take() {
                    pb.finish_with_message(if instant { "already stored" } else { "done" });
                }
            }
            UploadEvent::Notice(notice) => {
                let tag = match notice.kind {
                    NoticeKind::Success => "\x1b[32m✓\x1b[0m",
                    NoticeKind::Error => "\x1b[31m✗\x1b[0m",
                    NoticeKind::Warning => "\x1b[33m!\x1b[0m",
                    NoticeKind::Info => "\x1b[36mi\x1b[0m",
                };
                let line = match &notice.message {
                    Some(msg) => format!("  {tag} {}: {msg}", notice.title),
                    None => format!("  {tag} {}", notice.title),
                };
                match &bar {
                    Some(pb) => pb.println(line),
                    None => eprintln!("{line}"),
                }
            }
            UploadEvent::Failed { .. } | UploadEvent::Cancelled => {
                if let Some(pb) = bar.take() {
                    pb.abandon();
                }
            }
            UploadEvent::Reset => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}
