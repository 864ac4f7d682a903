//! User-facing notices raised by an upload run.

/// Display duration of success, warning and info notices.
const DEFAULT_DURATION_MS: u64 = 4000;

/// Error notices stay up longer.
const ERROR_DURATION_MS: u64 = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn duration_ms(self) -> u64 {
        match self {
            Self::Error => ERROR_DURATION_MS,
            _ => DEFAULT_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: u64,
}

/// FIFO of notices with monotonically increasing ids.
///
/// Dismissal timing belongs to whoever renders the notices.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notice and returns a copy of it.
    pub fn push(
        &mut self,
        kind: NoticeKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> Notice {
        let notice = Notice {
            id: self.next_id,
            kind,
            title: title.into(),
            message,
            duration_ms: kind.duration_ms(),
        };
        self.next_id += 1;
        self.notices.push(notice.clone());
        notice
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) -> Notice {
        self.push(NoticeKind::Success, title, Some(message.into()))
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) -> Notice {
        self.push(NoticeKind::Error, title, Some(message.into()))
    }

    pub fn warning(&mut self, title: impl Into<String>, message: impl Into<String>) -> Notice {
        self.push(NoticeKind::Warning, title, Some(message.into()))
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) -> Notice {
        self.push(NoticeKind::Info, title, Some(message.into()))
    }

    /// Removes a notice by id. Returns `true` if it was queued.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn get(&self, id: u64) -> Option<&Notice> {
        self.notices.iter().find(|n| n.id == id)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Removes and returns every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
