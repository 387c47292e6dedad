//! 提示消息（Toast）
//!
//! 消息挂在 App 根部，页面跳转后仍然可见，`notice_millis` 毫秒后自动消失。

use std::time::Duration;

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

impl NoticeKind {
    fn alert_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "alert alert-success",
            NoticeKind::Info => "alert alert-info",
            NoticeKind::Error => "alert alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// 当前展示的消息队列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

#[derive(Clone, Copy)]
pub struct Notifier {
    queue: RwSignal<NoticeQueue>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl_millis: u64) -> Self {
        Self {
            queue: RwSignal::new(NoticeQueue::default()),
            ttl: Duration::from_millis(ttl_millis),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeKind::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message.into());
    }

    fn push(&self, kind: NoticeKind, message: String) {
        log::debug!("[Notice] {:?}: {}", kind, message);
        let queue = self.queue;
        let Some(id) = queue.try_update(|q| q.push(kind, message)) else {
            return;
        };
        set_timeout(
            move || {
                queue.try_update(|q| q.dismiss(id));
            },
            self.ttl,
        );
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

/// 消息展示区
#[component]
pub fn NoticeHost() -> impl IntoView {
    let notifier = use_notifier();
    let queue = notifier.queue;

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || queue.with(|q| q.notices().to_vec())
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div
                            class=notice.kind.alert_class()
                            on:click=move |_| queue.update(|q| q.dismiss(id))
                        >
                            <span>{notice.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_push_and_dismiss() {
        let mut queue = NoticeQueue::default();
        let first = queue.push(NoticeKind::Success, "Book added to cart!");
        let second = queue.push(NoticeKind::Info, "Book already in cart!");
        assert_ne!(first, second);

        queue.dismiss(first);
        assert_eq!(queue.notices().len(), 1);
        assert_eq!(queue.notices()[0].message, "Book already in cart!");

        // 重复关闭是无害的
        queue.dismiss(first);
        assert_eq!(queue.notices().len(), 1);
    }
}
