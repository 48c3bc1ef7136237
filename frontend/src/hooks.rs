//! 通用分页列表 Hook
//!
//! 每个资源页都用同一个 Hook：页码、筛选、加载状态、错误文案和当前页数据。
//! 页码或筛选一变就重新请求，没有页缓存；只有最后一次请求的响应会被写入。

use crate::auth::{AuthContext, use_auth, use_config};
use crate::components::notification::{Notifier, use_notifier};
use crate::web::FetchClient;
use gatewise_shared::protocol::Resource;
use gatewise_shared::{Page, PageQuery, ResourceService};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::marker::PhantomData;

/// 请求序号：先发后至的旧响应直接丢弃
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct RequestSeq {
    issued: u64,
}

impl RequestSeq {
    pub(crate) fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub(crate) fn is_current(&self, seq: u64) -> bool {
        self.issued == seq
    }
}

pub struct Paginated<R: Resource> {
    pub page: RwSignal<u32>,
    pub search: RwSignal<String>,
    pub status: RwSignal<String>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub data: RwSignal<Page<R::Item>>,
    revision: RwSignal<u64>,
    seq: StoredValue<RequestSeq>,
    auth: AuthContext,
    notifier: Notifier,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for Paginated<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource> Copy for Paginated<R> {}

impl<R: Resource + 'static> Paginated<R> {
    pub fn pages(&self) -> Signal<u32> {
        let data = self.data;
        Signal::derive(move || data.with(|p| p.pages))
    }

    pub fn total(&self) -> Signal<u64> {
        let data = self.data;
        Signal::derive(move || data.with(|p| p.total))
    }

    /// 改变筛选条件时回到第一页
    pub fn set_search(&self, value: String) {
        self.search.set(value);
        self.page.set(1);
    }

    pub fn set_status(&self, value: String) {
        self.status.set(value);
        self.page.set(1);
    }

    pub fn reload(&self) {
        self.revision.try_update(|r| *r += 1);
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.data.with(|p| p.items.clone())
    }

    /// 删除一行，成功后只从本页移除；本页因此变空时退回末页或重新加载
    pub fn delete(&self, id: i64) {
        let list = *self;
        let service = self.auth.api().resource::<R>();
        spawn_local(async move {
            match service.delete(id).await {
                Ok(()) => {
                    let next = list.data.try_update(|p| {
                        p.remove_where(|item| R::id_of(item) == id);
                        p.page_after_removal()
                    });
                    if let Some(Some(target)) = next {
                        if list.page.try_get_untracked() == Some(target) {
                            list.reload();
                        } else {
                            list.page.try_set(target);
                        }
                    }
                    list.notifier.success("Deleted successfully");
                }
                Err(e) => {
                    log::warn!("delete {} #{id} failed: {e}", R::NAME);
                    list.notifier.error(e.user_message(&format!("Failed to delete {}", R::NAME)));
                }
            }
        });
    }
}

pub fn use_paginated<R: Resource + 'static>() -> Paginated<R> {
    let auth = use_auth();
    let size = use_config().page_size;

    let hook = Paginated::<R> {
        page: RwSignal::new(1),
        search: RwSignal::new(String::new()),
        status: RwSignal::new(String::new()),
        loading: RwSignal::new(true),
        error: RwSignal::new(None),
        data: RwSignal::new(Page::empty(1, size)),
        revision: RwSignal::new(0),
        seq: StoredValue::new(RequestSeq::default()),
        auth,
        notifier: use_notifier(),
        _resource: PhantomData,
    };

    Effect::new(move |_| {
        let query = PageQuery::new(hook.page.get(), size)
            .with_search(hook.search.get())
            .with_status(hook.status.get());
        hook.revision.track();

        let seq = hook.seq.try_update_value(RequestSeq::next).unwrap_or_default();
        let service = auth.api().resource::<R>();
        hook.loading.set(true);
        spawn_local(async move {
            let result = service.list(&query).await;
            if !hook.seq.try_with_value(|s| s.is_current(seq)).unwrap_or(false) {
                log::debug!("dropping stale {} page {}", R::NAME, query.page);
                return;
            }
            match result {
                Ok(page) => {
                    hook.data.try_set(page);
                    hook.error.try_set(None);
                }
                Err(e) => {
                    log::warn!("list {} failed: {e}", R::NAME);
                    let fallback = ResourceService::<R, FetchClient>::fetch_failed_message();
                    hook.error.try_set(Some(e.user_message(&fallback)));
                }
            }
            hook.loading.try_set(false);
        });
    });

    hook
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_request_is_current() {
        let mut seq = RequestSeq::default();
        let page_two = seq.next();
        let page_three = seq.next();

        // 第 3 页先返回，第 2 页后返回
        assert!(seq.is_current(page_three));
        assert!(!seq.is_current(page_two));
    }

    #[test]
    fn test_reload_after_response_issues_new_sequence() {
        let mut seq = RequestSeq::default();
        let first = seq.next();
        assert!(seq.is_current(first));
        let second = seq.next();
        assert_ne!(first, second);
        assert!(!seq.is_current(first));
    }
}
