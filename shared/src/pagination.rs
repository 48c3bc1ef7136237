use crate::DEFAULT_PAGE_SIZE;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// 分页结果
///
/// 每次翻页或筛选都重新请求，不与之前的页合并。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub pages: u32,
}

fn first_page() -> u32 {
    1
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// `ceil(total / size)`，`total == 0` 时为 0
pub fn page_count(total: u64, size: u32) -> u32 {
    if total == 0 || size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
}

impl<T> Page<T> {
    pub fn empty(page: u32, size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: page.max(1),
            size: size.max(1),
            pages: 0,
        }
    }

    /// 以客户端计算为准修正 `pages`，并保证 `items.len() <= size`
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.size = self.size.max(1);
        self.pages = page_count(self.total, self.size);
        self.items.truncate(self.size as usize);
        self
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// 删除本页中满足条件的行（删除成功后的本地更新）
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        let removed = (before - self.items.len()) as u64;
        self.total = self.total.saturating_sub(removed);
        self.pages = page_count(self.total, self.size);
    }

    /// 删除后本页变空时应加载的页码
    ///
    /// 越过末页时退回末页；仍有数据但本页已空时重新加载本页；无需处理时返回 `None`。
    pub fn page_after_removal(&self) -> Option<u32> {
        if !self.items.is_empty() {
            return None;
        }
        let target = self.page.min(self.pages).max(1);
        (target != self.page || self.total > 0).then_some(target)
    }
}

/// 列表查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            search: None,
            status: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = (!status.trim().is_empty()).then_some(status);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        pairs
    }
}

/// 逐页收集的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Collected<T> {
    pub items: Vec<T>,
    /// 服务端报告的总数，可能大于 `items.len()`
    pub total: u64,
    /// 达到页数上限后停止，结果不完整
    pub truncated: bool,
}

/// 从第一页开始逐页请求，直到取完、遇到空页或 `past_end` 命中
///
/// 后端按时间倒序返回时，`past_end` 判断记录是否已早于所需窗口；
/// 命中的那一页仍然保留，之后不再翻页。`max_pages` 用尽时记录警告并标记截断。
pub async fn collect_pages<T, F, Fut>(
    size: u32,
    max_pages: u32,
    past_end: impl Fn(&T) -> bool,
    mut fetch: F,
) -> ApiResult<Collected<T>>
where
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = ApiResult<Page<T>>>,
{
    let mut collected = Collected {
        items: Vec::new(),
        total: 0,
        truncated: false,
    };
    let mut page_no = 1;
    loop {
        let page = fetch(PageQuery::new(page_no, size)).await?;
        collected.total = page.total;
        let pages = page.pages;
        let empty = page.items.is_empty();
        let reached = page.items.iter().any(&past_end);
        collected.items.extend(page.items);

        if empty || reached || page_no >= pages {
            break;
        }
        if page_no >= max_pages {
            log::warn!(
                "stopped paging after {page_no} of {pages} pages ({} of {} records)",
                collected.items.len(),
                collected.total
            );
            collected.truncated = true;
            break;
        }
        page_no += 1;
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(95, 10), 10);
    }

    #[test]
    fn test_normalized_ignores_server_pages() {
        let page = Page {
            items: vec![1, 2, 3],
            total: 23,
            page: 1,
            size: 10,
            pages: 99,
        }
        .normalized();
        assert_eq!(page.pages, 3);
        assert!(page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn test_normalized_caps_items_at_size() {
        let page = Page {
            items: (0..12).collect::<Vec<_>>(),
            total: 12,
            page: 1,
            size: 10,
            pages: 0,
        }
        .normalized();
        assert_eq!(page.items.len(), 10);
    }

    #[test]
    fn test_remove_where_updates_totals() {
        let mut page = Page {
            items: vec![1, 2, 3],
            total: 11,
            page: 2,
            size: 10,
            pages: 2,
        };
        page.remove_where(|x| *x == 2);
        assert_eq!(page.items, vec![1, 3]);
        assert_eq!(page.total, 10);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn test_emptied_last_page_steps_back() {
        let mut page = Page {
            items: vec![21],
            total: 21,
            page: 3,
            size: 10,
            pages: 3,
        };
        page.remove_where(|x| *x == 21);
        assert_eq!(page.pages, 2);
        assert_eq!(page.page_after_removal(), Some(2));
    }

    #[test]
    fn test_emptied_middle_page_reloads_in_place() {
        let mut page = Page {
            items: vec![11, 12],
            total: 22,
            page: 2,
            size: 2,
            pages: 11,
        };
        page.remove_where(|_| true);
        assert_eq!(page.page_after_removal(), Some(2));
    }

    #[test]
    fn test_page_after_removal_is_noop_when_rows_remain_or_all_gone() {
        let mut page = Page {
            items: vec![1, 2],
            total: 2,
            page: 1,
            size: 10,
            pages: 1,
        };
        page.remove_where(|x| *x == 1);
        assert_eq!(page.page_after_removal(), None);
        page.remove_where(|_| true);
        assert_eq!(page.total, 0);
        assert_eq!(page.page_after_removal(), None);
    }

    #[test]
    fn test_query_pairs_skip_blank_filters() {
        let q = PageQuery::new(0, 20).with_search("  ").with_status("active");
        assert_eq!(
            q.to_query_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("size".to_string(), "20".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
    }

    fn numbered(page_no: u32, size: u32, total: u64) -> Page<u64> {
        let first = u64::from(page_no - 1) * u64::from(size);
        let items = (first..total.min(first + u64::from(size))).collect();
        Page {
            items,
            total,
            page: page_no,
            size,
            pages: 0,
        }
        .normalized()
    }

    #[tokio::test]
    async fn test_collect_pages_reads_every_page() {
        let mut asked = Vec::new();
        let collected = collect_pages(100, 20, |_| false, |q| {
            asked.push(q.page);
            async move { Ok(numbered(q.page, q.size, 250)) }
        })
        .await
        .unwrap();
        assert_eq!(asked, vec![1, 2, 3]);
        assert_eq!(collected.items.len(), 250);
        assert_eq!(collected.total, 250);
        assert!(!collected.truncated);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_once_past_end() {
        let mut asked = 0;
        let collected = collect_pages(10, 20, |n: &u64| *n >= 15, |q| {
            asked += 1;
            async move { Ok(numbered(q.page, q.size, 100)) }
        })
        .await
        .unwrap();
        assert_eq!(asked, 2);
        assert_eq!(collected.items.len(), 20);
        assert!(!collected.truncated);
    }

    #[tokio::test]
    async fn test_collect_pages_marks_truncation_at_cap() {
        let collected = collect_pages(10, 3, |_| false, |q| async move {
            Ok(numbered(q.page, q.size, 100))
        })
        .await
        .unwrap();
        assert_eq!(collected.items.len(), 30);
        assert_eq!(collected.total, 100);
        assert!(collected.truncated);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result = collect_pages(10, 5, |_| false, |q| async move {
            if q.page == 2 {
                Err(crate::error::ApiError::Network("offline".into()))
            } else {
                Ok(numbered(q.page, q.size, 50))
            }
        })
        .await;
        assert!(matches!(result, Err(crate::error::ApiError::Network(_))));
    }
}
