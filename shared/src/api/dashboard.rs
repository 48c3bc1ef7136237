use super::ApiClient;
use crate::dashboard::{DashboardLoad, DashboardSection, SectionFailure};
use crate::date::{DayWindow, parse_day, window_start};
use crate::error::{ApiError, ApiResult};
use crate::http::HttpClient;
use crate::models::AccessLog;
use crate::pagination::{Collected, PageQuery, collect_pages};
use crate::protocol::{AccessLogs, Payments, Subscriptions, Vehicles};
use chrono::NaiveDate;

/// 仪表盘聚合时每页条数
pub const DASHBOARD_PAGE_SIZE: u32 = 100;
/// 每个集合最多翻的页数
pub const DASHBOARD_MAX_PAGES: u32 = 20;

impl<C: HttpClient> ApiClient<C> {
    /// 加载仪表盘所需的全部数据
    ///
    /// 各集合分别请求，失败的分区记录在 `failures` 里，其余照常返回。
    /// 通行记录与支付按时间倒序，翻到最长窗口之前的记录即停止；订阅需要全量统计活跃数。
    pub async fn load_dashboard(&self, is_admin: bool, end: NaiveDate) -> DashboardLoad {
        let oldest = window_start(end, DayWindow::widest());
        let before_window = move |raw: &str| parse_day(raw).is_some_and(|day| day < oldest);
        let mut load = DashboardLoad::default();

        match self.resource::<Vehicles>().list(&PageQuery::new(1, 1)).await {
            Ok(page) => load.data.vehicles_total = page.total,
            Err(err) => record_failure(&mut load, DashboardSection::Vehicles, &err),
        }

        let subscriptions = self
            .resource::<Subscriptions>()
            .collect(DASHBOARD_PAGE_SIZE, DASHBOARD_MAX_PAGES, |_| false)
            .await;
        if let Some(items) = settle(&mut load, DashboardSection::Subscriptions, subscriptions) {
            load.data.subscriptions = items;
        }

        if is_admin {
            let payments = self
                .resource::<Payments>()
                .collect(DASHBOARD_PAGE_SIZE, DASHBOARD_MAX_PAGES, |p| {
                    p.paid_at.as_deref().is_some_and(before_window)
                })
                .await;
            if let Some(items) = settle(&mut load, DashboardSection::Payments, payments) {
                load.data.payments = items;
            }

            let logs = self
                .resource::<AccessLogs>()
                .collect(DASHBOARD_PAGE_SIZE, DASHBOARD_MAX_PAGES, |l| {
                    before_window(l.timestamp.as_str())
                })
                .await;
            if let Some(items) = settle(&mut load, DashboardSection::AccessLogs, logs) {
                load.data.access_logs = items;
            }
        } else {
            let logs = collect_pages(
                DASHBOARD_PAGE_SIZE,
                DASHBOARD_MAX_PAGES,
                |l: &AccessLog| before_window(l.timestamp.as_str()),
                |query| async move { self.my_access_logs(&query).await },
            )
            .await;
            if let Some(items) = settle(&mut load, DashboardSection::AccessLogs, logs) {
                load.data.access_logs = items;
            }
        }

        if !load.failures.is_empty() {
            log::warn!("dashboard loaded with {} failed sections", load.failures.len());
        }
        load
    }
}

fn record_failure(load: &mut DashboardLoad, section: DashboardSection, err: &ApiError) {
    log::error!("failed to fetch {}: {err}", section.label());
    load.failures.push(SectionFailure {
        section,
        message: err.user_message(&format!("Failed to fetch {}", section.label())),
    });
}

fn settle<T>(
    load: &mut DashboardLoad,
    section: DashboardSection,
    result: ApiResult<Collected<T>>,
) -> Option<Vec<T>> {
    match result {
        Ok(collected) => {
            if collected.truncated {
                load.truncated.push(section);
            }
            Some(collected.items)
        }
        Err(err) => {
            record_failure(load, section, &err);
            None
        }
    }
}
