use crate::date::{DayBucketSeries, DayWindow, bucket_count, bucket_sum, parse_day};
use crate::models::{AccessLog, Payment, PaymentStatus, Subscription};
use chrono::NaiveDate;

/// 图表可选的指标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartMetric {
    #[default]
    Access,
    Subscriptions,
    Revenue,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 3] = [
        ChartMetric::Access,
        ChartMetric::Subscriptions,
        ChartMetric::Revenue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartMetric::Access => "Access events",
            ChartMetric::Subscriptions => "New subscriptions",
            ChartMetric::Revenue => "Revenue",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ChartMetric::Access => "access",
            ChartMetric::Subscriptions => "subscriptions",
            ChartMetric::Revenue => "revenue",
        }
    }

    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .unwrap_or_default()
    }
}

/// 仪表盘用到的原始数据
///
/// 每个集合单独拉取，某一项失败时其余数据照常展示。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardData {
    pub vehicles_total: u64,
    pub subscriptions: Vec<Subscription>,
    pub payments: Vec<Payment>,
    pub access_logs: Vec<AccessLog>,
}

/// 仪表盘的数据分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardSection {
    Vehicles,
    Subscriptions,
    Payments,
    AccessLogs,
}

impl DashboardSection {
    pub fn label(&self) -> &'static str {
        match self {
            DashboardSection::Vehicles => "vehicles",
            DashboardSection::Subscriptions => "subscriptions",
            DashboardSection::Payments => "payments",
            DashboardSection::AccessLogs => "access logs",
        }
    }
}

/// 单个分区的加载失败
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFailure {
    pub section: DashboardSection,
    pub message: String,
}

/// 一次仪表盘加载的结果：已取到的数据，加上失败与被截断的分区
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardLoad {
    pub data: DashboardData,
    pub failures: Vec<SectionFailure>,
    pub truncated: Vec<DashboardSection>,
}

impl DashboardLoad {
    pub fn failed(&self, section: DashboardSection) -> bool {
        self.failures.iter().any(|f| f.section == section)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.truncated.is_empty()
    }
}

pub fn granted_series(logs: &[AccessLog], end: NaiveDate, window: DayWindow) -> DayBucketSeries {
    bucket_count("Authorized", logs, end, window, |l| parse_day(&l.timestamp), |l| l.granted)
}

pub fn denied_series(logs: &[AccessLog], end: NaiveDate, window: DayWindow) -> DayBucketSeries {
    bucket_count("Blocked", logs, end, window, |l| parse_day(&l.timestamp), |l| !l.granted)
}

/// 按开始日期统计新增订阅
pub fn subscription_series(
    subs: &[Subscription],
    end: NaiveDate,
    window: DayWindow,
) -> DayBucketSeries {
    bucket_count(
        "New subscriptions",
        subs,
        end,
        window,
        |s| parse_day(&s.start_date),
        |_| true,
    )
}

/// 只统计已支付的金额
pub fn revenue_series(payments: &[Payment], end: NaiveDate, window: DayWindow) -> DayBucketSeries {
    bucket_sum(
        "Revenue",
        payments,
        end,
        window,
        |p| p.paid_at.as_deref().and_then(parse_day),
        |p| (p.status == PaymentStatus::Paid).then_some(p.amount),
    )
}

/// 选中指标对应的全部序列，共用同一标签轴
pub fn chart_series(
    metric: ChartMetric,
    data: &DashboardData,
    end: NaiveDate,
    window: DayWindow,
) -> Vec<DayBucketSeries> {
    match metric {
        ChartMetric::Access => vec![
            granted_series(&data.access_logs, end, window),
            denied_series(&data.access_logs, end, window),
        ],
        ChartMetric::Subscriptions => vec![subscription_series(&data.subscriptions, end, window)],
        ChartMetric::Revenue => vec![revenue_series(&data.payments, end, window)],
    }
}

/// 顶部卡片
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub vehicles: u64,
    pub active_subscriptions: usize,
    pub revenue: f64,
    pub granted: usize,
    pub denied: usize,
}

pub fn summarize(data: &DashboardData, end: NaiveDate, window: DayWindow) -> DashboardSummary {
    let granted = granted_series(&data.access_logs, end, window);
    let denied = denied_series(&data.access_logs, end, window);
    DashboardSummary {
        vehicles: data.vehicles_total,
        active_subscriptions: data.subscriptions.iter().filter(|s| s.is_active()).count(),
        revenue: revenue_series(&data.payments, end, window).total(),
        granted: granted.total() as usize,
        denied: denied.total() as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log(id: i64, ts: &str, granted: bool) -> AccessLog {
        AccessLog {
            id,
            license_plate: "AA-00-BB".into(),
            vehicle_id: None,
            user_id: None,
            granted,
            reason: String::new(),
            timestamp: ts.into(),
        }
    }

    fn payment(amount: f64, paid_at: Option<&str>, status: PaymentStatus) -> Payment {
        Payment {
            id: 1,
            subscription_id: 1,
            amount,
            paid_at: paid_at.map(String::from),
            status,
        }
    }

    fn subscription(start: &str, status: &str) -> Subscription {
        Subscription {
            id: 1,
            user_id: 1,
            plan_id: 1,
            start_date: start.into(),
            end_date: "2024-12-31".into(),
            status: status.into(),
            spaces_allocated: 1,
            price_at_subscription: 45.0,
            user_full_name: None,
            plan_name: None,
        }
    }

    fn sample() -> DashboardData {
        DashboardData {
            vehicles_total: 12,
            subscriptions: vec![
                subscription("2024-01-02", "active"),
                subscription("2023-06-01", "expired"),
            ],
            payments: vec![
                payment(45.0, Some("2024-01-02T09:30:00"), PaymentStatus::Paid),
                payment(30.0, Some("2024-01-03T09:30:00"), PaymentStatus::Pending),
                payment(20.0, None, PaymentStatus::Paid),
            ],
            access_logs: vec![
                log(1, "2024-01-01T08:00:00", true),
                log(2, "2024-01-01T09:00:00", false),
                log(3, "2024-01-03T10:00:00", true),
            ],
        }
    }

    #[test]
    fn test_access_metric_has_two_series_on_one_axis() {
        let series = chart_series(ChartMetric::Access, &sample(), day("2024-01-03"), DayWindow::Last14);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].labels, series[1].labels);
        assert_eq!(series[0].value_at("2024-01-01"), Some(1.0));
        assert_eq!(series[0].value_at("2024-01-03"), Some(1.0));
        assert_eq!(series[1].value_at("2024-01-01"), Some(1.0));
        assert_eq!(series[1].value_at("2024-01-03"), Some(0.0));
    }

    #[test]
    fn test_revenue_counts_paid_only() {
        let series = revenue_series(&sample().payments, day("2024-01-03"), DayWindow::Last30);
        assert_eq!(series.total(), 45.0);
    }

    #[test]
    fn test_summary_cards() {
        let summary = summarize(&sample(), day("2024-01-03"), DayWindow::Last14);
        assert_eq!(summary.vehicles, 12);
        assert_eq!(summary.active_subscriptions, 1);
        assert_eq!(summary.revenue, 45.0);
        assert_eq!(summary.granted, 2);
        assert_eq!(summary.denied, 1);
    }

    #[test]
    fn test_subscription_series_uses_start_date() {
        let series = subscription_series(&sample().subscriptions, day("2024-01-03"), DayWindow::Last14);
        assert_eq!(series.total(), 1.0);
        assert_eq!(series.value_at("2024-01-02"), Some(1.0));
    }

    #[test]
    fn test_metric_keys_round_trip() {
        for metric in ChartMetric::ALL {
            assert_eq!(ChartMetric::from_key(metric.key()), metric);
        }
        assert_eq!(ChartMetric::from_key("bogus"), ChartMetric::Access);
    }
}
