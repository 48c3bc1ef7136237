//! 按天聚合模块
//!
//! 把带时间戳的记录落到连续的日历天上，供仪表盘图表使用。
//! 窗口外的记录直接忽略，不会累计到溢出桶。

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

pub const LABEL_FORMAT: &str = "%Y-%m-%d";

/// 图表时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayWindow {
    #[default]
    Last14,
    Last30,
}

impl DayWindow {
    pub const ALL: [DayWindow; 2] = [DayWindow::Last14, DayWindow::Last30];

    pub fn days(&self) -> u32 {
        match self {
            DayWindow::Last14 => 14,
            DayWindow::Last30 => 30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayWindow::Last14 => "Last 14 days",
            DayWindow::Last30 => "Last 30 days",
        }
    }

    /// 最长的窗口，数据按它一次取够，切换窗口时不必重新请求
    pub fn widest() -> Self {
        DayWindow::Last30
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            14 => Some(DayWindow::Last14),
            30 => Some(DayWindow::Last30),
            _ => None,
        }
    }
}

/// 浏览器本地时区的今天
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 以 `end` 结尾的 W 个连续日期，最早的在前
pub fn day_labels(end: NaiveDate, window: DayWindow) -> Vec<NaiveDate> {
    let days = i64::from(window.days());
    (0..days)
        .rev()
        .map(|offset| end - Duration::days(offset))
        .collect()
}

/// 窗口内最早的一天
pub fn window_start(end: NaiveDate, window: DayWindow) -> NaiveDate {
    end - Duration::days(i64::from(window.days()) - 1)
}

/// 解析后端返回的时间戳，只取日历日
///
/// 支持带时区的 RFC 3339、不带时区的日期时间以及纯日期。
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, LABEL_FORMAT).ok()
}

/// 一条命名序列，标签与数值一一对应
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucketSeries {
    pub name: String,
    pub labels: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl DayBucketSeries {
    pub fn zeros(name: impl Into<String>, labels: Vec<NaiveDate>) -> Self {
        let values = vec![0.0; labels.len()];
        Self {
            name: name.into(),
            labels,
            values,
        }
    }

    pub fn label_strings(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|d| d.format(LABEL_FORMAT).to_string())
            .collect()
    }

    pub fn value_at(&self, label: &str) -> Option<f64> {
        let day = NaiveDate::parse_from_str(label, LABEL_FORMAT).ok()?;
        let idx = self.labels.iter().position(|d| *d == day)?;
        self.values.get(idx).copied()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    fn add(&mut self, day: NaiveDate, amount: f64) {
        // 标签连续且升序，直接按偏移定位
        let Some(first) = self.labels.first() else {
            return;
        };
        let offset = (day - *first).num_days();
        if offset >= 0 && (offset as usize) < self.values.len() {
            self.values[offset as usize] += amount;
        }
    }
}

/// 计数聚合
pub fn bucket_count<T>(
    name: &str,
    records: &[T],
    end: NaiveDate,
    window: DayWindow,
    date_of: impl Fn(&T) -> Option<NaiveDate>,
    filter: impl Fn(&T) -> bool,
) -> DayBucketSeries {
    bucket_sum(name, records, end, window, date_of, |r| {
        if filter(r) { Some(1.0) } else { None }
    })
}

/// 求和聚合，`amount_of` 返回 `None` 的记录不计入
pub fn bucket_sum<T>(
    name: &str,
    records: &[T],
    end: NaiveDate,
    window: DayWindow,
    date_of: impl Fn(&T) -> Option<NaiveDate>,
    amount_of: impl Fn(&T) -> Option<f64>,
) -> DayBucketSeries {
    let mut series = DayBucketSeries::zeros(name, day_labels(end, window));
    for record in records {
        if let (Some(day), Some(amount)) = (date_of(record), amount_of(record)) {
            series.add(day, amount);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, LABEL_FORMAT).unwrap()
    }

    #[test]
    fn test_labels_are_contiguous_and_end_on_last_day() {
        let labels = day_labels(day("2024-03-02"), DayWindow::Last14);
        assert_eq!(labels.len(), 14);
        assert_eq!(labels[0], day("2024-02-18"));
        assert_eq!(labels[13], day("2024-03-02"));
        assert!(labels.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
        assert_eq!(day_labels(day("2024-03-02"), DayWindow::Last30).len(), 30);
    }

    #[test]
    fn test_window_start_matches_first_label() {
        let end = day("2024-03-02");
        for window in DayWindow::ALL {
            assert_eq!(window_start(end, window), day_labels(end, window)[0]);
        }
        assert_eq!(window_start(end, DayWindow::widest()), day("2024-02-02"));
    }

    #[test]
    fn test_parse_day_accepts_backend_formats() {
        assert_eq!(parse_day("2024-01-03T23:59:59Z"), Some(day("2024-01-03")));
        assert_eq!(parse_day("2024-01-03T10:00:00+02:00"), Some(day("2024-01-03")));
        assert_eq!(parse_day("2024-01-03T10:00:00.123456"), Some(day("2024-01-03")));
        assert_eq!(parse_day("2024-01-03 10:00:00"), Some(day("2024-01-03")));
        assert_eq!(parse_day("2024-01-03"), Some(day("2024-01-03")));
        assert_eq!(parse_day("yesterday"), None);
    }

    #[test]
    fn test_granted_and_denied_share_one_axis() {
        let logs = [
            ("2024-01-01", true),
            ("2024-01-01", false),
            ("2024-01-03", true),
        ];
        let end = day("2024-01-03");
        let date_of = |r: &(&str, bool)| parse_day(r.0);

        let granted = bucket_count("granted", &logs, end, DayWindow::Last14, date_of, |r| r.1);
        let denied = bucket_count("denied", &logs, end, DayWindow::Last14, date_of, |r| !r.1);

        assert_eq!(granted.labels, denied.labels);
        assert_eq!(granted.value_at("2024-01-01"), Some(1.0));
        assert_eq!(granted.value_at("2024-01-02"), Some(0.0));
        assert_eq!(granted.value_at("2024-01-03"), Some(1.0));
        assert_eq!(denied.value_at("2024-01-01"), Some(1.0));
        assert_eq!(denied.total(), 1.0);
    }

    #[test]
    fn test_records_outside_window_are_ignored() {
        let amounts = [("2023-12-01", 50.0), ("2024-01-02", 10.0), ("2024-02-01", 99.0)];
        let series = bucket_sum(
            "revenue",
            &amounts,
            day("2024-01-03"),
            DayWindow::Last14,
            |r| parse_day(r.0),
            |r| Some(r.1),
        );
        assert_eq!(series.total(), 10.0);
        assert_eq!(series.max(), 10.0);
    }

    #[test]
    fn test_unparseable_timestamps_are_skipped() {
        let records = ["not a date", "2024-01-03T08:00:00"];
        let series = bucket_count(
            "n",
            &records,
            day("2024-01-03"),
            DayWindow::Last14,
            |r| parse_day(r),
            |_| true,
        );
        assert_eq!(series.total(), 1.0);
        assert_eq!(series.label_strings().last().map(String::as_str), Some("2024-01-03"));
    }
}
