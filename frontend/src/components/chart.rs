//! 按天折线图（SVG）

use gatewise_shared::date::DayBucketSeries;
use leptos::prelude::*;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 220.0;
const PADDING: f64 = 24.0;
const COLORS: [&str; 3] = ["#22c55e", "#ef4444", "#3b82f6"];

/// 把一组值映射为 SVG `points`，所有序列共用 `max` 作为纵轴上限
fn polyline_points(values: &[f64], max: f64) -> String {
    let n = values.len();
    if n == 0 {
        return String::new();
    }
    let step = if n > 1 {
        (WIDTH - 2.0 * PADDING) / (n - 1) as f64
    } else {
        0.0
    };
    let scale = if max > 0.0 { (HEIGHT - 2.0 * PADDING) / max } else { 0.0 };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = PADDING + step * i as f64;
            let y = HEIGHT - PADDING - v * scale;
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn shared_max(series: &[DayBucketSeries]) -> f64 {
    series.iter().map(DayBucketSeries::max).fold(0.0, f64::max)
}

#[component]
pub fn LineChart(#[prop(into)] series: Signal<Vec<DayBucketSeries>>) -> impl IntoView {
    let view_box = format!("0 0 {WIDTH} {HEIGHT}");

    view! {
        <div class="w-full">
            <svg viewBox=view_box class="w-full h-56" preserveAspectRatio="none">
                <line
                    x1={PADDING.to_string()}
                    y1={(HEIGHT - PADDING).to_string()}
                    x2={(WIDTH - PADDING).to_string()}
                    y2={(HEIGHT - PADDING).to_string()}
                    stroke="currentColor" stroke-opacity="0.2"
                />
                {move || {
                    let all = series.get();
                    let max = shared_max(&all);
                    all.iter()
                        .enumerate()
                        .map(|(i, s)| {
                            let color = COLORS[i % COLORS.len()];
                            view! {
                                <polyline
                                    fill="none"
                                    stroke=color
                                    stroke-width="2"
                                    points={polyline_points(&s.values, max)}
                                />
                            }
                        })
                        .collect_view()
                }}
            </svg>
            <div class="flex justify-between text-xs text-base-content/60 px-2">
                {move || series.with(|all| {
                    let labels = all.first().map(DayBucketSeries::label_strings).unwrap_or_default();
                    let first = labels.first().cloned().unwrap_or_default();
                    let last = labels.last().cloned().unwrap_or_default();
                    view! { <span>{first}</span><span>{last}</span> }
                })}
            </div>
            <div class="flex gap-4 text-sm mt-2">
                {move || series.with(|all| {
                    all.iter()
                        .enumerate()
                        .map(|(i, s)| {
                            let color = format!("background-color: {}", COLORS[i % COLORS.len()]);
                            view! {
                                <span class="flex items-center gap-1">
                                    <span class="inline-block w-3 h-3 rounded-full" style=color></span>
                                    {format!("{} ({})", s.name, s.total())}
                                </span>
                            }
                        })
                        .collect_view()
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_points_span_the_plot_area() {
        let points = polyline_points(&[0.0, 5.0, 10.0], 10.0);
        assert_eq!(points, "24.0,196.0 320.0,110.0 616.0,24.0");
    }

    #[test]
    fn test_all_zero_series_stays_on_baseline() {
        let points = polyline_points(&[0.0, 0.0], 0.0);
        assert_eq!(points, "24.0,196.0 616.0,196.0");
        assert_eq!(polyline_points(&[], 3.0), "");
    }

    #[test]
    fn test_series_share_one_scale() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let labels = vec![end];
        let mut a = DayBucketSeries::zeros("a", labels.clone());
        let mut b = DayBucketSeries::zeros("b", labels);
        a.values[0] = 2.0;
        b.values[0] = 8.0;
        assert_eq!(shared_max(&[a, b]), 8.0);
    }
}
