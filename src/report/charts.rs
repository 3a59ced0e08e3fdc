//! Chart generation and rendering for the reports.
//!
//! Charts are built as ECharts configurations with `charming` and rendered
//! into HTML with `maud`:
//! - **Category chart**: bar chart of the total per category for one kind
//! - **Top-N chart**: bar chart of the largest operations of one kind
//! - **Trend chart**: income and expenses per day as two lines
//!
//! When there is nothing to plot the builders return [ChartView::NoData]
//! instead of an empty chart.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Line, bar},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    OperationKind,
    currency::format_currency,
    operation::OperationWithCategory,
    report::queries::{CategorySummaryEntry, DailyTotals},
    validation::format_date,
};

/// Where standalone chart pages load ECharts from.
pub const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The result of rendering a chart.
///
/// Charts are not raster images. A [RenderedChart] is an ECharts configuration
/// that is drawn in the browser, so viewing it needs the ECharts script from
/// [ECHARTS_SCRIPT_URL] or a local copy of it.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    /// A chart ready to be embedded.
    Chart(RenderedChart),
    /// There were no operations to plot.
    NoData,
}

/// A chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// The HTML element ID to use for the chart (kebab-case).
    pub id: String,
    /// The ECharts configuration as a JSON string.
    pub options: String,
}

impl RenderedChart {
    fn new(id: &str, chart: Chart) -> Self {
        Self {
            id: id.to_owned(),
            options: chart.to_string(),
        }
    }

    /// Render the chart container and the script that draws the chart into it.
    ///
    /// The page embedding the fragment must load ECharts before the fragment's
    /// script runs, see [ECHARTS_SCRIPT_URL].
    pub fn to_html(&self) -> Markup {
        // "</" would end the script element early if it showed up in a category name.
        let options = self.options.replace("</", "<\\/");
        let script = format!(
            r#"(function() {{
                const chart = echarts.init(document.getElementById("{}"));
                chart.setOption({});
                window.addEventListener('resize', chart.resize);
            }})();"#,
            self.id, options
        );

        html!(
            div
                id=(self.id)
                class="chart"
                style="width: 100%; min-height: 380px;"
            {}
            script { (PreEscaped(script)) }
        )
    }

    /// Render a standalone HTML page that loads ECharts and shows the chart.
    pub fn to_page(&self, title: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en"
            {
                head
                {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    script src=(ECHARTS_SCRIPT_URL) {}
                }

                body
                {
                    (self.to_html())
                }
            }
        }
    }
}

/// Bar chart of the total of each category, for operations of `kind`.
pub fn category_bar_chart(kind: OperationKind, summary: &[CategorySummaryEntry]) -> ChartView {
    if summary.is_empty() {
        return ChartView::NoData;
    }

    let labels: Vec<String> = summary.iter().map(|entry| entry.name.clone()).collect();
    let values: Vec<f64> = summary.iter().map(|entry| entry.total).collect();
    let total: f64 = values.iter().sum();

    let chart = bar_chart(
        &format!("{} by category", kind_title(kind)),
        &format!("Total {}", format_currency(total)),
        labels,
    )
    .series(bar::Bar::new().name(kind_title(kind)).data(values));

    ChartView::Chart(RenderedChart::new(&format!("{kind}-category-chart"), chart))
}

/// Bar chart of the largest operations of `kind`, largest first.
pub fn top_n_bar_chart(kind: OperationKind, operations: &[OperationWithCategory]) -> ChartView {
    if operations.is_empty() {
        return ChartView::NoData;
    }

    let labels: Vec<String> = operations
        .iter()
        .map(|operation| format!("{} {}", operation.category_name, format_date(operation.date)))
        .collect();
    let values: Vec<f64> = operations.iter().map(|operation| operation.amount).collect();

    let chart = bar_chart(
        &format!("Top {} {}", operations.len(), kind_title(kind).to_lowercase()),
        &format!("Largest {}", format_currency(values[0])),
        labels,
    )
    .series(bar::Bar::new().name(kind_title(kind)).data(values));

    ChartView::Chart(RenderedChart::new(&format!("top-{kind}-chart"), chart))
}

/// Line chart of income and expenses per day.
///
/// Both lines share one date axis, days with only one kind of operation plot
/// zero for the other.
pub fn time_series_chart(daily_totals: &[DailyTotals]) -> ChartView {
    if daily_totals.is_empty() {
        return ChartView::NoData;
    }

    let labels: Vec<String> = daily_totals
        .iter()
        .map(|totals| format_date(totals.date))
        .collect();
    let income: Vec<f64> = daily_totals.iter().map(|totals| totals.income).collect();
    let expense: Vec<f64> = daily_totals.iter().map(|totals| totals.expense).collect();

    let chart = Chart::new()
        .title(
            Title::new()
                .text("Income and expenses")
                .subtext("Per day")
                .left(20)
                .top("1%"),
        )
        .tooltip(axis_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Expense").data(expense));

    ChartView::Chart(RenderedChart::new("trend-chart", chart))
}

fn bar_chart(title: &str, subtitle: &str, labels: Vec<String>) -> Chart {
    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(axis_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
}

fn axis_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

fn kind_title(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Income => "Income",
        OperationKind::Expense => "Expenses",
    }
}
