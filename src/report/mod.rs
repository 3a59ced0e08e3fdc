//! Read-only reports over the stored operations: balance, per-category totals,
//! the largest operations and charts of them.

mod charts;
mod queries;

pub use charts::{
    ChartView, ECHARTS_SCRIPT_URL, RenderedChart, category_bar_chart, time_series_chart,
    top_n_bar_chart,
};
pub use queries::{
    CategorySummaryEntry, DailyTotals, get_balance, get_category_summary, get_daily_totals,
    get_top_by_amount,
};

use crate::{Error, OperationKind, db::Database, operation::OperationWithCategory};

/// Computes reports from the database shared with the record store.
///
/// Reports never fail because there is no data, empty stores give zero
/// balances, empty lists and [ChartView::NoData].
#[derive(Debug, Clone)]
pub struct ReportingEngine {
    database: Database,
}

impl ReportingEngine {
    /// Create a reporting engine that reads from `database`.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Total income minus total expenses.
    pub fn get_balance(&self) -> Result<f64, Error> {
        get_balance(&*self.database.lock()?)
    }

    /// The total per category for operations of `kind`, ordered by category name.
    pub fn get_category_summary(
        &self,
        kind: OperationKind,
    ) -> Result<Vec<CategorySummaryEntry>, Error> {
        get_category_summary(kind, &*self.database.lock()?)
    }

    /// The `n` largest operations of `kind`, largest first.
    pub fn get_top_by_amount(
        &self,
        kind: OperationKind,
        n: u32,
    ) -> Result<Vec<OperationWithCategory>, Error> {
        get_top_by_amount(kind, n, &*self.database.lock()?)
    }

    /// Income and expense totals per day, oldest first.
    pub fn get_daily_totals(&self) -> Result<Vec<DailyTotals>, Error> {
        get_daily_totals(&*self.database.lock()?)
    }

    /// Bar chart of the total per category for operations of `kind`.
    pub fn render_category_bar_chart(&self, kind: OperationKind) -> Result<ChartView, Error> {
        let summary = self.get_category_summary(kind)?;
        Ok(category_bar_chart(kind, &summary))
    }

    /// Bar chart of the `n` largest operations of `kind`.
    pub fn render_top_n_bar_chart(&self, kind: OperationKind, n: u32) -> Result<ChartView, Error> {
        let operations = self.get_top_by_amount(kind, n)?;
        Ok(top_n_bar_chart(kind, &operations))
    }

    /// Line chart of income and expenses per day.
    pub fn render_time_series(&self) -> Result<ChartView, Error> {
        let daily_totals = self.get_daily_totals()?;
        Ok(time_series_chart(&daily_totals))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        OperationKind,
        db::Database,
        operation::Operation,
        report::{ChartView, ReportingEngine},
        store::RecordStore,
    };

    fn get_test_store_and_engine() -> (RecordStore, ReportingEngine) {
        let database = Database::open_in_memory().unwrap();
        (
            RecordStore::new(database.clone()),
            ReportingEngine::new(database),
        )
    }

    #[test]
    fn reports_on_empty_store() {
        let (_, engine) = get_test_store_and_engine();

        assert_eq!(engine.get_balance(), Ok(0.0));
        assert_eq!(engine.get_category_summary(OperationKind::Expense), Ok(vec![]));
        assert_eq!(engine.get_top_by_amount(OperationKind::Expense, 5), Ok(vec![]));
        assert_eq!(
            engine.render_category_bar_chart(OperationKind::Income),
            Ok(ChartView::NoData)
        );
        assert_eq!(
            engine.render_top_n_bar_chart(OperationKind::Expense, 5),
            Ok(ChartView::NoData)
        );
        assert_eq!(engine.render_time_series(), Ok(ChartView::NoData));
    }

    #[test]
    fn reports_see_store_changes() {
        let (store, engine) = get_test_store_and_engine();
        let salary = store.add_category("Salary", OperationKind::Income).unwrap();
        let rent = store.add_category("Rent", OperationKind::Expense).unwrap();
        store
            .add_operation(Operation::build(
                100.0,
                salary.id,
                date!(2025 - 01 - 01),
                OperationKind::Income,
            ))
            .unwrap();
        let expense = store
            .add_operation(Operation::build(
                40.0,
                rent.id,
                date!(2025 - 01 - 02),
                OperationKind::Expense,
            ))
            .unwrap();

        assert_eq!(engine.get_balance(), Ok(60.0));

        store.delete_operation(expense.id).unwrap();

        assert_eq!(engine.get_balance(), Ok(100.0));
    }

    #[test]
    fn charts_render_when_there_is_data() {
        let (store, engine) = get_test_store_and_engine();
        let rent = store.add_category("Rent", OperationKind::Expense).unwrap();
        store
            .add_operation(Operation::build(
                50.0,
                rent.id,
                date!(2025 - 01 - 01),
                OperationKind::Expense,
            ))
            .unwrap();

        assert!(matches!(
            engine.render_category_bar_chart(OperationKind::Expense),
            Ok(ChartView::Chart(_))
        ));
        assert!(matches!(
            engine.render_top_n_bar_chart(OperationKind::Expense, 5),
            Ok(ChartView::Chart(_))
        ));
        assert!(matches!(
            engine.render_time_series(),
            Ok(ChartView::Chart(_))
        ));
        assert_eq!(
            engine.render_category_bar_chart(OperationKind::Income),
            Ok(ChartView::NoData)
        );
    }
}
