//! Expense statistics
//!
//! Fetches every expense once and aggregates the selected month into a
//! total and per-type amounts. Months are labelled `MMM yyyy`
//! (e.g. "Mar 2024").

use super::ViewResult;
use crate::client::ApiClient;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const EXPENSES_PATH: &str = "/expense/all";

/// Default number of table rows per page
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// An expense as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub expense_date: Option<String>,
    pub expense_name: String,
    pub expense_type: String,
    pub price: f64,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Expense {
    /// Calendar date of the expense, `None` when missing or unparseable
    pub fn date(&self) -> Option<NaiveDate> {
        self.expense_date.as_deref().and_then(parse_date)
    }
}

/// Amount spent on one expense type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAmount {
    pub name: String,
    pub amount: f64,
}

/// Aggregate of one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub total: f64,
    /// Per-type amounts, in order of first appearance
    pub types: Vec<TypeAmount>,
}

/// Parse an ISO 8601 date or date-time
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// `MMM yyyy` label of the month containing `date`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Labels of the twelve months of `year`
pub fn months_of_year(year: i32) -> Vec<String> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(month_label)
        .collect()
}

/// Aggregate the expenses falling in `month`
///
/// Expenses without a date are ignored; expenses with an unparseable date
/// are logged and ignored. Returns `None` when nothing falls in the month.
pub fn summarize_month(expenses: &[Expense], month: &str) -> Option<MonthlySummary> {
    let mut summary: Option<MonthlySummary> = None;

    for expense in expenses {
        let Some(raw) = expense.expense_date.as_deref() else {
            continue;
        };
        let Some(date) = parse_date(raw) else {
            tracing::error!(date = raw, "Invalid date");
            continue;
        };
        if month_label(date) != month {
            continue;
        }

        let entry = summary.get_or_insert_with(|| MonthlySummary {
            month: month.to_string(),
            total: 0.0,
            types: Vec::new(),
        });
        entry.total += expense.price;
        match entry
            .types
            .iter_mut()
            .find(|t| t.name == expense.expense_type)
        {
            Some(existing) => existing.amount += expense.price,
            None => entry.types.push(TypeAmount {
                name: expense.expense_type.clone(),
                amount: expense.price,
            }),
        }
    }

    summary
}

/// The expense statistics screen
#[derive(Debug)]
pub struct ExpensesView {
    client: ApiClient,
    expenses: Vec<Expense>,
    selected_month: String,
    page: usize,
    rows_per_page: usize,
}

impl ExpensesView {
    /// New view with the current month selected
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            expenses: Vec::new(),
            selected_month: month_label(Utc::now().date_naive()),
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }

    /// Fetch all expenses
    pub async fn refresh(&mut self) -> ViewResult<&[Expense]> {
        match self.client.get::<Vec<Expense>>(EXPENSES_PATH).await {
            Ok(expenses) => {
                self.expenses = expenses;
                Ok(&self.expenses)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching expenses");
                Err(e.into())
            }
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Months offered by the month selector
    pub fn available_months(&self) -> Vec<String> {
        months_of_year(Utc::now().year())
    }

    pub fn selected_month(&self) -> &str {
        &self.selected_month
    }

    pub fn select_month(&mut self, month: impl Into<String>) {
        self.selected_month = month.into();
    }

    /// Aggregate of the selected month
    pub fn summary(&self) -> Option<MonthlySummary> {
        summarize_month(&self.expenses, &self.selected_month)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change the page size; goes back to the first page
    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows.max(1);
        self.page = 0;
    }

    /// Number of table pages
    pub fn page_count(&self) -> usize {
        self.expenses.len().div_ceil(self.rows_per_page)
    }

    /// Table rows of the current page
    pub fn page_rows(&self) -> &[Expense] {
        let len = self.expenses.len();
        let start = self.page.saturating_mul(self.rows_per_page).min(len);
        let end = start.saturating_add(self.rows_per_page).min(len);
        &self.expenses[start..end]
    }
}
