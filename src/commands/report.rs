//! Read-only commands that render a tracker as text tables.

use crate::aggregate::{week_view, weekly_average_income, DerivedTotals, WeekView};
use crate::api::Mode;
use crate::args::{LogArgs, LogKind, WeekArgs, YearArgs};
use crate::commands::{open, Out};
use crate::model::calendar::{days_of_week, month_name, weeks_in_month, LAST_WEEK, MONTHS};
use crate::model::{Amount, ExpenseEntry, IncomeEntry, YearRecord};
use crate::{table, Config, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// The monthly overview, yearly totals, budgets and spending by category.
pub async fn show(config: &Config, mode: Mode, args: &YearArgs) -> Result<Out<DerivedTotals>> {
    let session = open(config, mode, args.year()).await?;
    let totals = session.totals();
    let report = overview(session.record(), &totals);
    session.close();
    Ok(Out::new(
        format!(
            "{}: spent {}, earned {}, saved {}",
            args.year(),
            totals.total_expenditure,
            totals.total_income,
            totals.gross_savings
        ),
        totals,
    )
    .with_report(report))
}

pub async fn week(config: &Config, mode: Mode, args: &WeekArgs) -> Result<Out<WeekView>> {
    let session = open(config, mode, args.year()).await?;
    let view = week_view(session.record(), args.month(), args.week())?;
    let report = week_table(session.record(), &view);
    session.close();
    Ok(Out::new(
        format!(
            "Week {} of {} {}: spent {}",
            view.week + 1,
            month_name(view.month).unwrap_or_default(),
            args.year(),
            view.total
        ),
        view,
    )
    .with_report(report))
}

/// Weekly income for each month with the average of each week across the year.
pub async fn income(config: &Config, mode: Mode, args: &YearArgs) -> Result<Out<[Amount; 5]>> {
    let session = open(config, mode, args.year()).await?;
    let record = session.record();
    let averages = weekly_average_income(record);

    let mut rows = Vec::new();
    for (month, name) in MONTHS.iter().enumerate() {
        let month = month as u32;
        let weeks = weeks_in_month(record.year(), month);
        let mut row = vec![name.to_string()];
        let mut total = Amount::ZERO;
        for week in 0..=LAST_WEEK {
            if week < weeks {
                let amount = record.weekly_income(month, week);
                total += amount;
                row.push(amount.to_string());
            } else {
                row.push(String::new());
            }
        }
        row.push(total.to_string());
        rows.push(row);
    }
    let mut average_row = vec![String::from("Weekly average")];
    average_row.extend(averages.iter().map(|a| a.to_string()));
    rows.push(average_row);

    let report = table::render(
        &["Month", "Week 1", "Week 2", "Week 3", "Week 4", "Week 5", "Total"],
        &rows,
    );
    session.close();
    Ok(Out::new(format!("Weekly income for {}", args.year()), averages).with_report(report))
}

/// Log entries as returned by `tracker log`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LogEntries {
    Expenses(Vec<ExpenseEntry>),
    Income(Vec<IncomeEntry>),
}

pub async fn log(config: &Config, mode: Mode, args: &LogArgs) -> Result<Out<LogEntries>> {
    let session = open(config, mode, args.year()).await?;
    let record = session.record();
    let limit = args.limit().unwrap_or(usize::MAX);

    let (entries, report, count) = match args.kind() {
        LogKind::Expenses => {
            let entries: Vec<ExpenseEntry> =
                record.expense_log().recent_first().take(limit).cloned().collect();
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.date().to_string(),
                        e.category().to_string(),
                        e.item().to_string(),
                        e.amount().to_string(),
                    ]
                })
                .collect();
            let report = table::render(&["Date", "Category", "Item", "Amount"], &rows);
            let count = entries.len();
            (LogEntries::Expenses(entries), report, count)
        }
        LogKind::Income => {
            let entries: Vec<IncomeEntry> =
                record.income_log().recent_first().take(limit).cloned().collect();
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.date().to_string(),
                        e.source().to_string(),
                        e.invoice().to_string(),
                        e.amount().to_string(),
                    ]
                })
                .collect();
            let report = table::render(&["Date", "Source", "Invoice", "Amount"], &rows);
            let count = entries.len();
            (LogEntries::Income(entries), report, count)
        }
    };
    session.close();
    Ok(Out::new(
        format!("{count} {} entries for {}", args.kind(), args.year()),
        entries,
    )
    .with_report(report))
}

fn overview(record: &YearRecord, totals: &DerivedTotals) -> String {
    let categories = record.categories();

    let mut headers: Vec<&str> = vec!["Month"];
    headers.extend(categories.iter().map(String::as_str));
    headers.extend(["Expenditure", "Income", "Savings"]);

    let mut rows: Vec<Vec<String>> = MONTHS
        .iter()
        .zip(totals.monthly.iter())
        .map(|(name, m)| {
            let mut row = vec![name.to_string()];
            row.extend(m.category_totals.iter().map(Amount::to_string));
            row.push(m.total_expenditure.to_string());
            row.push(m.income.to_string());
            row.push(m.gross_savings.to_string());
            row
        })
        .collect();
    let mut total_row = vec![String::from("Total")];
    total_row.extend(totals.category_totals.iter().map(Amount::to_string));
    total_row.push(totals.total_expenditure.to_string());
    total_row.push(totals.total_income.to_string());
    total_row.push(totals.gross_savings.to_string());
    rows.push(total_row);

    let mut out = format!("{} overview\n\n", record.year());
    out.push_str(&table::render(&headers, &rows));

    let budget_rows: Vec<Vec<String>> = record
        .budgets()
        .zip(totals.category_totals.iter())
        .map(|((category, budget), spent)| {
            vec![
                category.to_string(),
                budget.to_string(),
                spent.share(12).to_string(),
            ]
        })
        .collect();
    out.push_str("\nBudgets\n\n");
    out.push_str(&table::render(
        &["Category", "Monthly budget", "Average spent"],
        &budget_rows,
    ));
    out.push_str(&format!("Total monthly budget: {}\n", record.total_budget()));

    let breakdown = totals.category_breakdown(record);
    if !breakdown.is_empty() {
        let rows: Vec<Vec<String>> = breakdown
            .iter()
            .map(|(category, spent)| {
                vec![
                    category.to_string(),
                    spent.to_string(),
                    percent(*spent, totals.total_expenditure),
                ]
            })
            .collect();
        out.push_str("\nSpending by category\n\n");
        out.push_str(&table::render(&["Category", "Spent", "Share"], &rows));
    }
    out
}

fn week_table(record: &YearRecord, view: &WeekView) -> String {
    let categories = record.categories();
    let mut headers: Vec<&str> = vec!["Day"];
    headers.extend(categories.iter().map(String::as_str));
    headers.push("Total");

    let mut rows = Vec::new();
    for (day, total) in &view.days {
        let mut row = vec![format!(
            "{} {day}",
            month_name(view.month).unwrap_or_default()
        )];
        row.extend(
            categories
                .iter()
                .map(|c| record.daily_expense(view.month, *day, c).to_string()),
        );
        row.push(total.to_string());
        rows.push(row);
    }
    let mut total_row = vec![String::from("Week total")];
    total_row.extend(view.category_totals.iter().map(Amount::to_string));
    total_row.push(view.total.to_string());
    rows.push(total_row);

    let mut out = table::render(&headers, &rows);
    if days_of_week(record.year(), view.month, view.week).is_empty() {
        out.push_str("This month has no days in that week.\n");
    }
    out.push_str(&format!("Income this week: {}\n", view.income));
    out
}

fn percent(part: Amount, whole: Amount) -> String {
    if whole.is_zero() {
        return String::from("0.0%");
    }
    match part
        .value()
        .checked_div(whole.value())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(pct) => format!("{:.1}%", pct.round_dp(1)),
        None => String::from("-"),
    }
}
