//! Commands that create or change a tracker.
//!
//! Each of these opens the tracker, applies one mutation and then flushes the pending save
//! instead of waiting for the debounce interval, since the process exits right after.

use crate::api::{self, Mode};
use crate::args::{
    AddExpenseArgs, AddIncomeArgs, BudgetArgs, CreateArgs, SetExpenseArgs, SetIncomeArgs,
};
use crate::commands::{open, Out};
use crate::model::calendar::month_name;
use crate::model::{parse_names, ExpenseEntry, IncomeEntry, YearRecord};
use crate::session::Session;
use crate::{Config, Result};
use anyhow::Context;

pub async fn create(config: &Config, mode: Mode, args: &CreateArgs) -> Result<Out<YearRecord>> {
    let record = YearRecord::new(
        args.year(),
        parse_names(args.categories()),
        parse_names(args.income_sources()),
    )
    .context("Invalid categories or income sources")?;
    let remote = api::remote(config, mode).await?;
    let session = Session::create(remote, record, config.debounce()).await?;
    let record = session.record().clone();
    session.close();
    Ok(Out::new(
        format!(
            "Created the {} tracker with {} categories and {} income sources",
            record.year(),
            record.categories().len(),
            record.income_sources().len()
        ),
        record,
    ))
}

pub async fn add_expense(
    config: &Config,
    mode: Mode,
    args: &AddExpenseArgs,
) -> Result<Out<ExpenseEntry>> {
    let mut session = open(config, mode, args.year()).await?;
    let entry = session.add_expense(args.date(), args.amount(), args.item(), args.category())?;
    session.finish().await?;
    Ok(Out::new(
        format!(
            "Recorded {} of {} on {}",
            entry.amount(),
            entry.category(),
            entry.date()
        ),
        entry,
    ))
}

pub async fn add_income(
    config: &Config,
    mode: Mode,
    args: &AddIncomeArgs,
) -> Result<Out<IncomeEntry>> {
    let mut session = open(config, mode, args.year()).await?;
    let entry = session.add_income(args.date(), args.amount(), args.source(), args.invoice())?;
    session.finish().await?;
    Ok(Out::new(
        format!(
            "Recorded {} from {} on {}",
            entry.amount(),
            entry.source(),
            entry.date()
        ),
        entry,
    ))
}

pub async fn budget(config: &Config, mode: Mode, args: &BudgetArgs) -> Result<Out<()>> {
    let mut session = open(config, mode, args.year()).await?;
    session.set_budget(args.category(), args.amount())?;
    let total = session.record().total_budget();
    session.finish().await?;
    Ok(format!(
        "Set the {} budget for {} to {}, the total monthly budget is now {total}",
        args.year(),
        args.category(),
        args.amount()
    )
    .into())
}

pub async fn set_expense(config: &Config, mode: Mode, args: &SetExpenseArgs) -> Result<Out<()>> {
    let mut session = open(config, mode, args.year()).await?;
    session.set_daily_expense(args.month(), args.day(), args.category(), args.amount())?;
    session.finish().await?;
    Ok(format!(
        "Set {} on {} {} to {}",
        args.category(),
        month_name(args.month()).unwrap_or_default(),
        args.day(),
        args.amount()
    )
    .into())
}

pub async fn set_income(config: &Config, mode: Mode, args: &SetIncomeArgs) -> Result<Out<()>> {
    let mut session = open(config, mode, args.year()).await?;
    session.set_weekly_income(args.month(), args.week(), args.amount())?;
    session.finish().await?;
    Ok(format!(
        "Set income for week {} of {} to {}",
        args.week() + 1,
        month_name(args.month()).unwrap_or_default(),
        args.amount()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{remote_error_kind, ErrorKind, LedgerError};
    use crate::model::Amount;
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    #[tokio::test]
    async fn test_create_then_edit() {
        let env = TestEnv::new().await;
        let config = env.config();
        let out = create(
            &config,
            Mode::Test,
            &CreateArgs::new(2025, "Rent, Food", "Salary"),
        )
        .await
        .unwrap();
        assert_eq!(out.structure().unwrap().categories(), ["Rent", "Food"]);

        add_expense(
            &config,
            Mode::Test,
            &AddExpenseArgs::new(2025, Amount::from(100), "Rent", date("2025-03-05"), "rent"),
        )
        .await
        .unwrap();
        add_income(
            &config,
            Mode::Test,
            &AddIncomeArgs::new(2025, Amount::from(3000), "Salary", date("2025-03-10"), "A1"),
        )
        .await
        .unwrap();
        budget(
            &config,
            Mode::Test,
            &BudgetArgs::new(2025, "Food", Amount::from(250)),
        )
        .await
        .unwrap();
        set_expense(
            &config,
            Mode::Test,
            &SetExpenseArgs::new(2025, 3, 6, "Food", Amount::from(12)),
        )
        .await
        .unwrap();
        set_income(
            &config,
            Mode::Test,
            &SetIncomeArgs::new(2025, 3, 5, Amount::from(40)),
        )
        .await
        .unwrap();

        let record = env.stored(2025).await.unwrap();
        assert_eq!(record.daily_expense(2, 5, "Rent"), Amount::from(100));
        assert_eq!(record.daily_expense(2, 6, "Food"), Amount::from(12));
        assert_eq!(record.weekly_income(2, 1), Amount::from(3000));
        assert_eq!(record.weekly_income(2, 4), Amount::from(40));
        assert_eq!(record.budget("Food"), Amount::from(250));
        assert_eq!(record.expense_log().len(), 1);
        assert_eq!(record.income_log().len(), 1);
    }

    #[tokio::test]
    async fn test_create_existing_year_conflicts() {
        let env = TestEnv::new().await;
        let config = env.config();
        let args = CreateArgs::new(2025, "Rent", "Salary");
        create(&config, Mode::Test, &args).await.unwrap();
        let err = create(&config, Mode::Test, &args).await.unwrap_err();
        assert_eq!(remote_error_kind(&err), Some(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_edit_missing_year() {
        let env = TestEnv::new().await;
        let err = budget(
            &env.config(),
            Mode::Test,
            &BudgetArgs::new(1999, "Rent", Amount::from(1)),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("tracker create 1999"));
    }

    #[tokio::test]
    async fn test_rejected_edit_is_not_saved() {
        let env = TestEnv::new().await;
        let config = env.config();
        create(&config, Mode::Test, &CreateArgs::new(2025, "Food", "Salary"))
            .await
            .unwrap();
        let err = set_expense(
            &config,
            Mode::Test,
            &SetExpenseArgs::new(2025, 2, 29, "Food", Amount::from(3)),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::InvalidDay { day: 29, .. })
        ));
        let record = env.stored(2025).await.unwrap();
        assert!(record.daily_expenses().is_empty());
    }
}
