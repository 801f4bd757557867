use chrono::{Local, NaiveDate};
use clap::Args;
use employment::compensation::{
    BonusCategory, CallProcessingOutcome, CompensationService, DateRange, InMemoryRecordStore,
    ManagerId, MonthWindow, NewManager,
};
use employment::config::CompensationConfig;
use employment::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Calls to process in a single request.
    #[arg(long, default_value_t = 150)]
    pub(crate) calls: u32,
    /// Base salary of the seeded manager.
    #[arg(long, default_value_t = 1000)]
    pub(crate) base_salary: u32,
    /// Date the calls were processed (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Count the monthly window by (year, month) instead of month number alone.
    #[arg(long)]
    pub(crate) calendar_month: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        calls,
        base_salary,
        date,
        calendar_month,
    } = args;

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let month_window = if calendar_month {
        MonthWindow::CalendarMonth
    } else {
        MonthWindow::MonthOfYear
    };
    let config = CompensationConfig {
        month_window,
        max_calls_per_request: CompensationConfig::default()
            .max_calls_per_request
            .max(calls),
    };
    let service = CompensationService::new(Arc::new(InMemoryRecordStore::new()), config);

    let manager = service.create_manager(NewManager {
        id: Some(ManagerId(7)),
        name: "Demo Manager".to_string(),
        base_salary,
    })?;

    println!("Call processing demo");
    println!(
        "Manager {} ({}) | base salary {} | window {}",
        manager.id,
        manager.name,
        manager.base_salary,
        month_window.label()
    );

    let outcome = service.apply_call_processing(manager.id, calls, Some(date))?;
    render_outcome(&outcome);

    let salary = service.salary(manager.id)?;
    println!("\nEffective salary: {}", salary.salary);

    let recorded = service.processed_calls_count(manager.id, DateRange::unbounded())?;
    let bonuses = service.bonus_history(Some(manager.id), DateRange::unbounded())?;
    println!(
        "Ledger: {} processed call(s), {} bonus record(s)",
        recorded,
        bonuses.len()
    );

    Ok(())
}

fn render_outcome(outcome: &CallProcessingOutcome) {
    println!(
        "\nProcessed {} call(s) on {} (monthly counter {} -> {})",
        outcome.processed, outcome.date, outcome.prior_monthly_count, outcome.monthly_count
    );
    println!("Bonus tiers");
    for category in BonusCategory::ALL {
        let count = outcome.count_for(category);
        println!(
            "- {}: {} x {} = {}",
            category.label(),
            count,
            category.amount(),
            u64::from(count) * u64::from(category.amount())
        );
    }
    println!("Accrued this request: {}", outcome.accrued);
}
