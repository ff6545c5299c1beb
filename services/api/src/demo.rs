use std::io::Cursor;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use nourish_ai::error::AppError;
use nourish_ai::workflows::advisor::service::{AdvisorConfig, AdvisorService, AdvisorStores};
use nourish_ai::workflows::advisor::waste::WastePeriod;
use nourish_ai::workflows::ledger::domain::{BudgetTier, HouseholdProfile, OwnerId};
use nourish_ai::workflows::ledger::import::LedgerCsvImporter;

use crate::infra::{
    InMemoryConsumptionStore, InMemoryFoodCatalog, InMemoryInventoryStore,
    InMemoryProfileDirectory, InMemoryScoreStore,
};

const DEMO_OWNER: &str = "demo-household";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fix the reference date (YYYY-MM-DD); defaults to the local date
    #[arg(long, value_parser = parse_cli_date)]
    today: Option<NaiveDate>,
    /// Weekly shopping budget for the meal plan
    #[arg(long)]
    budget: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AdvisorReportArgs {
    /// Fix the reference date (YYYY-MM-DD); defaults to the local date
    #[arg(long, value_parser = parse_cli_date)]
    today: Option<NaiveDate>,
}

fn parse_cli_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn demo_service(today: NaiveDate) -> Result<(Arc<AdvisorService>, OwnerId), AppError> {
    let owner = OwnerId(DEMO_OWNER.to_string());

    let inventory_store = InMemoryInventoryStore::default();
    let consumption_store = InMemoryConsumptionStore::default();
    let profiles = InMemoryProfileDirectory::default();

    let inventory_csv = demo_inventory_csv(today);
    let records =
        LedgerCsvImporter::inventory_from_reader(Cursor::new(inventory_csv), &owner, today)?;
    inventory_store.extend(records);

    let consumption_csv = demo_consumption_csv(today);
    let logs = LedgerCsvImporter::consumption_from_reader(Cursor::new(consumption_csv), &owner)?;
    consumption_store.extend(logs);

    profiles.insert(
        owner.clone(),
        HouseholdProfile {
            household_size: 2,
            budget_tier: BudgetTier::Medium,
        },
    );

    let stores = AdvisorStores {
        inventory: Arc::new(inventory_store),
        consumption: Arc::new(consumption_store),
        catalog: Arc::new(InMemoryFoodCatalog::seeded()),
        profiles: Arc::new(profiles),
        scores: Arc::new(InMemoryScoreStore::default()),
    };

    Ok((
        Arc::new(AdvisorService::new(stores, AdvisorConfig::default())),
        owner,
    ))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let (service, owner) = demo_service(today)?;

    println!("=== Nourish Advisor demo ({today}) ===\n");

    print_risks(&service, &owner, today)?;
    print_waste(&service, &owner, today)?;
    print_sdg(&service, &owner, today)?;

    let plan = service.optimize_meal_plan(&owner, args.budget, false)?;
    println!("--- Weekly meal plan ---");
    println!("{}", plan.summary);
    for day in &plan.days {
        let slots: Vec<String> = day
            .meals
            .all()
            .map(|assignment| assignment.item_name.clone())
            .collect();
        println!("  {:<9} {}", day.day, slots.join(", "));
    }
    if !plan.shopping_list.is_empty() {
        println!("  Shopping list (${:.2}):", plan.total_cost);
        for item in &plan.shopping_list {
            println!(
                "    {} x{} (${:.2})",
                item.name, item.quantity, item.estimated_cost
            );
            for substitute in &item.substitutes {
                println!(
                    "      cheaper: {} (save {:.0}%)",
                    substitute.item_name, substitute.savings_pct
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_advisor_report(args: AdvisorReportArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let (service, owner) = demo_service(today)?;

    println!("=== Advisory report ({today}) ===\n");
    print_risks(&service, &owner, today)?;
    print_waste(&service, &owner, today)?;
    print_sdg(&service, &owner, today)?;

    Ok(())
}

fn print_risks(
    service: &AdvisorService,
    owner: &OwnerId,
    today: NaiveDate,
) -> Result<(), AppError> {
    let predictions = service.score_expiration_risks(owner, None, today)?;

    println!("--- Expiration risks ---");
    if predictions.is_empty() {
        println!("  nothing at risk in the next week");
    }
    for prediction in &predictions {
        println!(
            "  [{}] {} (risk {:.0}, rank {:.0})",
            prediction.priority.label(),
            prediction.item_name,
            prediction.risk_score,
            prediction.ai_ranking_score
        );
        println!("      {}", prediction.reasoning_sentence());
        println!("      -> {}", prediction.recommended_action);
    }
    println!();
    Ok(())
}

fn print_waste(
    service: &AdvisorService,
    owner: &OwnerId,
    today: NaiveDate,
) -> Result<(), AppError> {
    let report = service.waste_report(owner, today)?;

    println!("--- Waste estimate ---");
    println!(
        "  this week: {:.0}g (${:.2}) = {:.0}g expired + {:.0}g at-risk",
        report.weekly.total_waste_grams,
        report.weekly.total_waste_cost,
        report.weekly.expired_waste_grams,
        report.weekly.pattern_waste_grams
    );
    println!(
        "  projected month: {:.0}g (${:.2}), trend factor {:.2}",
        report.monthly.total_waste_grams,
        report.monthly.total_waste_cost,
        report.monthly.trend_factor
    );
    for comparison in &report.comparisons {
        if comparison.period == WastePeriod::Week {
            println!(
                "  community: you waste {:.0}g vs {:.0}g average ({:?})",
                comparison.user_grams, comparison.community_grams, comparison.status
            );
        }
    }
    println!();
    Ok(())
}

fn print_sdg(
    service: &AdvisorService,
    owner: &OwnerId,
    today: NaiveDate,
) -> Result<(), AppError> {
    let score = service.compute_sdg_score(owner, None, today)?;

    println!("--- SDG impact (week of {}) ---", score.week_start);
    println!(
        "  overall {:.1} = waste {:.1} / nutrition {:.1} / sustainability {:.1}",
        score.overall_score, score.waste_score, score.nutrition_score, score.sustainability_score
    );
    for insight in &score.insights {
        println!("  * {}", insight.message);
    }
    for step in &score.actionable_steps {
        println!("  -> [{:?}] {}", step.priority, step.action);
    }
    println!();
    Ok(())
}

fn demo_inventory_csv(today: NaiveDate) -> String {
    let d = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();

    let mut csv = String::from(
        "Item Name,Category,Quantity,Unit,Purchase Date,Expiration Date,Notes\n",
    );
    for (name, category, quantity, unit, purchased, expires) in [
        ("Whole Milk", "dairy", "1", "l", -5i64, Some(1i64)),
        ("Spinach", "vegetable", "1", "pack", -6, Some(1)),
        ("Chicken Breast", "meat", "0.6", "kg", -2, Some(2)),
        ("Bananas", "fruit", "6", "piece", -4, Some(2)),
        ("Old Lettuce", "vegetable", "1", "pack", -10, Some(-2)),
        ("Yogurt Cups", "dairy", "4", "pack", -12, Some(-4)),
        ("Brown Rice", "grain", "2", "kg", -20, None),
        ("Canned Tomatoes", "canned", "3", "piece", -30, Some(200)),
    ] {
        let expiration = expires.map(&d).unwrap_or_default();
        csv.push_str(&format!(
            "{name},{category},{quantity},{unit},{},{expiration},\n",
            d(purchased)
        ));
    }
    csv
}

fn demo_consumption_csv(today: NaiveDate) -> String {
    let d = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();

    let mut csv = String::from("Item Name,Category,Quantity,Unit,Date Consumed,Notes\n");
    for (name, category, quantity, unit, day) in [
        ("Milk", "dairy", "0.3", "l", -1i64),
        ("Milk", "dairy", "0.3", "l", -3),
        ("Milk", "dairy", "0.4", "l", -5),
        ("Apples", "fruit", "2", "piece", -1),
        ("Bananas", "fruit", "1", "piece", -2),
        ("Oranges", "fruit", "2", "piece", -6),
        ("Salad", "vegetable", "1", "serving", -1),
        ("Carrots", "vegetable", "0.3", "kg", -4),
        ("Bread", "grain", "4", "piece", -2),
        ("Rice", "grain", "0.5", "kg", -7),
        ("Chicken", "meat", "0.4", "kg", -3),
        ("Cheese", "dairy", "0.1", "kg", -9),
    ] {
        csv.push_str(&format!(
            "{name},{category},{quantity},{unit},{},\n",
            d(day)
        ));
    }
    csv
}
