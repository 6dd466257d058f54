//! Fake data for local development.
//!
//! Every seeded account uses an `@example.com` address and the password
//! `password123`, which is what [`clear_all`] keys on.

mod accounts;
mod batch;
mod families;
mod models;
mod nurseries;

pub use models::{PerNursery, SeedConfig};

use bcrypt::hash;
use creche_models::UserType;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

pub const SEED_PASSWORD: &str = "password123";

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let total_start = Instant::now();
    let per = &config.per_nursery;

    println!("\n🌱 Starting seeder...");
    println!(
        "   {} nurseries, {} parents, {} children\n",
        config.num_nurseries,
        config.total_parents(),
        config.total_children()
    );

    // Minimum bcrypt cost
    let password_hash = hash(SEED_PASSWORD, 4)?;
    let run_tag: String = Uuid::new_v4().simple().to_string()[..6].to_string();

    let managers =
        accounts::generate_accounts(config.num_nurseries, "manager", &run_tag, &password_hash);
    let manager_ids = accounts::seed_accounts(db, &managers, UserType::NurseryManager).await?;

    let nursery_ids =
        nurseries::seed_nurseries(db, &nurseries::generate_nurseries(&manager_ids)).await?;
    nurseries::seed_opening_hours(db, &nurseries::weekly_hours(&nursery_ids)).await?;

    let classroom_ids = nurseries::seed_classrooms(
        db,
        &nurseries::generate_classrooms(&nursery_ids, per.classrooms),
    )
    .await?;
    nurseries::seed_groups(
        db,
        &nurseries::generate_groups(&classroom_ids, per.groups_per_classroom),
    )
    .await?;
    nurseries::seed_activities(
        db,
        &nurseries::generate_activities(&nursery_ids, per.activities),
    )
    .await?;
    nurseries::seed_plans(db, &nurseries::standard_plans(&nursery_ids)).await?;

    let parents =
        accounts::generate_accounts(config.total_parents(), "parent", &run_tag, &password_hash);
    let parent_ids = accounts::seed_accounts(db, &parents, UserType::Parent).await?;
    families::seed_children(
        db,
        &families::generate_children(&parent_ids, per.children_per_parent),
    )
    .await?;

    println!("\n✅ Seeding completed in {:?}", total_start.elapsed());
    println!("   Login with any seeded username and '{}'", SEED_PASSWORD);
    Ok(())
}

/// Removes seeded accounts. Nurseries, children and subscriptions go with them.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    accounts::clear_accounts(db).await?;
    println!("✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
