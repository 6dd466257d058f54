//! Nurseries and everything that hangs off them.

use chrono::NaiveTime;
use creche_models::{ActivityType, PlanDuration};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::batch::values_clause;
use super::models::{
    ActivitySeed, ClassroomSeed, GroupSeed, NurserySeed, OpeningHourSeed, PlanSeed,
};

const CLASSROOM_NAMES: &[&str] = &[
    "Bébés", "Petits", "Moyens", "Grands", "Lutins", "Papillons", "Coccinelles", "Oursons",
];

const ACTIVITY_NAMES: &[(&str, ActivityType)] = &[
    ("Peinture", ActivityType::Cultural),
    ("Éveil musical", ActivityType::Cultural),
    ("Motricité", ActivityType::Recreational),
    ("Jardinage", ActivityType::Educational),
    ("Lecture de contes", ActivityType::Educational),
    ("Pâte à modeler", ActivityType::Recreational),
    ("Sortie au parc", ActivityType::Other),
];

const PLANS: &[(&str, i64, PlanDuration)] = &[
    ("Journée", 3_500, PlanDuration::Day),
    ("Mensuel", 45_000, PlanDuration::Month),
    ("Trimestriel", 125_000, PlanDuration::Quarter),
    ("Annuel", 450_000, PlanDuration::Year),
];

pub fn generate_nurseries(manager_ids: &[Uuid]) -> Vec<NurserySeed> {
    manager_ids
        .par_iter()
        .enumerate()
        .map(|(idx, manager_id)| {
            let company: String = CompanyName().fake();
            let city: String = CityName().fake();
            let street: String = StreetName().fake();
            let building: String = BuildingNumber().fake();

            NurserySeed {
                manager_id: *manager_id,
                name: format!("Crèche {}", company),
                address: format!("{} {}, {}", building, street, city),
                contact_number: format!("01{:08}", idx % 100_000_000),
                information: Sentence(6..12).fake(),
                max_age: (3..7).fake(),
                max_children_per_class: (8..25).fake(),
            }
        })
        .collect()
}

/// Monday to Friday 07:30-18:30, closed on weekends.
pub fn weekly_hours(nursery_ids: &[Uuid]) -> Vec<OpeningHourSeed> {
    let open = NaiveTime::from_hms_opt(7, 30, 0);
    let close = NaiveTime::from_hms_opt(18, 30, 0);

    nursery_ids
        .iter()
        .flat_map(|nursery_id| {
            (0..7).map(move |day| {
                let is_closed = day >= 5;
                OpeningHourSeed {
                    nursery_id: *nursery_id,
                    day,
                    open_time: if is_closed { None } else { open },
                    close_time: if is_closed { None } else { close },
                    is_closed,
                }
            })
        })
        .collect()
}

pub fn generate_classrooms(nursery_ids: &[Uuid], per_nursery: usize) -> Vec<ClassroomSeed> {
    nursery_ids
        .par_iter()
        .flat_map(|nursery_id| {
            (0..per_nursery)
                .map(|idx| {
                    let base = CLASSROOM_NAMES[idx % CLASSROOM_NAMES.len()];
                    let name = if idx < CLASSROOM_NAMES.len() {
                        base.to_string()
                    } else {
                        format!("{} {}", base, idx / CLASSROOM_NAMES.len() + 1)
                    };
                    let age_range_start = (idx % 4) as i32;
                    ClassroomSeed {
                        nursery_id: *nursery_id,
                        name,
                        capacity: (10..20).fake(),
                        age_range_start,
                        age_range_end: age_range_start + 1,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_groups(classroom_ids: &[Uuid], per_classroom: usize) -> Vec<GroupSeed> {
    classroom_ids
        .iter()
        .flat_map(|classroom_id| {
            (0..per_classroom).map(move |idx| GroupSeed {
                classroom_id: *classroom_id,
                name: format!("Groupe {}", idx + 1),
            })
        })
        .collect()
}

pub fn generate_activities(nursery_ids: &[Uuid], per_nursery: usize) -> Vec<ActivitySeed> {
    nursery_ids
        .par_iter()
        .flat_map(|nursery_id| {
            (0..per_nursery)
                .map(|idx| {
                    let (name, activity_type) = ACTIVITY_NAMES[idx % ACTIVITY_NAMES.len()];
                    ActivitySeed {
                        nursery_id: *nursery_id,
                        name: name.to_string(),
                        description: Sentence(4..10).fake(),
                        activity_type,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn standard_plans(nursery_ids: &[Uuid]) -> Vec<PlanSeed> {
    nursery_ids
        .iter()
        .flat_map(|nursery_id| {
            PLANS.iter().map(move |(name, price, duration)| PlanSeed {
                nursery_id: *nursery_id,
                name: name.to_string(),
                price: *price,
                duration: *duration,
            })
        })
        .collect()
}

/// Inserts verified, online nurseries. Returns their ids in input order.
pub async fn seed_nurseries(
    db: &PgPool,
    nurseries: &[NurserySeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} nurseries...", nurseries.len());

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(nurseries.len());

    for chunk in nurseries.chunks(1000) {
        let query = format!(
            "INSERT INTO nurseries (manager_id, name, address, contact_number, information, \
             max_age, max_children_per_class, legal_status, verified, online) VALUES {} RETURNING id",
            values_clause(chunk.len(), 10)
        );
        let mut q = sqlx::query_scalar::<_, Uuid>(&query);
        for nursery in chunk {
            q = q
                .bind(nursery.manager_id)
                .bind(&nursery.name)
                .bind(&nursery.address)
                .bind(&nursery.contact_number)
                .bind(&nursery.information)
                .bind(nursery.max_age)
                .bind(nursery.max_children_per_class)
                .bind("agreed")
                .bind(true)
                .bind(true);
        }
        ids.extend(q.fetch_all(&mut *tx).await?);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} nurseries in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub async fn seed_opening_hours(
    db: &PgPool,
    hours: &[OpeningHourSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🕖 Seeding {} opening hours...", hours.len());

    let mut tx = db.begin().await?;

    for chunk in hours.chunks(2000) {
        let query = format!(
            "INSERT INTO opening_hours (nursery_id, day, open_time, close_time, is_closed) VALUES {}",
            values_clause(chunk.len(), 5)
        );
        let mut q = sqlx::query(&query);
        for hour in chunk {
            q = q
                .bind(hour.nursery_id)
                .bind(hour.day)
                .bind(hour.open_time)
                .bind(hour.close_time)
                .bind(hour.is_closed);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted opening hours in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn seed_classrooms(
    db: &PgPool,
    classrooms: &[ClassroomSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧸 Seeding {} classrooms...", classrooms.len());

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(classrooms.len());

    for chunk in classrooms.chunks(2000) {
        let query = format!(
            "INSERT INTO classrooms (nursery_id, name, capacity, age_range_start, age_range_end) \
             VALUES {} RETURNING id",
            values_clause(chunk.len(), 5)
        );
        let mut q = sqlx::query_scalar::<_, Uuid>(&query);
        for classroom in chunk {
            q = q
                .bind(classroom.nursery_id)
                .bind(&classroom.name)
                .bind(classroom.capacity)
                .bind(classroom.age_range_start)
                .bind(classroom.age_range_end);
        }
        ids.extend(q.fetch_all(&mut *tx).await?);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} classrooms in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub async fn seed_groups(
    db: &PgPool,
    groups: &[GroupSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👶 Seeding {} groups...", groups.len());

    let mut tx = db.begin().await?;

    for chunk in groups.chunks(5000) {
        let query = format!(
            "INSERT INTO classroom_groups (classroom_id, name) VALUES {}",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query(&query);
        for group in chunk {
            q = q.bind(group.classroom_id).bind(&group.name);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted groups in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn seed_activities(
    db: &PgPool,
    activities: &[ActivitySeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🎨 Seeding {} activities...", activities.len());

    let mut tx = db.begin().await?;

    for chunk in activities.chunks(2000) {
        let query = format!(
            "INSERT INTO activities (nursery_id, name, description, activity_type) VALUES {}",
            values_clause(chunk.len(), 4)
        );
        let mut q = sqlx::query(&query);
        for activity in chunk {
            q = q
                .bind(activity.nursery_id)
                .bind(&activity.name)
                .bind(&activity.description)
                .bind(activity.activity_type);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted activities in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn seed_plans(db: &PgPool, plans: &[PlanSeed]) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("💶 Seeding {} plans...", plans.len());

    let mut tx = db.begin().await?;

    for chunk in plans.chunks(2000) {
        let query = format!(
            "INSERT INTO plans (nursery_id, name, price, duration) VALUES {}",
            values_clause(chunk.len(), 4)
        );
        let mut q = sqlx::query(&query);
        for plan in chunk {
            q = q
                .bind(plan.nursery_id)
                .bind(&plan.name)
                .bind(plan.price)
                .bind(plan.duration);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted plans in {:?}", start_time.elapsed());
    Ok(())
}
