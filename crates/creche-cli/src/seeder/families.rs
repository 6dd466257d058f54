//! Children of seeded parents.

use chrono::{Days, Local};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::batch::values_clause;
use super::models::ChildSeed;

/// Children aged between a few months and five years.
pub fn generate_children(parent_ids: &[Uuid], per_parent: usize) -> Vec<ChildSeed> {
    let today = Local::now().date_naive();

    parent_ids
        .par_iter()
        .flat_map(|parent_id| {
            let last_name: String = LastName().fake();
            (0..per_parent)
                .filter_map(|_| {
                    let age_days: u64 = (90..1800).fake();
                    Some(ChildSeed {
                        parent_id: *parent_id,
                        first_name: FirstName().fake(),
                        last_name: last_name.clone(),
                        birthday: today.checked_sub_days(Days::new(age_days))?,
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_children(
    db: &PgPool,
    children: &[ChildSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🍼 Seeding {} children...", children.len());

    let mut tx = db.begin().await?;

    for chunk in children.chunks(5000) {
        let query = format!(
            "INSERT INTO children (parent_id, first_name, last_name, birthday) VALUES {}",
            values_clause(chunk.len(), 4)
        );
        let mut q = sqlx::query(&query);
        for child in chunk {
            q = q
                .bind(child.parent_id)
                .bind(&child.first_name)
                .bind(&child.last_name)
                .bind(child.birthday);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} children in {:?}",
        children.len(),
        start_time.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siblings_share_last_name() {
        let parent = Uuid::new_v4();
        let children = generate_children(&[parent], 3);
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.last_name == children[0].last_name));
        assert!(children.iter().all(|c| c.birthday < Local::now().date_naive()));
    }
}
