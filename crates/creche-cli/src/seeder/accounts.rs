//! Fake accounts with their profiles.

use creche_models::UserType;
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::batch::values_clause;
use super::models::AccountSeed;

/// Generates `count` accounts. `run_tag` keeps usernames unique across runs.
pub fn generate_accounts(
    count: usize,
    prefix: &str,
    run_tag: &str,
    password_hash: &str,
) -> Vec<AccountSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let username = format!("{}{}_{}", prefix, idx, run_tag);
            let city: String = CityName().fake();
            let street: String = StreetName().fake();
            let building: String = BuildingNumber().fake();

            AccountSeed {
                email: format!(
                    "{}.{}+{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    username
                ),
                username,
                first_name,
                last_name,
                password_hash: password_hash.to_string(),
                contact: format!("06{:08}", idx % 100_000_000),
                address: format!("{} {}, {}", building, street, city),
            }
        })
        .collect()
}

/// Inserts accounts and profiles of `user_type`. Returns profile ids in input order.
pub async fn seed_accounts(
    db: &PgPool,
    accounts: &[AccountSeed],
    user_type: UserType,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} {} accounts...", accounts.len(), user_type);

    let mut tx = db.begin().await?;

    // 6 params per user
    const BATCH_SIZE: usize = 1000;

    let mut profile_ids = Vec::with_capacity(accounts.len());
    for chunk in accounts.chunks(BATCH_SIZE) {
        let user_ids = insert_users_chunk(&mut tx, chunk).await?;
        let ids = insert_profiles_chunk(&mut tx, &user_ids, chunk, user_type).await?;
        profile_ids.extend(ids);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} accounts in {:?}",
        profile_ids.len(),
        start_time.elapsed()
    );
    Ok(profile_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    accounts: &[AccountSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if accounts.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (username, email, password, first_name, last_name, is_staff) VALUES {} RETURNING id",
        values_clause(accounts.len(), 6)
    );

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for account in accounts {
        q = q
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(false);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_profiles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[Uuid],
    accounts: &[AccountSeed],
    user_type: UserType,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO profiles (user_id, contact, address, user_type) VALUES {} RETURNING id",
        values_clause(user_ids.len(), 4)
    );

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for (user_id, account) in user_ids.iter().zip(accounts) {
        q = q
            .bind(user_id)
            .bind(&account.contact)
            .bind(&account.address)
            .bind(user_type);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Deletes seeded accounts. Staff accounts are kept.
pub async fn clear_accounts(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded accounts...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE '%@example.com' AND NOT is_staff")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} accounts in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_accounts_are_unique() {
        let accounts = generate_accounts(50, "parent", "abc123", "hash");
        assert_eq!(accounts.len(), 50);

        let usernames: HashSet<_> = accounts.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(usernames.len(), 50);
        assert!(accounts.iter().all(|a| a.email.ends_with("@example.com")));
        assert!(accounts.iter().all(|a| a.contact.len() <= 15));
    }
}
