use clap::{Parser, Subcommand};
use creche_cli::admin::{self, NewAdmin};
use creche_cli::seeder::{self, PerNursery, SeedConfig};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use std::error::Error;

#[derive(Parser)]
#[command(name = "creche-cli")]
#[command(about = "Creche CLI - Administrative tools for Creche", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a platform administrator account
    CreateAdmin {
        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake nurseries, parents and children
    Seed {
        /// Number of nurseries (one manager each)
        #[arg(short = 'n', long, default_value = "5")]
        nurseries: usize,

        /// Classrooms per nursery
        #[arg(long, default_value = "3")]
        classrooms: usize,

        /// Groups per classroom
        #[arg(long, default_value = "2")]
        groups: usize,

        /// Activities per nursery
        #[arg(long, default_value = "5")]
        activities: usize,

        /// Parents per nursery
        #[arg(long, default_value = "10")]
        parents: usize,

        /// Children per parent
        #[arg(long, default_value = "2")]
        children: usize,
    },
    /// Clear all seeded data (keeps staff accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let username = prompt_if_missing(username, "Username")?;
            let email = prompt_if_missing(email, "Email")?;
            let first_name = prompt_if_missing(first_name, "First name")?;
            let last_name = prompt_if_missing(last_name, "Last name")?;
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            };

            let user_id = admin::create_admin(
                &pool,
                &NewAdmin {
                    username: &username,
                    email: &email,
                    first_name: &first_name,
                    last_name: &last_name,
                    password: &password,
                },
            )
            .await?;
            println!("✅ Admin '{}' created ({})", username, user_id);
        }
        Commands::Seed {
            nurseries,
            classrooms,
            groups,
            activities,
            parents,
            children,
        } => {
            let config = SeedConfig::new(nurseries).with_per_nursery(PerNursery {
                classrooms,
                groups_per_classroom: groups,
                activities,
                parents,
                children_per_parent: children,
            });
            seeder::seed_all(&pool, config).await?;
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await?,
    }

    Ok(())
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String, dialoguer::Error> {
    match value {
        Some(value) => Ok(value),
        None => Input::new().with_prompt(prompt).interact_text(),
    }
}
