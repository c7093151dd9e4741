use clap::{Parser, Subcommand};
use devcamper_cli::admin::create_admin;
use devcamper_cli::seeder::{self, SeedConfig};
use devcamper_db::{PgPool, init_db_pool};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "devcamper-cli")]
#[command(about = "DevCamper CLI - Administrative tools for the DevCamper API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake publishers, bootcamps, courses and reviews
    Seed {
        /// Number of publishers; each owns one bootcamp
        #[arg(short = 'b', long, default_value = "4")]
        publishers: usize,

        /// Number of reviewer accounts
        #[arg(short = 'u', long, default_value = "10")]
        users: usize,

        /// Courses per bootcamp
        #[arg(long, default_value = "3")]
        courses: usize,

        /// Reviews per bootcamp
        #[arg(long, default_value = "2")]
        reviews: usize,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match init_db_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            publishers,
            users,
            courses,
            reviews,
        } => {
            let config = SeedConfig::new(publishers)
                .with_users(users)
                .with_courses(courses)
                .with_reviews(reviews);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

fn prompt_or_exit<T>(value: Result<T, dialoguer::Error>, what: &str) -> T {
    value.unwrap_or_else(|e| {
        eprintln!("❌ Failed to read {}: {}", what, e);
        std::process::exit(1);
    })
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| {
        prompt_or_exit(Input::new().with_prompt("Name").interact_text(), "name")
    });

    let email = email.unwrap_or_else(|| {
        prompt_or_exit(
            Input::new().with_prompt("Email address").interact_text(),
            "email",
        )
    });

    let password = password.unwrap_or_else(|| {
        prompt_or_exit(
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact(),
            "password",
        )
    });

    match create_admin(pool, &name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    match seeder::clear_all(pool).await {
        Ok(_) => println!("✅ Seeded data cleared"),
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
}
