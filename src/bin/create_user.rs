//! Provision an editorial account that can sign in to `/gerencia`.

use std::env;
use std::process::ExitCode;

use clap::Parser;
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;

use pushkind_news::MIGRATIONS;
use pushkind_news::db::establish_connection_pool;
use pushkind_news::models::config::ServerConfig;
use pushkind_news::repository::DieselRepository;
use pushkind_news::services::ServiceError;
use pushkind_news::services::auth::register_user;

#[derive(Debug, Parser)]
#[command(about = "Create a user for the news management section")]
struct Args {
    /// Login name of the new account.
    username: String,
    /// Password; read from NEWS_USER_PASSWORD when omitted.
    #[arg(long, env = "NEWS_USER_PASSWORD", hide_env_values = true)]
    password: String,
    /// Database to write to instead of the configured one.
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();

    let database_url = match args.database_url {
        Some(url) => url,
        None => match ServerConfig::load(env::var("APP_ENV").ok().as_deref()) {
            Ok(config) => config.database_url,
            Err(e) => {
                log::error!("Failed to load configuration: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = conn.run_pending_migrations(MIGRATIONS) {
                log::error!("Failed to run migrations: {e}");
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            log::error!("Failed to get a connection for migrations: {e}");
            return ExitCode::FAILURE;
        }
    }

    let repo = DieselRepository::new(pool);
    match register_user(&args.username, &args.password, &repo) {
        Ok(user) => {
            println!("Created user {} with id {}", user.username, user.id);
            ExitCode::SUCCESS
        }
        Err(ServiceError::Form(errors)) => {
            eprintln!("{errors}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Failed to create user: {e}");
            ExitCode::FAILURE
        }
    }
}
