//! Account Administration CLI
//!
//! Runs the account operations directly against the configured database,
//! without going through the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;

use account_service::{
    config::AppConfig,
    database::{ensure_schema, ConnectionProvider},
    models::auth::{ALREADY_REGISTERED, REGISTRATION_SUCCESS},
    service::{EmailService, LogNotifier, RegistrationNotifier, UserService, UserServiceError},
};

/// Account administration CLI
#[derive(Parser)]
#[command(name = "account-admin", about = "Account administration CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the users table if it does not exist
    InitSchema,
    /// Register a new account
    Register(RegisterArgs),
    /// Check whether an email is already registered
    Check(EmailArgs),
    /// Validate an email/password pair
    Login(LoginArgs),
    /// Print the first name of an account holder
    FirstName(EmailArgs),
    /// Print the postal address of an account holder
    Address(EmailArgs),
}

#[derive(Args)]
struct RegisterArgs {
    /// Full name
    #[arg(short, long)]
    name: String,

    /// Mobile number
    #[arg(short, long)]
    mobile: i64,

    /// Email address
    #[arg(short, long)]
    email: String,

    /// Postal address
    #[arg(short, long)]
    address: String,

    /// Postal code
    #[arg(long)]
    pincode: i64,

    /// Password
    #[arg(short, long)]
    password: String,
}

#[derive(Args)]
struct EmailArgs {
    /// Email address
    email: String,
}

#[derive(Args)]
struct LoginArgs {
    /// Email address
    email: String,

    /// Password
    #[arg(short, long)]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let provider = ConnectionProvider::connect(config.database.clone())
        .await
        .context("failed to connect to the database")?;
    ensure_schema(&provider)
        .await
        .context("failed to prepare the database schema")?;

    let notifier: Arc<dyn RegistrationNotifier> = match config.email.clone() {
        Some(email_config) => Arc::new(EmailService::new(email_config)?),
        None => Arc::new(LogNotifier),
    };
    let service = UserService::with_notifier(provider.clone(), notifier);

    let outcome = match cli.command {
        Commands::InitSchema => {
            println!("Schema ready on {}", provider.config().driver);
            Ok(())
        }
        Commands::Register(args) => register(&service, args).await,
        Commands::Check(args) => check(&service, args).await,
        Commands::Login(args) => login(&service, args).await,
        Commands::FirstName(args) => first_name(&service, args).await,
        Commands::Address(args) => address(&service, args).await,
    };

    provider.close().await;
    outcome
}

async fn register(service: &UserService, args: RegisterArgs) -> anyhow::Result<()> {
    let result = service
        .register_user(
            &args.name,
            args.mobile,
            &args.email,
            &args.address,
            args.pincode,
            &args.password,
        )
        .await;

    match result {
        Ok(user) => {
            println!("{}", REGISTRATION_SUCCESS);
            println!("   Name: {}", user.name);
            println!("   Email: {}", user.email);
            Ok(())
        }
        Err(UserServiceError::EmailAlreadyRegistered) => {
            println!("{}", ALREADY_REGISTERED);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn check(service: &UserService, args: EmailArgs) -> anyhow::Result<()> {
    let registered = service.is_registered(&args.email).await?;
    if registered {
        println!("{} is registered", args.email);
    } else {
        println!("{} is not registered", args.email);
    }
    Ok(())
}

async fn login(service: &UserService, args: LoginArgs) -> anyhow::Result<()> {
    let check = service
        .validate_credential(&args.email, &args.password)
        .await?;
    println!("{}", check.as_status());
    Ok(())
}

async fn first_name(service: &UserService, args: EmailArgs) -> anyhow::Result<()> {
    match service.get_first_name(&args.email).await? {
        Some(name) => println!("{}", name),
        None => println!("No account found for {}", args.email),
    }
    Ok(())
}

async fn address(service: &UserService, args: EmailArgs) -> anyhow::Result<()> {
    match service.get_address(&args.email).await? {
        Some(address) => println!("{}", address),
        None => println!("No account found for {}", args.email),
    }
    Ok(())
}
