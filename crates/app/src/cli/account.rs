use clap::{Args, Subcommand};

use tonda_app::{auth::models::NewAccount, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log in to an existing account
    Login(LoginArgs),
    /// End the customer session
    Logout,
    /// Show the active sessions
    Whoami,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// First name
    #[arg(long)]
    name: String,

    /// Family name
    #[arg(long)]
    surname: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Password
    #[arg(long)]
    password: String,

    /// Delivery address
    #[arg(long)]
    address: Option<String>,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Contact email
    #[arg(long)]
    email: String,

    /// Password
    #[arg(long)]
    password: String,
}

pub(crate) async fn run(ctx: &AppContext, command: AccountCommand) -> Result<(), String> {
    match command.command {
        AccountSubcommand::Register(args) => register(ctx, args).await,
        AccountSubcommand::Login(args) => login(ctx, args).await,
        AccountSubcommand::Logout => logout(ctx).await,
        AccountSubcommand::Whoami => whoami(ctx),
    }
}

async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<(), String> {
    let user = ctx
        .auth
        .register(NewAccount {
            name: args.name,
            surname: args.surname,
            email: args.email,
            password: args.password,
            address: args.address,
        })
        .await
        .map_err(|error| format!("registration failed: {error}"))?;

    println!("registered and logged in as {}", user.email);

    Ok(())
}

async fn login(ctx: &AppContext, args: LoginArgs) -> Result<(), String> {
    let user = ctx
        .auth
        .login(&args.email, &args.password)
        .await
        .map_err(|error| format!("login failed: {error}"))?;

    println!("logged in as {}", user.email);

    Ok(())
}

async fn logout(ctx: &AppContext) -> Result<(), String> {
    ctx.auth
        .logout()
        .await
        .map_err(|error| format!("logout failed: {error}"))?;

    println!("logged out");

    Ok(())
}

fn whoami(ctx: &AppContext) -> Result<(), String> {
    match ctx.auth.current_user() {
        Some(user) => println!("customer: {} ({} {})", user.email, user.name, user.surname),
        None => println!("customer: guest"),
    }

    if let Some(chef) = ctx.auth.current_chef() {
        println!("chef: {}", chef.email);
    }

    Ok(())
}
