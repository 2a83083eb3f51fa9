use clap::{Args, Subcommand};
use uuid::Uuid;

use tonda::{cart::ItemStatus, money};
use tonda_app::{context::AppContext, domain::board::models::OrderUuid};

#[derive(Debug, Args)]
pub(crate) struct ChefCommand {
    #[command(subcommand)]
    command: ChefSubcommand,
}

#[derive(Debug, Subcommand)]
enum ChefSubcommand {
    /// Log in as the kitchen
    Login(ChefLoginArgs),
    /// End the chef session
    Logout,
    /// List every order on the board, newest first
    Orders,
    /// Mark one order line as completed
    Complete(CompleteArgs),
}

#[derive(Debug, Args)]
struct ChefLoginArgs {
    /// Chef email
    #[arg(long)]
    email: String,

    /// Chef password
    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Board order id
    order: Uuid,

    /// Zero-based line index within the order
    #[arg(long)]
    item: usize,

    /// Version the edit is based on, as shown by `chef orders`
    #[arg(long)]
    version: u64,
}

pub(crate) async fn run(ctx: &AppContext, command: ChefCommand) -> Result<(), String> {
    match command.command {
        ChefSubcommand::Login(args) => login(ctx, args).await,
        ChefSubcommand::Logout => logout(ctx).await,
        ChefSubcommand::Orders => orders(ctx).await,
        ChefSubcommand::Complete(args) => complete(ctx, args).await,
    }
}

async fn login(ctx: &AppContext, args: ChefLoginArgs) -> Result<(), String> {
    ctx.auth
        .chef_login(&args.email, &args.password)
        .await
        .map_err(|error| format!("chef login failed: {error}"))?;

    println!("chef session started");

    Ok(())
}

async fn logout(ctx: &AppContext) -> Result<(), String> {
    ctx.auth
        .chef_logout()
        .await
        .map_err(|error| format!("chef logout failed: {error}"))?;

    println!("chef session ended");

    Ok(())
}

async fn orders(ctx: &AppContext) -> Result<(), String> {
    require_chef(ctx)?;

    let orders = ctx
        .board
        .list_orders()
        .await
        .map_err(|error| format!("failed to load the board: {error}"))?;

    if orders.is_empty() {
        println!("no orders on the board");
        return Ok(());
    }

    for order in orders {
        println!(
            "order {} | {} | {} | v{}",
            order.uuid, order.user_email, order.placed_at, order.version
        );

        for (index, item) in order.items.iter().enumerate() {
            println!(
                "  [{index}] {:<40} x{:<3} {:>8}  {}",
                item.name,
                item.quantity,
                money::format_minor(item.price * u64::from(item.quantity)),
                status_label(item.status)
            );
        }
    }

    Ok(())
}

async fn complete(ctx: &AppContext, args: CompleteArgs) -> Result<(), String> {
    require_chef(ctx)?;

    let updated = ctx
        .board
        .update_item_status(
            OrderUuid::from_uuid(args.order),
            args.item,
            ItemStatus::Completed,
            args.version,
        )
        .await
        .map_err(|error| format!("status update failed: {error}"))?;

    println!("order {} is now at v{}", updated.uuid, updated.version);

    Ok(())
}

fn require_chef(ctx: &AppContext) -> Result<(), String> {
    if ctx.auth.is_chef_authenticated() {
        Ok(())
    } else {
        Err("only the chef can access the board; run `chef login` first".to_string())
    }
}

fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Pending => "pending",
        ItemStatus::Completed => "completed",
    }
}
