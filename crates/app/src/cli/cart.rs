use clap::{Args, Subcommand};
use jiff::Timestamp;

use tonda::{cart::NewItem, money};
use tonda_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a menu pizza or wheel offer by catalog id
    Add(AddArgs),
    /// Add a customized pizza as its own line
    AddCustom(AddCustomArgs),
    /// List the cart
    Show,
    /// Replace a line's quantity (zero removes it)
    Quantity(QuantityArgs),
    /// Remove a line
    Remove(RemoveArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Menu pizza id or offer id
    id: String,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct AddCustomArgs {
    /// Menu pizza id
    pizza_id: String,

    /// Customization ids, repeatable
    #[arg(long = "with")]
    with: Vec<String>,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Special instructions
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Debug, Args)]
struct QuantityArgs {
    /// Cart line id
    id: String,

    /// New quantity; zero or negative removes the line
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Cart line id
    id: String,
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add(args) => add(ctx, args).await,
        CartSubcommand::AddCustom(args) => add_custom(ctx, args).await,
        CartSubcommand::Show => show(ctx).await,
        CartSubcommand::Quantity(args) => {
            ctx.orders.update_quantity(&args.id, args.quantity).await;
            show(ctx).await
        }
        CartSubcommand::Remove(args) => {
            ctx.orders.remove_from_cart(&args.id).await;
            show(ctx).await
        }
        CartSubcommand::Clear => {
            ctx.orders.clear_cart().await;
            println!("cart emptied");
            Ok(())
        }
    }
}

async fn add(ctx: &AppContext, args: AddArgs) -> Result<(), String> {
    let item = if let Some(pizza) = ctx.catalog.pizza(&args.id) {
        NewItem {
            id: pizza.id.clone(),
            name: pizza.name.clone(),
            price: pizza.price,
            quantity: args.quantity,
        }
    } else if let Some(offer) = ctx.catalog.offer(&args.id) {
        NewItem {
            id: offer.id.clone(),
            name: offer.name.clone(),
            price: offer.price,
            quantity: args.quantity,
        }
    } else {
        return Err(format!("no pizza or offer with id {}", args.id));
    };

    let name = item.name.clone();

    ctx.orders.add_to_cart(item).await;

    println!("added {} x{}", name, args.quantity);

    Ok(())
}

async fn add_custom(ctx: &AppContext, args: AddCustomArgs) -> Result<(), String> {
    let line_id = ctx
        .orders
        .add_customized(
            &args.pizza_id,
            &args.with,
            args.quantity,
            &args.notes,
            Timestamp::now(),
        )
        .await
        .ok_or_else(|| format!("no pizza with id {}", args.pizza_id))?;

    println!("added customized line {line_id}");

    Ok(())
}

async fn show(ctx: &AppContext) -> Result<(), String> {
    let items = ctx.orders.cart_items().await;

    if items.is_empty() {
        println!("the cart is empty");
        return Ok(());
    }

    for item in &items {
        println!(
            "{:<40} x{:<3} {:>8}  [{}]",
            item.name,
            item.quantity,
            money::format_minor(item.price * u64::from(item.quantity)),
            item.id
        );

        if let Some(notes) = &item.notes {
            println!("    note: {notes}");
        }
    }

    println!("total: {}", money::format_minor(ctx.orders.cart_total_minor().await));

    Ok(())
}
