use clap::Args;
use jiff::Timestamp;

use tonda_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Confirm without an account; the order reaches the kitchen stamped
    /// as a guest and earns no redemptions
    #[arg(long)]
    guest: bool,
}

pub(crate) async fn run(ctx: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    if ctx.orders.cart_items().await.is_empty() {
        return Err("the cart is empty".to_string());
    }

    let now = Timestamp::now();

    let confirmed = if args.guest {
        ctx.orders.confirm_as_guest(now).await
    } else {
        if !ctx.auth.is_authenticated() {
            return Err(
                "no customer session; log in first or pass --guest".to_string()
            );
        }

        ctx.orders.confirm_order(now).await
    };

    match confirmed {
        Some(order) => println!("order {order} confirmed"),
        None => println!("nothing to confirm"),
    }

    Ok(())
}
