use clap::{Args, Subcommand};
use jiff::Timestamp;

use tonda::{cart::NewItem, cooldown, money};
use tonda_app::{
    context::AppContext,
    domain::wheel::service::{SpinBlock, SpinOutcome},
};

#[derive(Debug, Args)]
pub(crate) struct WheelCommand {
    #[command(subcommand)]
    command: WheelSubcommand,
}

#[derive(Debug, Subcommand)]
enum WheelSubcommand {
    /// Spin the wheel and drop the won offer in the cart
    Spin,
    /// Show whether the wheel is open
    Status,
}

pub(crate) async fn run(ctx: &AppContext, command: WheelCommand) -> Result<(), String> {
    match command.command {
        WheelSubcommand::Spin => spin(ctx).await,
        WheelSubcommand::Status => status(ctx).await,
    }
}

async fn spin(ctx: &AppContext) -> Result<(), String> {
    let state = ctx.orders.wheel_state().await;
    let outcome = ctx
        .wheel
        .attempt_spin(state, Timestamp::now(), &mut rand::thread_rng());

    match outcome {
        SpinOutcome::Won { offer, .. } => {
            println!(
                "the wheel stopped on {} at {}!",
                offer.name,
                money::format_minor(offer.price)
            );

            ctx.orders
                .add_to_cart(NewItem {
                    id: offer.id,
                    name: offer.name,
                    price: offer.price,
                    quantity: 1,
                })
                .await;

            println!("the offer is in your cart; confirm the order to redeem it");

            Ok(())
        }
        SpinOutcome::Blocked(SpinBlock::OfferInCart) => {
            Err("an offer is already in your cart; confirm or remove it first".to_string())
        }
        SpinOutcome::Blocked(SpinBlock::Cooldown { remaining_ms, clock }) => Err(format!(
            "the wheel reopens in {clock} ({})",
            cooldown::humanize(remaining_ms)
        )),
        SpinOutcome::Blocked(SpinBlock::NoOffers) => {
            Err("no offers on the wheel".to_string())
        }
    }
}

async fn status(ctx: &AppContext) -> Result<(), String> {
    let state = ctx.orders.wheel_state().await;
    let now = Timestamp::now();

    if cooldown::can_spin(
        state.has_offer_in_cart,
        state.redeemed_any,
        state.last_spin,
        now,
    ) {
        println!("the wheel is open");
    } else if state.has_offer_in_cart {
        println!("blocked: an unconfirmed offer is in the cart");
    } else {
        let remaining_ms = cooldown::remaining_ms(state.last_spin, now);

        println!("on cooldown: {} remaining", cooldown::clock_format(remaining_ms));
    }

    Ok(())
}
