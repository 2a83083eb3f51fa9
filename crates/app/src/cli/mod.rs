use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};

use tonda_app::{context::AppContext, storage::DirStore};

mod account;
mod cart;
mod checkout;
mod chef;
mod menu;
mod offers;
mod wheel;

#[derive(Debug, Parser)]
#[command(name = "tonda", about = "Tonda pizzeria ordering CLI", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the key-value records.
    #[arg(long, env = "TONDA_DATA_DIR", default_value = ".tonda", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Customer account and session
    Account(account::AccountCommand),
    /// Browse the pizza menu
    Menu(menu::MenuArgs),
    /// Browse the wheel offer catalog
    Offers,
    /// Manage the cart
    Cart(cart::CartCommand),
    /// Confirm the cart as an order
    Checkout(checkout::CheckoutArgs),
    /// Spin the fortune wheel
    Wheel(wheel::WheelCommand),
    /// Chef order board
    Chef(chef::ChefCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let store = DirStore::open(&self.data_dir)
            .await
            .map_err(|error| format!("failed to open data directory: {error}"))?;

        let ctx = AppContext::with_store(Arc::new(store))
            .await
            .map_err(|error| format!("failed to initialize: {error}"))?;

        match self.command {
            Commands::Account(command) => account::run(&ctx, command).await,
            Commands::Menu(args) => menu::run(&ctx, &args),
            Commands::Offers => offers::run(&ctx),
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Checkout(args) => checkout::run(&ctx, args).await,
            Commands::Wheel(command) => wheel::run(&ctx, command).await,
            Commands::Chef(command) => chef::run(&ctx, command).await,
        }
    }
}
