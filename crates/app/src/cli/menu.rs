use clap::{Args, ValueEnum};

use tonda::{catalog::PizzaCategory, money};
use tonda_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Show one menu section only
    #[arg(long, value_enum)]
    category: Option<MenuSection>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MenuSection {
    Rosse,
    Bianche,
    Speciali,
}

impl From<MenuSection> for PizzaCategory {
    fn from(section: MenuSection) -> Self {
        match section {
            MenuSection::Rosse => Self::Rosse,
            MenuSection::Bianche => Self::Bianche,
            MenuSection::Speciali => Self::Speciali,
        }
    }
}

pub(crate) fn run(ctx: &AppContext, args: &MenuArgs) -> Result<(), String> {
    let category = args.category.map(PizzaCategory::from);

    for pizza in ctx.catalog.pizzas() {
        if category.is_some_and(|category| pizza.category != category) {
            continue;
        }

        println!(
            "{:>2}  {:<32} {:>8}  {}",
            pizza.id,
            pizza.name,
            money::format_minor(pizza.price),
            pizza.description
        );
    }

    Ok(())
}
