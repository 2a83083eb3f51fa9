use tonda::money;
use tonda_app::context::AppContext;

pub(crate) fn run(ctx: &AppContext) -> Result<(), String> {
    for offer in ctx.catalog.offers() {
        let original = offer
            .original_price
            .map(|price| format!(" (was {})", money::format_minor(price)))
            .unwrap_or_default();

        let discount = offer
            .discount
            .map(|percent| format!(" -{percent}%"))
            .unwrap_or_default();

        println!(
            "{:<8} {:<32} {:>8}{original}{discount}  {}",
            offer.id,
            offer.name,
            money::format_minor(offer.price),
            offer.description
        );
    }

    Ok(())
}
