use clap::Args;
use fabrima::{pricing::discounted_price, views::ALL_CATEGORIES};
use fabrima_app::context::AppContext;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Only list products in this category
    #[arg(long, default_value = ALL_CATEGORIES)]
    category: String,
}

pub(crate) fn run(context: &AppContext, args: &CatalogArgs) -> Result<(), String> {
    let mut storefront = context.storefront();

    storefront.select_category(args.category.as_str());

    let products = storefront.shop();

    if products.is_empty() {
        println!("no products in category {}", args.category);
        println!("categories: {}", context.catalog.categories().join(", "));

        return Ok(());
    }

    let pricing = storefront.pricing();
    let mut builder = Builder::default();

    builder.push_record([
        "Id".to_string(),
        "Name".to_string(),
        "Category".to_string(),
        "Price".to_string(),
        pricing.currency().iso_alpha_code.to_string(),
        "Stock".to_string(),
    ]);

    for product in products {
        let price = discounted_price(product);
        let display = pricing
            .to_money(price)
            .map_err(|error| format!("failed to price {}: {error}", product.id))?;

        let price = match product.discount_percent() {
            0 => price.round_dp(2).to_string(),
            discount => format!("{} (-{discount}%)", price.round_dp(2)),
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            price,
            display.to_string(),
            if product.is_in_stock() { "yes" } else { "no" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());

    println!("{table}");

    Ok(())
}
