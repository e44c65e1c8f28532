use std::io;

use clap::{Args, Subcommand};
use fabrima::products::ProductId;
use fabrima_app::{context::AppContext, storefront::Storefront};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add one unit of a product
    Add(ProductArgs),

    /// Increase a line's quantity by one
    Inc(ProductArgs),

    /// Decrease a line's quantity by one, never below one
    Dec(ProductArgs),

    /// Remove a line
    Remove(ProductArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id, e.g. `na-1`
    id: String,
}

impl ProductArgs {
    fn id(&self) -> ProductId {
        ProductId::new(self.id.as_str())
    }
}

pub(crate) fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let mut storefront = context.storefront();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            storefront
                .add_to_cart(&args.id())
                .map_err(|error| error.to_string())?;
        }
        CartSubcommand::Inc(args) => {
            storefront.update_quantity(&args.id(), 1);
        }
        CartSubcommand::Dec(args) => {
            storefront.update_quantity(&args.id(), -1);
        }
        CartSubcommand::Remove(args) => {
            storefront.remove_from_cart(&args.id());
        }
        CartSubcommand::Clear => {
            storefront.clear_cart();
        }
    }

    print_cart(&storefront)
}

fn print_cart(storefront: &Storefront) -> Result<(), String> {
    storefront
        .write_cart(io::stdout().lock())
        .map_err(|error| format!("failed to print cart: {error}"))?;

    for notification in storefront.notifications() {
        println!("* {}", notification.message);
    }

    Ok(())
}
