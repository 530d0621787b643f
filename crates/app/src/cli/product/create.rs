use clap::Args;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use settle_app::{
    database::{self, Db},
    domain::products::{
        PgProductsService, ProductsService,
        data::NewProduct,
        records::ProductUuid,
    },
};
use uuid::Uuid;

use crate::cli::display_amount;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Unit price in paise
    #[arg(long)]
    price: u64,

    /// Units available for sale
    #[arg(long)]
    stock: u32,

    /// Optional whole-number percentage off the unit price
    #[arg(long)]
    offer: Option<Decimal>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    if args.price == 0 {
        return Err("price must be greater than 0".to_string());
    }

    if let Some(offer) = args.offer
        && (offer < Decimal::ZERO || offer > Decimal::ONE_HUNDRED)
    {
        return Err("offer must be between 0 and 100".to_string());
    }

    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgProductsService::new(Db::new(pool));

    let product = service
        .create_product(NewProduct {
            uuid: args
                .product_uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            price: args.price,
            stock: args.stock,
            offer: args
                .offer
                .map(|offer| Percentage::from(offer / Decimal::ONE_HUNDRED)),
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("price: {}", display_amount(product.price)?);
    println!("stock: {}", product.stock);

    Ok(())
}
