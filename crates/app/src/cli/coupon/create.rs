use clap::Args;
use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use settle_app::{
    database::{self, Db},
    domain::coupons::{
        CouponsService, PgCouponsService,
        data::NewCoupon,
        records::CouponUuid,
    },
};

use crate::cli::display_amount;

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Code shoppers enter at the cart, e.g. `SAVE10`
    #[arg(long)]
    code: String,

    /// Whole-number percentage off the discounted subtotal, e.g. `10`
    #[arg(long)]
    percent: Decimal,

    /// Smallest discounted subtotal the coupon applies to, in paise
    #[arg(long, default_value_t = 0)]
    min_purchase: u64,

    /// Ceiling on the coupon discount, in paise
    #[arg(long)]
    max_discount: u64,

    /// How many orders may use the coupon
    #[arg(long)]
    max_usage: u32,

    /// RFC 3339 instant after which the coupon is refused
    #[arg(long)]
    expires_at: Timestamp,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    if args.code.trim().is_empty() {
        return Err("code cannot be empty".to_string());
    }

    if args.percent <= Decimal::ZERO || args.percent > Decimal::ONE_HUNDRED {
        return Err("percent must be greater than 0 and at most 100".to_string());
    }

    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCouponsService::new(Db::new(pool));

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code.trim().to_string(),
            discount: Percentage::from(args.percent / Decimal::ONE_HUNDRED),
            min_purchase_amount: args.min_purchase,
            max_discount_amount: args.max_discount,
            max_usage: args.max_usage,
            expires_at: args.expires_at,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("min_purchase: {}", display_amount(coupon.min_purchase_amount)?);
    println!("max_discount: {}", display_amount(coupon.max_discount_amount)?);
    println!("expires_at: {}", coupon.expires_at);

    Ok(())
}
