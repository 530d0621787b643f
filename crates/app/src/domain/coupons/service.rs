//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::coupons::{
        data::NewCoupon, errors::CouponsServiceError, records::CouponRecord,
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(coupon_uuid = %coupon.uuid, code = %coupon.code),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_coupon(&mut tx, &coupon).await?;

        tx.commit().await?;

        info!(coupon_uuid = %created.uuid, "created coupon");

        Ok(created)
    }

    async fn get_coupon_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coupon = self.repository.get_coupon_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(coupon)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Issue a new coupon.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Look a coupon up by its code.
    async fn get_coupon_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;
}
