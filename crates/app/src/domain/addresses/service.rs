//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        addresses::{
            data::NewAddress,
            errors::AddressesServiceError,
            records::{AddressRecord, AddressUuid},
            repository::PgAddressesRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_address(&mut tx, user, &address)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let address = self.repository.get_address(&mut tx, user, address).await?;

        tx.commit().await?;

        Ok(address)
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Save a shipping address for a user.
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Retrieve one of a user's addresses.
    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_address};

    use super::*;

    #[tokio::test]
    async fn get_address_returns_created_address() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let created = ctx.addresses.create_address(user, new_address()).await?;
        let fetched = ctx.addresses.get_address(user, created.uuid).await?;

        assert_eq!(fetched, created);
        assert_eq!(fetched.city, "Kochi");

        Ok(())
    }

    #[tokio::test]
    async fn get_address_of_other_user_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .addresses
            .create_address(UserUuid::new(), new_address())
            .await?;

        let result = ctx
            .addresses
            .get_address(UserUuid::new(), created.uuid)
            .await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
