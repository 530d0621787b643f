//! Response helper extensions.

use salvo::{
    http::header::LOCATION,
    prelude::{Response, StatusCode, StatusError},
};
use tracing::error;

pub(crate) trait CreatedExt {
    /// Mark the response `201 Created` with a `Location` header pointing at `location`.
    fn created_at(&mut self, location: String) -> Result<&mut Self, StatusError>;
}

impl CreatedExt for Response {
    fn created_at(&mut self, location: String) -> Result<&mut Self, StatusError> {
        self.add_header(LOCATION, location, true).map_err(|error| {
            error!(%error, "failed to set location header");

            StatusError::internal_server_error()
        })?;

        Ok(self.status_code(StatusCode::CREATED))
    }
}
