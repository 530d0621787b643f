//! Auth middleware.

use salvo::prelude::*;
use settle_app::domain::users::UserUuid;
use uuid::Uuid;

use crate::{auth::USER_UUID_HEADER, extensions::*};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(user) = extract_user_uuid(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid X-User-Uuid header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_user_uuid(user);

    ctrl.call_next(req, depot, res).await;
}

fn extract_user_uuid(req: &Request) -> Option<UserUuid> {
    let value = req.headers().get(USER_UUID_HEADER)?.to_str().ok()?;

    Uuid::parse_str(value.trim())
        .ok()
        .filter(|uuid| !uuid.is_nil())
        .map(UserUuid::from_uuid)
}
