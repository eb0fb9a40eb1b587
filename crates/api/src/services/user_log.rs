use bizhub_core::pagination::{PaginatedResponse, PaginationRequest};
use bizhub_db::models::user_log::{UserLog, FILTER_COLUMNS};

use super::page;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// Activity feed of the caller's tenant, newest first.
pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<UserLog>> {
    page(svc.stores.user_logs.as_ref(), user, req, FILTER_COLUMNS).await
}

#[cfg(test)]
mod tests {
    use bizhub_core::audit::action_types;
    use bizhub_core::pagination::FilterCondition;

    use super::*;
    use crate::services::record;
    use crate::services::test_support::Harness;

    #[tokio::test]
    async fn test_feed_is_tenant_scoped_and_filterable() {
        let h = Harness::new();
        let acme = h.tenant("Acme").await;
        let globex = h.tenant("Globex").await;
        record(&h.svc, &acme, action_types::INSERT, "Successfully inserted lead. Id: 1".into())
            .await;
        record(&h.svc, &acme, action_types::UPDATE, "Successfully updated lead. Id: 1".into())
            .await;
        record(&h.svc, &globex, action_types::INSERT, "Successfully inserted lead. Id: 2".into())
            .await;

        let all = list(&h.svc, &acme, &PaginationRequest::new(0, 10)).await.unwrap();
        assert_eq!(all.total_data_count, 2);
        assert_eq!(all.data[0].action, action_types::UPDATE);

        let mut req = PaginationRequest::new(0, 10);
        req.filters.push(FilterCondition {
            column: "action".into(),
            operator: "equals".into(),
            value: Some("insert".into()),
        });
        let inserts = list(&h.svc, &acme, &req).await.unwrap();
        assert_eq!(inserts.total_data_count, 1);
        assert_eq!(inserts.data[0].route, acme.route);
    }
}
