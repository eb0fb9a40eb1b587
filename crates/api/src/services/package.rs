use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::package as msg;
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::package::{Package, PackageRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, page, record, toggle, BulkResult};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// Validate, reject a second row for the same box and insert, without auditing.
async fn insert_package(svc: &Services, user: &AuthUser, req: &PackageRequest) -> AppResult<Package> {
    req.validate()?;
    let mut package = Package::new(user.client_id(), user.actor(), Utc::now());
    req.apply_to(&mut package);

    // Stock of an existing box is raised through update, not a second row.
    let query = PageQuery::matching(vec![
        Predicate::number_equals("length", package.length),
        Predicate::number_equals("breadth", package.breadth),
        Predicate::number_equals("height", package.height),
    ]);
    let duplicate = svc
        .stores
        .packages
        .page(user.client_id(), &query)
        .await?
        .data
        .iter()
        .any(|p| p.same_dimensions(&package));
    if duplicate {
        return Err(CoreError::validation(msg::DUPLICATE_DIMENSIONS).into());
    }

    Ok(svc.stores.packages.insert(&package).await?)
}

pub async fn create(svc: &Services, user: &AuthUser, req: PackageRequest) -> AppResult<Package> {
    let created = insert_package(svc, user, &req).await?;
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

/// Insert every package that passes on its own. Earlier items of the same
/// batch count for the duplicate-box check of later ones.
pub async fn bulk_create(
    svc: &Services,
    user: &AuthUser,
    items: Vec<PackageRequest>,
) -> AppResult<BulkResult> {
    if items.is_empty() {
        return Err(CoreError::validation(msg::BULK_EMPTY).into());
    }

    let mut result = BulkResult::default();
    for (index, item) in items.iter().enumerate() {
        match insert_package(svc, user, item).await {
            Ok(_) => result.succeeded(),
            Err(e) => result.failed(index, item.package_name.clone(), e),
        }
    }
    Ok(result.finish(svc, user, "package", msg::BULK_INSERTED).await)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: PackageRequest,
) -> AppResult<Package> {
    req.validate()?;
    let mut package = find_live(svc.stores.packages.as_ref(), id, user, msg::INVALID_ID).await?;
    req.apply_to(&mut package);
    package.touch(user.actor(), Utc::now());
    let saved = svc.stores.packages.save(&package).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Package> {
    toggle(svc, svc.stores.packages.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Package> {
    find_live(svc.stores.packages.as_ref(), id, user, msg::INVALID_ID).await
}

/// Every live package of the caller's tenant, newest first.
pub async fn list_all(svc: &Services, user: &AuthUser) -> AppResult<Vec<Package>> {
    let all = PageQuery::matching(Vec::new());
    Ok(svc.stores.packages.page(user.client_id(), &all).await?.data)
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Package>> {
    page(svc.stores.packages.as_ref(), user, req, FILTER_COLUMNS).await
}
