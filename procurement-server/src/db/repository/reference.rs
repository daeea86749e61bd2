//! Reference Data Repository (users, suppliers, products, contracts)
//!
//! Read side is what the integrity auditor needs: existence checks and
//! dataset-wide orphan scans. Inserts exist for data import and tests.

use super::RepoResult;
use sqlx::SqliteExecutor;

// ============================================================================
// Existence checks
// ============================================================================

async fn exists(exec: impl SqliteExecutor<'_>, sql: &str, id: i64) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>(sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(found.is_some())
}

pub async fn user_exists(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    exists(exec, "SELECT id FROM app_user WHERE id = ?", id).await
}

pub async fn supplier_exists(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    exists(exec, "SELECT id FROM supplier WHERE id = ?", id).await
}

pub async fn product_exists(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    exists(exec, "SELECT id FROM product WHERE id = ?", id).await
}

/// `None` if the contract does not exist, otherwise its active flag
pub async fn contract_active(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<bool>> {
    let active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM contract WHERE id = ?")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(active)
}

// ============================================================================
// Orphan scans
// ============================================================================

/// Orders whose user reference is missing or dangling
pub async fn orphan_order_ids(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT o.id FROM purchase_order o LEFT JOIN app_user u ON u.id = o.user_id WHERE u.id IS NULL ORDER BY o.id",
    )
    .fetch_all(exec)
    .await?;
    Ok(ids)
}

/// Supplier groups whose supplier does not exist
pub async fn orphan_group_ids(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT g.id FROM order_supplier g LEFT JOIN supplier s ON s.id = g.supplier_id WHERE s.id IS NULL ORDER BY g.id",
    )
    .fetch_all(exec)
    .await?;
    Ok(ids)
}

/// Items whose product does not exist
pub async fn orphan_item_ids(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT i.id FROM order_item i LEFT JOIN product p ON p.id = i.product_id WHERE p.id IS NULL ORDER BY i.id",
    )
    .fetch_all(exec)
    .await?;
    Ok(ids)
}

// ============================================================================
// Inserts
// ============================================================================

pub async fn create_user(exec: impl SqliteExecutor<'_>, name: &str) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO app_user (name, is_active, created_at) VALUES (?1, 1, ?2) RETURNING id",
    )
    .bind(name)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

pub async fn create_supplier(exec: impl SqliteExecutor<'_>, name: &str) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO supplier (name, is_active, created_at) VALUES (?1, 1, ?2) RETURNING id",
    )
    .bind(name)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

pub async fn create_product(exec: impl SqliteExecutor<'_>, name: &str) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product (name, created_at) VALUES (?1, ?2) RETURNING id",
    )
    .bind(name)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

pub async fn create_contract(
    exec: impl SqliteExecutor<'_>,
    supplier_id: i64,
    number: &str,
    is_active: bool,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO contract (supplier_id, number, is_active, created_at) VALUES (?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(supplier_id)
    .bind(number)
    .bind(is_active)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}
