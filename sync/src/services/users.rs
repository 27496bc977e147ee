use common::error::Res;
use db::{Stores, models::user::User};
use sqlx::PgPool;

use crate::dtos::report::SyncReport;

/// What a single sync did to the replica row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
}

/// Pushes one online user into the offline replica. Inserts the row if the
/// id is new, otherwise overwrites it with the online state. Running it
/// twice with the same user leaves the replica unchanged.
pub async fn sync_user(offline: &PgPool, user: &User) -> Res<SyncAction> {
    if db::replica::exists_replica_user(offline, user.id).await? {
        db::replica::update_replica_user(offline, user).await?;
        log::info!("Synced user {} to the offline store (updated)", user.email);
        Ok(SyncAction::Updated)
    } else {
        db::replica::insert_replica_user(offline, user).await?;
        log::info!("Synced user {} to the offline store (created)", user.email);
        Ok(SyncAction::Created)
    }
}

/// Fire-and-forget variant used on the request path. The caller's response
/// never waits on the offline store; a failure is logged and left for the
/// next bulk sync to repair.
pub fn spawn_sync_user(offline: PgPool, user: User) {
    tokio::spawn(async move {
        if let Err(error) = sync_user(&offline, &user).await {
            log::error!(
                "Background sync of user {} to the offline store failed: {}",
                user.id,
                error
            );
        }
    });
}

/// Walks every online user and upserts it into the replica. One bad row does
/// not stop the sweep; it is counted as failed and the sweep moves on.
pub async fn sync_all_users(stores: &Stores) -> Res<SyncReport> {
    let users = db::user::all_users(&stores.online).await?;
    let total = users.len() as i64;

    let mut success_count = 0;
    let mut fail_count = 0;
    for user in &users {
        match sync_user(&stores.offline, user).await {
            Ok(_) => success_count += 1,
            Err(error) => {
                fail_count += 1;
                log::error!("Bulk sync skipped user {}: {}", user.id, error);
            }
        }
    }

    log::info!(
        "Bulk user sync finished: {} synced, {} failed, {} total",
        success_count,
        fail_count,
        total
    );

    Ok(SyncReport {
        success_count,
        fail_count,
        total,
    })
}
