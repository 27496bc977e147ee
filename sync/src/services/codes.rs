use std::collections::HashSet;

use common::error::Res;
use db::Stores;

use crate::dtos::report::DivergenceReport;

/// Cap on how many codes the report lists per side. The counts are always
/// exact; only the listings are truncated.
const MISSING_CODES_CAP: usize = 100;

/// Compares the code sets of the two stores.
///
/// The fast path compares per-store digests (count + md5 over the sorted
/// code strings) and answers without pulling any codes. Only when the
/// digests differ are both sets fetched and diffed to name the codes each
/// store is missing.
pub async fn code_divergence(stores: &Stores) -> Res<DivergenceReport> {
    let online = db::codes::code_set_digest(&stores.online).await?;
    let offline = db::codes::code_set_digest(&stores.offline).await?;

    if online.total == offline.total && online.hash == offline.hash {
        return Ok(DivergenceReport {
            divergent: false,
            online,
            offline,
            missing_online: Vec::new(),
            missing_offline: Vec::new(),
        });
    }

    let online_set: HashSet<String> = db::codes::all_code_strings(&stores.online)
        .await?
        .into_iter()
        .collect();
    let offline_set: HashSet<String> = db::codes::all_code_strings(&stores.offline)
        .await?
        .into_iter()
        .collect();

    let mut missing_offline: Vec<String> =
        online_set.difference(&offline_set).cloned().collect();
    let mut missing_online: Vec<String> =
        offline_set.difference(&online_set).cloned().collect();
    missing_offline.sort();
    missing_online.sort();

    log::warn!(
        "Code stores diverged: {} codes missing offline, {} codes missing online",
        missing_offline.len(),
        missing_online.len()
    );

    missing_offline.truncate(MISSING_CODES_CAP);
    missing_online.truncate(MISSING_CODES_CAP);

    Ok(DivergenceReport {
        divergent: true,
        online,
        offline,
        missing_online,
        missing_offline,
    })
}
