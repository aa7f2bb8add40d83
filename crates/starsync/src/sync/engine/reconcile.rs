use crate::collection::{RowCollection, StarredCollection};

use super::super::types::ReconciliationPlan;

/// Compute what must change for the database to mirror the star list.
///
/// Items with no row are created, in star order. Rows whose item is no
/// longer starred are archived, in row order. Runs in `O(|S| + |R|)`.
pub fn reconcile(starred: &StarredCollection, rows: &RowCollection) -> ReconciliationPlan {
    let to_create = starred
        .iter()
        .filter(|item| !rows.contains_source_id(item.source_id))
        .cloned()
        .collect();

    let to_delete = rows
        .iter()
        .filter(|row| !starred.contains(row.source_id))
        .cloned()
        .collect();

    ReconciliationPlan {
        to_create,
        to_delete,
    }
}
