//! Upline and downline walks over the sponsor tree.

use canopy_store::{AccountStore, StoreError};
use canopy_types::AccountId;

/// Ordered ancestors of an account: level 1 is the direct sponsor.
/// Stops at the tree root or after `max_levels`, whichever comes first.
pub fn find_upline(
    accounts: &dyn AccountStore,
    start: AccountId,
    max_levels: u32,
) -> Result<Vec<(AccountId, u32)>, StoreError> {
    let mut upline = Vec::new();
    let mut current = accounts.get_account(start)?.referrer;
    let mut level = 1u32;

    while let Some(id) = current {
        if level > max_levels {
            break;
        }
        upline.push((id, level));
        current = accounts.get_account(id)?.referrer;
        level += 1;
    }
    Ok(upline)
}

/// Full downline of an account as `(descendant, depth)` pairs, depth 1 for
/// directs, depth-first. Callers must bound fan-out for large trees.
pub fn find_downline(
    accounts: &dyn AccountStore,
    root: AccountId,
    max_depth: u32,
) -> Result<Vec<(AccountId, u32)>, StoreError> {
    let mut downline = Vec::new();
    let mut stack: Vec<(AccountId, u32)> = accounts
        .directs_of(root)?
        .into_iter()
        .rev()
        .map(|a| (a.id, 1))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        downline.push((id, depth));
        if depth < max_depth {
            for child in accounts.directs_of(id)?.into_iter().rev() {
                stack.push((child.id, depth + 1));
            }
        }
    }
    Ok(downline)
}
