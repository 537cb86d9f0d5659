//! Pure domain services.

use super::ConnectionId;

/// Select broadcast targets among room members, dropping `exclude` if given.
pub fn broadcast_targets(
    members: Vec<ConnectionId>,
    exclude: Option<ConnectionId>,
) -> Vec<ConnectionId> {
    match exclude {
        Some(excluded) => members.into_iter().filter(|id| *id != excluded).collect(),
        None => members,
    }
}
