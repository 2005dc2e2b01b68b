//! Mode cycling within a light's mode group.

use crate::types::ModeId;

/// Returns the mode that follows `current` in `group`, wrapping after the
/// last entry.
///
/// A `current` that is not in the group (for example a stale id restored
/// from storage) yields the group's first entry. An empty group, which a
/// validated catalog never has, leaves `current` unchanged.
pub fn next_mode(group: &[ModeId], current: ModeId) -> ModeId {
    let Some(&first) = group.first() else {
        return current;
    };

    match group.iter().position(|&id| id == current) {
        Some(i) => group.get(i + 1).copied().unwrap_or(first),
        None => {
            debug!("{} is outside its group, falling back to {}", current, first);
            first
        }
    }
}
