//! Editing helpers for the weekly availability field.
//!
//! Entries keep insertion order; a day never appears twice and never with an
//! empty slot list.

use super::field::AvailabilityEntry;

/// Check or uncheck one `(day, slot)` cell.
pub fn toggle_slot(entries: &mut Vec<AvailabilityEntry>, day: &str, slot: &str, checked: bool) {
    let position = entries.iter().position(|e| e.day == day);
    match (position, checked) {
        (Some(i), true) => {
            let slots = &mut entries[i].time_slots;
            if !slots.iter().any(|s| s == slot) {
                slots.push(slot.to_string());
            }
        }
        (None, true) => entries.push(AvailabilityEntry::new(day, vec![slot.to_string()])),
        (Some(i), false) => {
            entries[i].time_slots.retain(|s| s != slot);
            if entries[i].time_slots.is_empty() {
                entries.remove(i);
            }
        }
        (None, false) => {}
    }
}

/// Slots booked for `day`, empty when none.
pub fn slots_for_day<'a>(entries: &'a [AvailabilityEntry], day: &str) -> &'a [String] {
    entries
        .iter()
        .find(|e| e.day == day)
        .map(|e| e.time_slots.as_slice())
        .unwrap_or(&[])
}
