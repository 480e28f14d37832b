//! Relay selection over a device's entity catalog.
//!
//! Typed switches are preferred. When several exist, one whose id or name
//! mentions "relay" wins; otherwise the first one does. Without any typed
//! switch, the whole catalog is searched for a relay-named entity. Ties
//! always go to the earliest entity in catalog order.

use crate::entity::Entity;

/// Substring marking an entity as the power relay.
pub const RELAY_MARKER: &str = "relay";

/// Check whether the entity's object id or display name mentions "relay".
pub fn is_relay_named(entity: &Entity) -> bool {
    contains_marker(&entity.object_id) || contains_marker(&entity.display_name)
}

fn contains_marker(value: &str) -> bool {
    value.to_lowercase().contains(RELAY_MARKER)
}

/// Select the entity to control, or `None` when nothing qualifies.
pub fn resolve(catalog: &[Entity]) -> Option<&Entity> {
    let switches: Vec<&Entity> = catalog.iter().filter(|e| e.is_switch()).collect();

    match switches.as_slice() {
        [] => catalog.iter().find(|e| is_relay_named(e)),
        [only] => Some(*only),
        [first, ..] => Some(
            switches
                .iter()
                .copied()
                .find(|e| is_relay_named(e))
                .unwrap_or(*first),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(object_id: &str, name: &str, component_type: &str, key: u32) -> Entity {
        Entity::new(object_id, name, component_type, key)
    }

    #[test]
    fn test_single_typed_switch() {
        let catalog = vec![
            entity("temperature", "Temperature", "sensor", 1),
            entity("plug", "Outlet", "switch", 2),
            entity("status_led", "Status LED", "light", 3),
        ];
        assert_eq!(resolve(&catalog).map(|e| e.key), Some(2));
    }

    #[test]
    fn test_single_typed_switch_ignores_relay_names_elsewhere() {
        let catalog = vec![
            entity("relay_light", "Relay Light", "light", 1),
            entity("outlet", "Outlet", "switch", 2),
        ];
        assert_eq!(resolve(&catalog).map(|e| e.key), Some(2));
    }

    #[test]
    fn test_multiple_typed_switches_prefers_relay() {
        let catalog = vec![
            entity("switch1", "", "switch", 1),
            entity("relay_main", "", "switch", 2),
        ];
        assert_eq!(
            resolve(&catalog).map(|e| e.object_id.as_str()),
            Some("relay_main")
        );
    }

    #[test]
    fn test_multiple_typed_switches_relay_in_display_name() {
        let catalog = vec![
            entity("button_lock", "Child Lock", "switch", 1),
            entity("output", "Power Relay", "switch", 2),
            entity("relay_two", "", "switch", 3),
        ];
        assert_eq!(resolve(&catalog).map(|e| e.key), Some(2));
    }

    #[test]
    fn test_multiple_typed_switches_without_relay_takes_first() {
        let catalog = vec![entity("a", "", "switch", 1), entity("b", "", "switch", 2)];
        assert_eq!(resolve(&catalog).map(|e| e.object_id.as_str()), Some("a"));
    }

    #[test]
    fn test_fallback_to_relay_named_entity() {
        let catalog = vec![entity("relay_power", "", "light", 9)];
        assert_eq!(
            resolve(&catalog).map(|e| e.object_id.as_str()),
            Some("relay_power")
        );
    }

    #[test]
    fn test_fallback_first_match_wins() {
        let catalog = vec![
            entity("uptime", "Uptime", "sensor", 1),
            entity("", "Relay A", "", 2),
            entity("relay_b", "", "", 3),
        ];
        assert_eq!(resolve(&catalog).map(|e| e.key), Some(2));
    }

    #[test]
    fn test_no_match() {
        let catalog = vec![entity("temp", "", "sensor", 1)];
        assert!(resolve(&catalog).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(resolve(&[]).is_none());
    }

    #[test]
    fn test_empty_identifiers_are_not_faults() {
        let catalog = vec![entity("", "", "", 1), entity("", "", "sensor", 2)];
        assert!(resolve(&catalog).is_none());
    }

    #[test]
    fn test_component_type_match_is_case_sensitive() {
        let catalog = vec![entity("outlet", "Outlet", "SWITCH", 1)];
        assert!(resolve(&catalog).is_none());
    }

    #[test]
    fn test_case_insensitive_marker() {
        let upper = vec![entity("RELAY_1", "", "light", 1)];
        let lower = vec![entity("relay_1", "", "light", 1)];
        assert!(is_relay_named(&upper[0]));
        assert_eq!(resolve(&upper).map(|e| e.key), Some(1));
        assert_eq!(resolve(&lower).map(|e| e.key), Some(1));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let catalog = vec![
            entity("a", "", "switch", 1),
            entity("b_relay", "", "switch", 2),
            entity("c", "", "sensor", 3),
        ];
        let snapshot = catalog.clone();
        let first = resolve(&catalog).cloned();
        let second = resolve(&catalog).cloned();
        assert_eq!(first, second);
        assert_eq!(catalog, snapshot);
    }
}
