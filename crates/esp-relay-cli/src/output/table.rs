//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use super::OutputFormatter;
use esp_relay_core::{Entity, SwitchState};

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn state_label(state: SwitchState) -> ColoredString {
        match state {
            SwitchState::On => state.as_str().green(),
            SwitchState::Off => state.as_str().yellow(),
        }
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_dispatching(&self, target: &Entity, state: SwitchState) -> Option<String> {
        Some(format!(
            "Controlling relay: object_id='{}', name='{}' -> {}",
            target.object_id,
            target.display_name,
            Self::state_label(state)
        ))
    }

    fn format_switched(&self, target: &Entity, state: SwitchState) -> String {
        format!(
            "{} '{}' ({}) switched {}",
            "[OK]".green(),
            target.display_name,
            target.object_id,
            Self::state_label(state)
        )
    }

    fn format_unresolved(&self, host: &str, catalog: &[Entity]) -> String {
        let header = format!(
            "{} Could not automatically identify relay entity on {}.",
            "[!]".yellow(),
            host
        );

        if catalog.is_empty() {
            return format!("{}\nThe device reported no entities.", header);
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Object ID", "Name", "Type", "Key"]);

        for entity in catalog {
            table.add_row(vec![
                Cell::new(&entity.object_id),
                Cell::new(&entity.display_name),
                Cell::new(&entity.component_type),
                Cell::new(entity.key.to_string()),
            ]);
        }

        format!(
            "{}\nEntities discovered:\n{}\n\nFound {} entity(ies)",
            header,
            table,
            catalog.len()
        )
    }

    fn format_error(&self, error: &str) -> String {
        format!("{} {}", "Error:".red(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_lists_every_entity() {
        let catalog = vec![
            Entity::new("temp", "Temperature", "sensor", 1),
            Entity::new("status", "", "binary_sensor", 2),
        ];
        let text = TableOutput::new().format_unresolved("plug.local", &catalog);

        assert!(text.contains("plug.local"));
        for entity in &catalog {
            assert!(text.contains(&entity.object_id));
            assert!(text.contains(&entity.component_type));
        }
        assert!(text.contains("Temperature"));
        assert!(text.contains("Found 2 entity(ies)"));
    }

    #[test]
    fn test_unresolved_empty_catalog() {
        let text = TableOutput::new().format_unresolved("plug.local", &[]);
        assert!(text.contains("reported no entities"));
    }

    #[test]
    fn test_dispatching_and_switched_name_the_entity() {
        let relay = Entity::new("relay", "Power Relay", "switch", 3);
        let output = TableOutput::new();

        let announce = output.format_dispatching(&relay, SwitchState::On).unwrap();
        assert!(announce.contains("object_id='relay'"));
        assert!(announce.contains("name='Power Relay'"));
        assert!(announce.contains("ON"));

        let done = output.format_switched(&relay, SwitchState::Off);
        assert!(done.contains("Power Relay"));
        assert!(done.contains("OFF"));
    }
}
