use crate::common::*;
use crate::scenarios::Scenario;

pub struct ListCommand {
    output_manager: OutputManager,
}

impl ListCommand {
    pub fn new() -> Self {
        Self {
            output_manager: OutputManager::new(),
        }
    }

    pub fn list(&self) -> Result<()> {
        self.output_manager.print_green("Available scenarios:");
        for scenario in Scenario::ALL {
            self.output_manager.print_blue(scenario.name());
            println!("  {}", scenario.description());
            if scenario.overlays().is_empty() {
                self.output_manager.print_gray("  overlays: (base manifest only)");
            } else {
                self.output_manager
                    .print_gray(&format!("  overlays: {}", scenario.overlays().join(", ")));
            }
        }
        Ok(())
    }
}

impl Default for ListCommand {
    fn default() -> Self {
        Self::new()
    }
}
