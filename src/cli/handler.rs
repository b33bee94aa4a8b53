use crate::cli::args::*;
use crate::commands::*;
use crate::common::*;
use std::path::PathBuf;

pub struct CommandHandler {
    working_directory: PathBuf,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            working_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run {
                home,
                bosh,
                config,
                vars_file,
                scenarios,
                timeout,
                report,
                quiet,
            } => {
                let options = RunOptions {
                    settings: SettingsOverrides {
                        config_file: config,
                        cf_deployment_home: home,
                        bosh_binary: bosh,
                        vars_file,
                        timeout_secs: timeout,
                    },
                    scenarios,
                    report_file: report,
                    quiet,
                };

                let runner = RunCommand::new(self.working_directory.clone());
                runner.execute(options).await
            }
            Commands::List => {
                let lister = ListCommand::new();
                lister.list()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_handler_creation() {
        let handler = CommandHandler::new();
        assert!(handler.working_directory.exists());
    }

    #[tokio::test]
    async fn test_unknown_scenario_fails_before_setup() {
        let handler = CommandHandler::new();
        let result = handler
            .handle_command(Commands::Run {
                home: None,
                bosh: None,
                config: None,
                vars_file: None,
                scenarios: vec!["not-an-overlay.yml".to_string()],
                timeout: None,
                report: None,
                quiet: true,
            })
            .await;

        assert!(matches!(result, Err(HarnessError::ValidationError(_))));
    }
}
