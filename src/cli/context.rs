//! Shell state, dispatch and error reporting.

use std::{io, path::Path};

use strsim::levenshtein;

use crate::{
    auth::{AuthError, JsonCredentialStore, Session},
    config::{Config, ConfigError, ConfigManager},
    core::{services::ServiceError, FinanceManager},
    errors::LedgerError,
    ledger::MonthKey,
    storage::JsonStateStore,
    utils::paths,
};

use super::commands::{self, CommandRegistry};
use super::output;

const SAVE_HINT: &str = "The change is kept. Run `save` to retry writing it to disk.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: FinanceManager,
    pub store: JsonStateStore,
    pub credentials: JsonCredentialStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub session: Option<Session>,
    pub month: MonthKey,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, &paths::app_data_dir())
    }

    /// Opens every store under `base`.
    pub fn with_base_dir(mode: CliMode, base: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.color_enabled);

        let store = JsonStateStore::new(base, Some(config.backup_retention))?;
        let (manager, report) = FinanceManager::open(Box::new(store.clone()))?;
        let manager = manager.with_save_retries(config.save_retries);
        for note in &report.migrations {
            output::info(format!("Migration: {}", note));
        }
        for warning in &report.warnings {
            output::warning(warning);
        }

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager,
            store,
            credentials: JsonCredentialStore::new(paths::users_file_in(base)),
            config_manager,
            config,
            session: None,
            month: MonthKey::current(),
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!(
                "finance[{}@{}]> ",
                session.display_name(),
                self.month.short_name()
            ),
            None => "finance> ".to_string(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn require_session(&self) -> Result<&Session, CommandError> {
        self.session.as_ref().ok_or(CommandError::NotSignedIn)
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        self.config.format_money(amount)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some((handler, requires_session)) = self
            .registry
            .get(command)
            .map(|definition| (definition.handler, definition.requires_session))
        else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        if requires_session && self.session.is_none() {
            return Err(CommandError::NotSignedIn);
        }
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        dialoguer::Confirm::new()
            .with_prompt("Exit shell?")
            .default(true)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))
    }

    /// Warns that an applied change is still waiting to be written to disk.
    pub(crate) fn report_deferred(&self, deferred: Option<LedgerError>) {
        if let Some(err) = deferred {
            output::warning(err);
            output::hint(SAVE_HINT);
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NotSignedIn => {
                output::error("Sign in first.");
                output::hint("Use `login <email> <password>` or `signup` to create an account.");
            }
            CommandError::Ledger(err) if err.is_deferred_save() => {
                output::warning(err);
                output::hint(SAVE_HINT);
            }
            other => output::error(other),
        }
    }
}
