use std::collections::HashMap;

use chrono::NaiveDate;

pub mod advice;
pub mod backup;
pub mod category;
pub mod month;
pub mod session;
pub mod system;
pub mod transaction;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::ledger::MonthKey;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(session::definitions());
    commands.extend(month::definitions());
    commands.extend(transaction::definitions());
    commands.extend(category::definitions());
    commands.extend(advice::definitions());
    commands.extend(backup::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub requires_session: bool,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            requires_session: false,
        }
    }

    /// Same as [`CommandDefinition::new`] but refused until someone signs in.
    pub const fn signed_in(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            requires_session: true,
            ..Self::new(name, description, usage, handler)
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub positional: Vec<String>,
    options: HashMap<String, String>,
    switches: Vec<String>,
}

impl ParsedArgs {
    /// Splits `args`; names listed in `switches` never consume a value.
    pub fn parse(args: &[&str], switches: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg.to_string());
                continue;
            };
            let name = name.to_ascii_lowercase();
            if switches.contains(&name.as_str()) {
                parsed.switches.push(name);
                continue;
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`--{}` needs a value", name))
            })?;
            parsed.options.insert(name, value.to_string());
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|switch| switch == name)
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}

pub(crate) fn parse_month(input: &str) -> Result<MonthKey, CommandError> {
    input.parse().map_err(|err: crate::ledger::ParseMonthError| {
        CommandError::InvalidArguments(err.to_string())
    })
}

/// Month named by `arg`, or the shell's selected month.
pub(crate) fn month_or_selected(
    context: &ShellContext,
    arg: Option<&str>,
) -> Result<MonthKey, CommandError> {
    arg.map(parse_month).unwrap_or(Ok(context.month))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Accepts `12.5`, `12,50` and `1.234,56`.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let trimmed = input.trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

pub(crate) fn require<'a>(value: Option<&'a str>, usage: &str) -> Result<&'a str, CommandError> {
    value.ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_args_split_options_and_switches() {
        let parsed = ParsedArgs::parse(
            &["expense", "42", "--category", "Food", "--pending", "Lunch"],
            &["pending"],
        )
        .unwrap();
        assert_eq!(parsed.positional, vec!["expense", "42", "Lunch"]);
        assert_eq!(parsed.option("category"), Some("Food"));
        assert!(parsed.switch("pending"));
        assert!(ParsedArgs::parse(&["--date"], &[]).is_err());
    }

    #[test]
    fn amounts_accept_both_decimal_marks() {
        assert_eq!(parse_amount("12.5").unwrap(), 12.5);
        assert_eq!(parse_amount("12,50").unwrap(), 12.5);
        assert_eq!(parse_amount("1.234,56").unwrap(), 1234.56);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn registry_keeps_declaration_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names.first(), Some(&"help"));
        assert!(names.contains(&"chain"));
        assert!(registry.get("add").map(|def| def.requires_session).unwrap_or(false));
        assert!(!registry.get("login").map(|def| def.requires_session).unwrap_or(true));
    }
}
