use super::{require, CommandDefinition};
use crate::cli::context::{CliMode, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::signed_in(
            "backup",
            "Write a timestamped copy of the data",
            "backup [note]",
            cmd_backup,
        ),
        CommandDefinition::signed_in(
            "backups",
            "List available backups, newest first",
            "backups",
            cmd_backups,
        ),
        CommandDefinition::signed_in(
            "restore",
            "Replace the current data with a backup",
            "restore <backup-name>",
            cmd_restore,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.store.backup(context.manager.state(), note.as_deref())?;
    output::success(format!("Backup written: {}", info.name));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.store.list_backups()?;
    output::section("Backups");
    if backups.is_empty() {
        output::info("No backups yet. Use `backup [note]` to create one.");
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Name"), TableColumn::left("Created (UTC)")]);
    for backup in backups {
        let created = backup
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".into());
        table.push(vec![backup.name, created]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require(args.first().copied(), "restore <backup-name>")?;
    if context.mode == CliMode::Interactive {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Replace current data with `{}`?", name))
            .default(false)
            .interact()?;
        if !proceed {
            output::info("Restore cancelled.");
            return Ok(());
        }
    }
    let state = context.store.read_backup(name)?;
    let committed = context.manager.replace_state(state)?;
    output::success(format!(
        "Restored `{}` ({} transactions).",
        name,
        context.manager.state().transaction_count()
    ));
    context.report_deferred(committed.deferred);
    Ok(())
}
