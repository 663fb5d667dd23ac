use chrono::{Datelike, Local, NaiveDate};

use super::{parse_amount, parse_date, require, CommandDefinition, ParsedArgs};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{TransactionFilter, TypeFilter};
use crate::core::Committed;
use crate::ledger::{MonthKey, TransactionDraft, TransactionKind, TransactionStatus};

const ADD_USAGE: &str =
    "add <income|expense> <amount> <description> [--category name] [--date YYYY-MM-DD] [--pending]";
const EDIT_USAGE: &str = "edit <id> [--description text] [--amount n] [--type income|expense] \
                          [--category name] [--date YYYY-MM-DD] [--status pending|confirmed]";
const LIST_USAGE: &str = "list [search] [--type all|income|expense]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::signed_in(
            "add",
            "Record a transaction in the active month",
            ADD_USAGE,
            cmd_add,
        ),
        CommandDefinition::signed_in(
            "edit",
            "Change fields of a transaction",
            EDIT_USAGE,
            cmd_edit,
        ),
        CommandDefinition::signed_in(
            "confirm",
            "Mark a pending transaction as settled",
            "confirm <id>",
            cmd_confirm,
        ),
        CommandDefinition::signed_in("remove", "Delete a transaction", "remove <id>", cmd_remove),
        CommandDefinition::signed_in(
            "list",
            "List transactions of the active month",
            LIST_USAGE,
            cmd_list,
        ),
    ]
}

fn parse_kind(input: &str) -> Result<TransactionKind, CommandError> {
    match input.to_ascii_lowercase().as_str() {
        "income" | "in" => Ok(TransactionKind::Income),
        "expense" | "out" => Ok(TransactionKind::Expense),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown transaction type `{}` (use income or expense)",
            other
        ))),
    }
}

fn parse_status(input: &str) -> Result<TransactionStatus, CommandError> {
    match input.to_ascii_lowercase().as_str() {
        "pending" => Ok(TransactionStatus::Pending),
        "confirmed" => Ok(TransactionStatus::Confirmed),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown status `{}` (use pending or confirmed)",
            other
        ))),
    }
}

/// Today when `month` is the current month, otherwise its first day this year.
fn default_date(month: MonthKey) -> NaiveDate {
    let today = Local::now().date_naive();
    if MonthKey::of_date(today) == month {
        return today;
    }
    NaiveDate::from_ymd_opt(today.year(), month.index() as u32 + 1, 1).unwrap_or(today)
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["pending"])?;
    let kind = parse_kind(require(parsed.positional(0), ADD_USAGE)?)?;
    let amount = parse_amount(require(parsed.positional(1), ADD_USAGE)?)?;
    let description = parsed.positional.get(2..).unwrap_or_default().join(" ");
    if description.is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", ADD_USAGE)));
    }
    let month = context.month;
    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => default_date(month),
    };
    let status = if parsed.switch("pending") {
        TransactionStatus::Pending
    } else {
        TransactionStatus::Confirmed
    };
    let draft = TransactionDraft::new(
        description,
        amount,
        kind,
        parsed.option("category").unwrap_or_default(),
        date,
    )
    .with_status(status);

    let Committed { value: id, deferred } = context.manager.add_transaction(month, draft)?;
    output::success(format!(
        "Added {} {} in {} ({}).",
        kind.label(),
        context.money(amount),
        month,
        short_id(&id)
    ));
    context.report_deferred(deferred);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let month = context.month;
    let id = context
        .manager
        .resolve_id(month, require(parsed.positional(0), EDIT_USAGE)?)?;
    let mut transaction = context
        .manager
        .state()
        .month(month)
        .and_then(|ledger| ledger.transaction(&id))
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("transaction `{}` vanished", id)))?;

    if let Some(description) = parsed.option("description") {
        transaction.description = description.to_string();
    }
    if let Some(amount) = parsed.option("amount") {
        transaction.amount = parse_amount(amount)?;
    }
    if let Some(kind) = parsed.option("type") {
        transaction.kind = parse_kind(kind)?;
    }
    if let Some(category) = parsed.option("category") {
        transaction.category = category.to_string();
    }
    if let Some(date) = parsed.option("date") {
        transaction.date = parse_date(date)?;
    }
    if let Some(status) = parsed.option("status") {
        transaction.status = parse_status(status)?;
    }

    let committed = context.manager.update_transaction(month, transaction)?;
    output::success(format!("Updated transaction {}.", short_id(&id)));
    context.report_deferred(committed.deferred);
    Ok(())
}

fn cmd_confirm(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = context.month;
    let id = context
        .manager
        .resolve_id(month, require(args.first().copied(), "confirm <id>")?)?;
    let Committed { value: previous, deferred } = context.manager.confirm_transaction(month, &id)?;
    match previous {
        TransactionStatus::Confirmed => {
            output::info(format!("Transaction {} was already confirmed.", short_id(&id)))
        }
        TransactionStatus::Pending => {
            output::success(format!("Confirmed transaction {}.", short_id(&id)))
        }
    }
    context.report_deferred(deferred);
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = context.month;
    let id = context
        .manager
        .resolve_id(month, require(args.first().copied(), "remove <id>")?)?;
    let Committed { value: removed, deferred } = context.manager.remove_transaction(month, &id)?;
    output::success(format!("Removed `{}`.", removed.description));
    context.report_deferred(deferred);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let kind = match parsed.option("type").map(str::to_ascii_lowercase).as_deref() {
        None | Some("all") => TypeFilter::All,
        Some("income") => TypeFilter::Income,
        Some("expense") => TypeFilter::Expense,
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown type filter `{}`; usage: {}",
                other, LIST_USAGE
            )))
        }
    };
    let filter = TransactionFilter::new(parsed.positional.join(" "), kind);
    let month = context.month;
    let matches = context.manager.filter_transactions(month, &filter);

    output::section(format!("{} transactions", month));
    if matches.is_empty() {
        output::info("No transactions match.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Description").max_width(32),
        TableColumn::left("Category").max_width(16),
        TableColumn::left("Type"),
        TableColumn::left("Status"),
        TableColumn::right("Amount"),
    ]);
    for txn in &matches {
        table.push(vec![
            short_id(&txn.id).to_string(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.description.clone(),
            txn.category.clone(),
            txn.kind.label().to_string(),
            txn.status.label().to_string(),
            context.money(txn.signed_amount()),
        ]);
    }
    output::info(table.render());
    output::info(format!("{} transaction(s).", matches.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_date_falls_in_the_requested_month() {
        for month in MonthKey::ALL {
            assert_eq!(MonthKey::of_date(default_date(month)), month);
        }
    }

    #[test]
    fn kind_and_status_parsing() {
        assert_eq!(parse_kind("Income").unwrap(), TransactionKind::Income);
        assert_eq!(parse_kind("out").unwrap(), TransactionKind::Expense);
        assert!(parse_kind("transfer").is_err());
        assert_eq!(parse_status("PENDING").unwrap(), TransactionStatus::Pending);
        assert_eq!(short_id("abc"), "abc");
    }
}
