use super::{month_or_selected, parse_month, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::ledger::MonthKey;

const TOP_CATEGORIES: usize = 5;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::signed_in(
            "month",
            "Show or select the active month",
            "month [name]",
            cmd_month,
        ),
        CommandDefinition::signed_in(
            "carry",
            "Show or change whether the month imports the previous balance",
            "carry [on|off|toggle]",
            cmd_carry,
        ),
        CommandDefinition::signed_in(
            "summary",
            "Headline figures of a month",
            "summary [month]",
            cmd_summary,
        ),
        CommandDefinition::signed_in(
            "chain",
            "Cumulative confirmed balance from January through a month",
            "chain [month]",
            cmd_chain,
        ),
        CommandDefinition::signed_in(
            "overview",
            "Yearly flow per month and the largest expense categories",
            "overview",
            cmd_overview,
        ),
    ]
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        context.month = parse_month(name)?;
    }
    let month = context.month;
    let carry = if context.manager.carries_over(month) {
        "on"
    } else {
        "off"
    };
    output::info(format!(
        "Active month: {} ({} transactions, carry-over {})",
        month,
        context.manager.transactions(month).len(),
        carry
    ));
    Ok(())
}

fn cmd_carry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = context.month;
    let (enabled, deferred) = match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => (context.manager.carries_over(month), None),
        Some("on") => (true, context.manager.set_carry_over(month, true)?.deferred),
        Some("off") => (false, context.manager.set_carry_over(month, false)?.deferred),
        Some("toggle") => {
            let committed = context.manager.toggle_carry_over(month)?;
            (committed.value, committed.deferred)
        }
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "expected on, off or toggle, got `{}`",
                other
            )))
        }
    };
    if month.is_first() && enabled {
        output::warning("January has no previous month; the flag has no effect.");
    }
    output::info(format!(
        "Carry-over for {} is {} (opening balance {}).",
        month,
        if enabled { "on" } else { "off" },
        context.money(context.manager.carry_amount(month))
    ));
    context.report_deferred(deferred);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_or_selected(context, args.first().copied())?;
    let summary = context.manager.month_summary(month);
    let money = |amount: f64| output::signed(amount, context.money(amount));

    output::section(format!("{} summary", month));
    output::info(format!("  Carried in        : {}", money(summary.carry_amount)));
    output::info(format!("  Confirmed income  : {}", context.money(summary.confirmed_income())));
    output::info(format!("  Confirmed expense : {}", context.money(summary.confirmed_expense())));
    output::info(format!("  Pending income    : {}", context.money(summary.pending_income())));
    output::info(format!("  Pending expense   : {}", context.money(summary.pending_expense())));
    output::info(format!("  Realized this month: {}", money(summary.realized())));
    output::info(format!("  Net balance       : {}", money(summary.net())));
    output::info(format!("  Projected balance : {}", money(summary.projected())));
    output::info(format!("  Transactions      : {}", summary.transaction_count));
    Ok(())
}

fn cmd_chain(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = month_or_selected(context, args.first().copied())?;
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::left("Carry"),
        TableColumn::right("Realized"),
        TableColumn::right("Chain"),
    ]);
    for month in target.through() {
        let summary = context.manager.month_summary(month);
        let carries = context.manager.carries_over(month);
        table.push(vec![
            month.name().to_string(),
            carry_label(month, carries).to_string(),
            context.money(summary.realized()),
            context.money(context.manager.balance_chain(month)),
        ]);
    }
    output::section(format!("Balance chain through {}", target));
    output::info(table.render());
    Ok(())
}

fn cmd_overview(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut flow = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expense"),
    ]);
    for entry in context.manager.monthly_flow() {
        flow.push(vec![
            entry.month.short_name().to_string(),
            context.money(entry.income),
            context.money(entry.expense),
        ]);
    }
    output::section("Monthly flow (all statuses)");
    output::info(flow.render());

    let ranked = context.manager.top_expense_categories(TOP_CATEGORIES);
    output::section("Top expense categories");
    if ranked.is_empty() {
        output::info("No expenses recorded yet.");
        return Ok(());
    }
    let mut categories = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Total"),
    ]);
    for entry in ranked {
        categories.push(vec![entry.name, context.money(entry.total)]);
    }
    output::info(categories.render());
    Ok(())
}

fn carry_label(month: MonthKey, carries: bool) -> &'static str {
    match (month.is_first(), carries) {
        (true, _) => "-",
        (false, true) => "on",
        (false, false) => "off",
    }
}
