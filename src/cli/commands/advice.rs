use super::{month_or_selected, CommandDefinition};
use crate::advisor::{self, OfflineAdvisor};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::signed_in(
        "advise",
        "Commentary on a month's real and projected balance",
        "advise [month]",
        cmd_advise,
    )]
}

fn cmd_advise(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_or_selected(context, args.first().copied())?;
    let service = OfflineAdvisor::new(context.config.clone());
    let text = advisor::advise(&service, month, context.manager.transactions(month));
    output::section(format!("Advice for {}", month));
    output::info(text);
    Ok(())
}
