use super::{require, CommandDefinition};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::CategoryService;
use crate::core::Committed;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::signed_in(
            "categories",
            "List registered categories",
            "categories",
            cmd_categories,
        ),
        CommandDefinition::signed_in(
            "category-add",
            "Register a new category",
            "category-add <name>",
            cmd_category_add,
        ),
    ]
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Categories");
    for category in context.manager.categories() {
        output::info(format!("  {}", category.name));
    }
    Ok(())
}

fn cmd_category_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let joined = (!args.is_empty()).then(|| args.join(" "));
    let name = require(joined.as_deref(), "category-add <name>")?.to_string();
    let known = CategoryService::find(context.manager.state(), &name).is_ok();
    let Committed { value: category, deferred } = context.manager.add_category(&name)?;
    if known {
        output::info(format!("Category `{}` already exists.", category.name));
    } else {
        output::success(format!("Category `{}` added.", category.name));
    }
    context.report_deferred(deferred);
    Ok(())
}
