use super::{parse_date, require, CommandDefinition, ParsedArgs};
use crate::auth::{normalize_email, CredentialStore, Session};
use crate::cli::context::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;

const SIGNUP_USAGE: &str = "signup <name> <email> <birth-date YYYY-MM-DD> [password]";
const LOGIN_USAGE: &str = "login [email] [password] [--forget]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("signup", "Create an account and sign in", SIGNUP_USAGE, cmd_signup),
        CommandDefinition::new(
            "login",
            "Sign in (remembers the e-mail unless --forget)",
            LOGIN_USAGE,
            cmd_login,
        ),
        CommandDefinition::signed_in("logout", "Sign out", "logout", cmd_logout),
        CommandDefinition::new(
            "reset-password",
            "Request password reset instructions",
            "reset-password <email>",
            cmd_reset_password,
        ),
    ]
}

/// Uses the given password, or asks for one when running interactively.
fn password_arg(
    context: &ShellContext,
    given: Option<&str>,
    confirm: bool,
    usage: &str,
) -> Result<String, CommandError> {
    if let Some(password) = given {
        return Ok(password.to_string());
    }
    if context.mode == CliMode::Script {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

fn cmd_signup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let name = require(parsed.positional(0), SIGNUP_USAGE)?;
    let email = require(parsed.positional(1), SIGNUP_USAGE)?;
    let birth_date = parse_date(require(parsed.positional(2), SIGNUP_USAGE)?)?;
    let password = password_arg(context, parsed.positional(3), true, SIGNUP_USAGE)?;

    let profile = context.credentials.register(name, email, &password, birth_date)?;
    output::success(format!("Welcome, {}! Your account is ready.", profile.name));
    context.session = Some(Session::start(profile));
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["forget"])?;
    let email = match parsed.positional(0) {
        Some(email) => email.to_string(),
        None => context
            .config
            .remembered_email
            .clone()
            .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", LOGIN_USAGE)))?,
    };
    let password = password_arg(context, parsed.positional(1), false, LOGIN_USAGE)?;

    let profile = context.credentials.authenticate(&email, &password)?;
    let remembered = (!parsed.switch("forget")).then(|| normalize_email(&email));
    if context.config.remembered_email != remembered {
        context.config.remembered_email = remembered;
        context.persist_config()?;
    }
    output::success(format!("Signed in as {}.", profile.name));
    context.session = Some(Session::start(profile));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if let Some(session) = context.session.take() {
        output::success(format!("Goodbye, {}.", session.profile.name));
    }
    Ok(())
}

fn cmd_reset_password(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let email = require(args.first().copied(), "reset-password <email>")?;
    context.credentials.request_password_reset(email)?;
    output::success(format!("Reset instructions sent to {}.", normalize_email(email)));
    Ok(())
}
