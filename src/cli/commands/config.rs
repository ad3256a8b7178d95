use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change display and clear settings",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_config_value(context, key, &value)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}` (expected show or set)"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in Config::KEYS {
        if let Some(value) = context.config.get(key) {
            output::info(format!("  {:<20} {}", key, value));
        }
    }
    output::info(format!("  Stored at: {}", context.config_manager.path().display()));
    output::info(format!("  Ledger at: {}", context.ledger_path.display()));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context
        .config
        .set(key, value)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    context.apply_config();
    context.persist_config()?;
    output::success(format!("Set `{key}` to `{}`.", value.trim()));
    Ok(())
}
