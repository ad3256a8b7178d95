use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show the build and where data is kept",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "List commands, or explain one",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Leave Spend to Save", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Spend to Save {}", meta.version));
    output::info(format!(
        "  Build : {} ({}), {} for {}",
        meta.git_hash, meta.git_status, meta.profile, meta.target
    ));
    output::info(format!("  Built : {} with {}", meta.timestamp, meta.rustc));
    output::info(format!("  Ledger: {}", context.ledger_path.display()));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let step = context.tracker.workflow().step();
    let Some(name) = args.first() else {
        help::print_overview(&context.registry, step);
        return Ok(());
    };
    match context.command(&name.to_lowercase()) {
        Some(entry) => help::print_command(entry, step),
        None => context.suggest_command(name),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
