use std::collections::HashSet;

use darkworld_bot::commands;

#[test]
fn test_all_commands_returns_correct_count() {
    let cmds = commands::all();
    assert_eq!(
        cmds.len(),
        4,
        "Expected 4 commands (help + character group + 2 storyteller), got {}",
        cmds.len()
    );
}

#[test]
fn test_all_commands_contain_expected_names() {
    let cmds = commands::all();
    let names: HashSet<&str> = cmds.iter().map(|cmd| cmd.name.as_str()).collect();

    for name in ["help", "character", "roster", "stinit"] {
        assert!(
            names.contains(name),
            "Expected command '{}' not found in commands::all(). Present names: {:?}",
            name,
            names
        );
    }
}

#[test]
fn test_character_group_has_expected_subcommands() {
    let cmds = commands::all();
    let character = cmds
        .iter()
        .find(|cmd| cmd.name == "character")
        .expect("character group missing");

    let subs: HashSet<&str> = character
        .subcommands
        .iter()
        .map(|cmd| cmd.name.as_str())
        .collect();

    for name in ["init", "show", "resync", "delete"] {
        assert!(
            subs.contains(name),
            "Expected subcommand '/character {}' not found. Present: {:?}",
            name,
            subs
        );
    }
}

#[test]
fn test_storyteller_commands_have_checks() {
    let cmds = commands::all();

    for name in ["roster", "stinit"] {
        let cmd = cmds
            .iter()
            .find(|cmd| cmd.name == name)
            .unwrap_or_else(|| panic!("command '{name}' missing"));
        assert!(
            !cmd.checks.is_empty(),
            "Storyteller command '{}' has no permission check",
            name
        );
    }
}

#[test]
fn test_no_duplicate_command_names() {
    let cmds = commands::all();
    let mut seen = HashSet::new();

    for cmd in &cmds {
        assert!(
            seen.insert(cmd.name.as_str()),
            "Duplicate command name found: '{}'",
            cmd.name
        );
    }
}

#[test]
fn test_all_commands_are_slash_commands() {
    let cmds = commands::all();

    for cmd in &cmds {
        assert!(
            cmd.slash_action.is_some(),
            "Command '{}' does not have slash_action set (not a slash command)",
            cmd.name
        );
    }
}
