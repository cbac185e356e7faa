//! Interactive choice of the destination suite

use anyhow::{Context, Result};
use tracing::{debug, error, warn};

use super::prompt::{is_yes, Prompter};
use crate::api::TestCaseService;
use crate::types::{CreateSuite, Suite};

/// Ask which suite new cases go into.
///
/// Returns `None` for the project root.
pub async fn select_suite(
    service: &dyn TestCaseService,
    prompter: &mut dyn Prompter,
) -> Result<Option<i64>> {
    prompter.say("");
    prompter.say("Suite selection");

    let suites = service
        .list_suites()
        .await
        .context("Failed to list suites")?;
    debug!(count = suites.len(), "Loaded suites for selection");

    if suites.is_empty() {
        prompter.say("No suites exist in this project yet.");
        let answer = prompter.ask("Create a new suite? [y/N] ")?;
        if is_yes(&answer) {
            return create_suite_interactively(service, prompter).await;
        }
        prompter.say("Test cases will be created at the root level");
        return Ok(None);
    }

    prompter.say("Available suites:");
    for line in menu_lines(&suites) {
        prompter.say(&line);
    }

    let answer = prompter.ask("Choose an option: ")?;
    match resolve_choice(&answer, &suites) {
        MenuChoice::Root => {
            prompter.say("Test cases will be created at the root level");
            Ok(None)
        }
        MenuChoice::Existing(suite) => {
            prompter.say(&format!("Selected suite: \"{}\"", suite.title));
            Ok(Some(suite.id))
        }
        MenuChoice::CreateNew => create_suite_interactively(service, prompter).await,
        MenuChoice::Invalid => {
            warn!(answer = %answer, "Invalid suite choice");
            prompter.say("Invalid option, using the root level");
            Ok(None)
        }
    }
}

/// Ask for a name and optional description, then create the suite.
///
/// An empty name creates nothing and returns `None`. So does a failed
/// create request, after telling the user.
pub async fn create_suite_interactively(
    service: &dyn TestCaseService,
    prompter: &mut dyn Prompter,
) -> Result<Option<i64>> {
    let title = prompter.ask("Suite name: ")?;
    if title.is_empty() {
        prompter.say("Invalid name, no suite created");
        return Ok(None);
    }

    let description = prompter.ask("Description (optional, Enter to skip): ")?;
    let request = CreateSuite {
        title,
        description: Some(description).filter(|d| !d.is_empty()),
    };

    prompter.say("Creating suite...");
    let suite = match service.create_suite(&request).await {
        Ok(suite) => suite,
        Err(e) => {
            error!(title = %request.title, error = %e, "Failed to create suite");
            prompter.say(&format!("Failed to create suite: {}", e));
            prompter.say("Test cases will be created at the root level");
            return Ok(None);
        }
    };

    prompter.say(&format!(
        "Created suite \"{}\" (ID: {})",
        suite.title, suite.id
    ));
    Ok(Some(suite.id))
}

/// Print what is about to happen and ask for confirmation
pub fn confirm_creation(
    count: usize,
    suite_id: Option<i64>,
    prompter: &mut dyn Prompter,
) -> Result<bool> {
    prompter.say("");
    prompter.say("Summary:");
    prompter.say(&format!("  Test cases to create: {}", count));
    prompter.say(&format!("  Destination:          {}", destination(suite_id)));

    let answer = prompter.ask("Confirm creation? [y/N] ")?;
    Ok(is_yes(&answer))
}

/// Human-readable destination for a suite id
pub fn destination(suite_id: Option<i64>) -> String {
    match suite_id {
        Some(id) => format!("Suite ID {}", id),
        None => "root level (no suite)".to_string(),
    }
}

enum MenuChoice<'a> {
    Root,
    Existing(&'a Suite),
    CreateNew,
    Invalid,
}

fn menu_lines(suites: &[Suite]) -> Vec<String> {
    let mut lines: Vec<String> = suites
        .iter()
        .enumerate()
        .map(|(i, suite)| {
            format!(
                "  {}. {} ({} test cases)",
                i + 1,
                suite.title,
                suite.cases_count
            )
        })
        .collect();
    lines.push(format!("  {}. Create new suite", suites.len() + 1));
    lines.push("  0. No suite (root level)".to_string());
    lines
}

fn resolve_choice<'a>(answer: &str, suites: &'a [Suite]) -> MenuChoice<'a> {
    let Ok(choice) = answer.trim().parse::<usize>() else {
        return MenuChoice::Invalid;
    };

    match choice {
        0 => MenuChoice::Root,
        n if n <= suites.len() => MenuChoice::Existing(&suites[n - 1]),
        n if n == suites.len() + 1 => MenuChoice::CreateNew,
        _ => MenuChoice::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(id: i64, title: &str, cases_count: u32) -> Suite {
        Suite {
            id,
            title: title.to_string(),
            description: None,
            parent_id: None,
            cases_count,
        }
    }

    #[test]
    fn test_menu_lines() {
        let suites = vec![suite(7, "Login", 3), suite(9, "Checkout", 0)];
        assert_eq!(
            menu_lines(&suites),
            vec![
                "  1. Login (3 test cases)",
                "  2. Checkout (0 test cases)",
                "  3. Create new suite",
                "  0. No suite (root level)",
            ]
        );
    }

    #[test]
    fn test_resolve_choice() {
        let suites = vec![suite(7, "Login", 3), suite(9, "Checkout", 0)];

        assert!(matches!(resolve_choice("0", &suites), MenuChoice::Root));
        assert!(matches!(
            resolve_choice("2", &suites),
            MenuChoice::Existing(s) if s.id == 9
        ));
        assert!(matches!(resolve_choice("3", &suites), MenuChoice::CreateNew));
        assert!(matches!(resolve_choice("4", &suites), MenuChoice::Invalid));
        assert!(matches!(resolve_choice("abc", &suites), MenuChoice::Invalid));
        assert!(matches!(resolve_choice("", &suites), MenuChoice::Invalid));
        assert!(matches!(resolve_choice("-1", &suites), MenuChoice::Invalid));
    }

    #[test]
    fn test_destination() {
        assert_eq!(destination(Some(12)), "Suite ID 12");
        assert_eq!(destination(None), "root level (no suite)");
    }

    #[test]
    fn test_confirm_creation() {
        let mut prompter = crate::ui::ScriptedPrompter::new(["Y"]);
        assert!(confirm_creation(3, Some(4), &mut prompter).unwrap());
        assert!(prompter.saw("Test cases to create: 3"));
        assert!(prompter.saw("Suite ID 4"));

        let mut prompter = crate::ui::ScriptedPrompter::new(["no"]);
        assert!(!confirm_creation(3, None, &mut prompter).unwrap());
    }
}
