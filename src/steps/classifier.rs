//! Rule-ordered expected-result synthesis
//!
//! Each action is matched against an ordered cascade of keyword categories.
//! The first category that matches decides the result; most categories then
//! narrow down with their own ordered list of secondary keywords before
//! falling back to a category default. All keyword tests are
//! case-insensitive and word-bounded.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Result when no category matches
const FALLBACK_RESULT: &str = "Action is completed successfully";

/// Action categories, in cascade priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Navigation,
    Click,
    Input,
    Verification,
    Selection,
    Wait,
    Email,
    File,
    Scroll,
    Login,
    Logout,
    Submit,
    Delete,
    Refresh,
    Close,
    Hover,
    Search,
    /// No category keyword matched
    Fallback,
}

impl Category {
    /// Categories tried by the cascade, highest priority first.
    ///
    /// Earlier entries win on ambiguous text: "Click submit button" is a
    /// click, not a submit.
    pub const CASCADE: [Category; 17] = [
        Category::Navigation,
        Category::Click,
        Category::Input,
        Category::Verification,
        Category::Selection,
        Category::Wait,
        Category::Email,
        Category::File,
        Category::Scroll,
        Category::Login,
        Category::Logout,
        Category::Submit,
        Category::Delete,
        Category::Refresh,
        Category::Close,
        Category::Hover,
        Category::Search,
    ];

    /// Keyword alternation that selects this category
    fn keywords(self) -> &'static str {
        match self {
            Category::Navigation => "navigate|open|go to|access|visit",
            Category::Click => "click|press|tap|select",
            Category::Input => "enter|type|input|fill|write",
            Category::Verification => "verify|check|ensure|confirm|validate|assert",
            Category::Selection => "select|choose|pick",
            Category::Wait => "wait|see|find|locate",
            Category::Email => "email|mail|message",
            Category::File => "upload|download|attach",
            Category::Scroll => "scroll|swipe|drag",
            Category::Login => "login|log in|sign in|authenticate",
            Category::Logout => "logout|log out|sign out",
            Category::Submit => "submit|save|send|create|update",
            Category::Delete => "delete|remove|clear",
            Category::Refresh => "refresh|reload",
            Category::Close => "close|dismiss|cancel",
            Category::Hover => "hover|mouse over",
            Category::Search => "search|filter|query",
            Category::Fallback => "",
        }
    }

    /// Short lowercase name
    pub fn label(self) -> &'static str {
        match self {
            Category::Navigation => "navigation",
            Category::Click => "click",
            Category::Input => "input",
            Category::Verification => "verification",
            Category::Selection => "selection",
            Category::Wait => "wait",
            Category::Email => "email",
            Category::File => "file",
            Category::Scroll => "scroll",
            Category::Login => "login",
            Category::Logout => "logout",
            Category::Submit => "submit",
            Category::Delete => "delete",
            Category::Refresh => "refresh",
            Category::Close => "close",
            Category::Hover => "hover",
            Category::Search => "search",
            Category::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A secondary keyword test and the phrase it yields
struct Rule {
    pattern: Regex,
    phrase: &'static str,
}

fn word_pattern(keywords: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", keywords)).expect("keyword pattern is valid")
}

fn rules(table: &[(&str, &'static str)]) -> Vec<Rule> {
    table
        .iter()
        .map(|&(keywords, phrase)| Rule {
            pattern: word_pattern(keywords),
            phrase,
        })
        .collect()
}

/// First matching phrase, or the default
fn first_phrase(action: &str, rules: &[Rule], default: &'static str) -> String {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(action))
        .map(|rule| rule.phrase)
        .unwrap_or(default)
        .to_string()
}

// ─── Patterns ────────────────────────────────────────────────────────────────

static CATEGORY_PATTERNS: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    Category::CASCADE
        .iter()
        .map(|category| (*category, word_pattern(category.keywords())))
        .collect()
});

static PAGE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:to|the)\s+([a-z\s]+?)(?:\s+page|\s+screen|$)")
        .expect("page name pattern is valid")
});

/// Leftmost verification verb, matched without word boundaries
static VERIFY_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"verify|check|ensure|confirm|validate|assert").expect("verify verb pattern is valid")
});

static NEXT_STEP_VERIFIES: Lazy<Regex> = Lazy::new(|| word_pattern("verify|check"));

static CLICK_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("submit", "Form is submitted and processing begins"),
        ("save", "Data is saved successfully and confirmation is shown"),
        ("send", "Item is sent successfully"),
        (
            "delete|remove",
            "Item is deleted and confirmation message is displayed",
        ),
        (
            "login|sign in",
            "User is authenticated and redirected to dashboard",
        ),
        (
            "logout|sign out",
            "User is logged out and redirected to login page",
        ),
        ("cancel", "Action is cancelled and no changes are made"),
        ("confirm|ok", "Action is confirmed and executed"),
        ("link|url", "User is redirected to the linked page"),
        ("menu|dropdown", "Menu expands and options are displayed"),
        (
            "tab",
            "Tab is activated and corresponding content is displayed",
        ),
        ("close|x", "Element is closed and removed from view"),
    ])
});

static INPUT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (
            "email",
            "Email address is entered in correct format and accepted",
        ),
        (
            "password",
            "Password is entered, masked, and meets security requirements",
        ),
        ("username", "Username is entered and validated"),
        ("phone|number", "Phone number is entered in correct format"),
        ("date", "Date is selected and displayed in correct format"),
        ("address", "Address is entered with all required fields"),
        ("credit card|payment", "Payment information is entered securely"),
        ("search", "Search term is entered and ready for submission"),
    ])
});

static VERIFY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("email", "Email is received with correct content and sender"),
        (
            "message|notification",
            "Message is displayed with correct content",
        ),
        ("error", "Error message is displayed correctly"),
        ("success", "Success message is displayed correctly"),
        ("redirect", "User is redirected to the correct page"),
        (
            "display|visible",
            "Element is displayed and visible on the page",
        ),
    ])
});

static SELECT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("dropdown|list", "Option is selected from dropdown and applied"),
        ("checkbox", "Checkbox is selected and state changes"),
        (
            "radio",
            "Radio button is selected and other options are deselected",
        ),
        ("date|calendar", "Date is selected from calendar picker"),
        ("file", "File is selected from file system"),
    ])
});

static WAIT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("email", "Email is received within expected timeframe"),
        ("load|appear", "Element loads and appears on the page"),
        ("process|complete", "Process completes within expected time"),
    ])
});

static EMAIL_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("send", "Email is sent successfully"),
        (
            "receive|check",
            "Email is received with correct subject and content",
        ),
        ("open", "Email is opened and content is displayed"),
        (
            "verify|confirm",
            "Email contains expected information and links work correctly",
        ),
    ])
});

static FILE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (
            "upload",
            "File is uploaded successfully and confirmation is shown",
        ),
        ("download", "File is downloaded to local system successfully"),
        ("attach", "File is attached and ready for submission"),
    ])
});

static SCROLL_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("bottom", "Page scrolls to bottom and all content is loaded"),
        ("top", "Page scrolls to top"),
        ("element", "Page scrolls and target element is visible"),
    ])
});

static SUBMIT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        ("form", "Form is submitted and validation passes"),
        (
            "save",
            "Changes are saved successfully and confirmation is displayed",
        ),
        ("create", "Item is created successfully with confirmation"),
        ("update", "Item is updated successfully with confirmation"),
        ("send", "Data is sent successfully"),
    ])
});

static DELETE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (
            "confirm",
            "Item is permanently deleted and removed from view",
        ),
        ("clear", "Field or data is cleared successfully"),
    ])
});

static CLOSE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (
            "modal|popup|dialog",
            "Modal is closed and user returns to previous screen",
        ),
        ("notification", "Notification is dismissed"),
    ])
});

// ─── Cascade ─────────────────────────────────────────────────────────────────

/// Category an action resolves to under the ordered cascade
pub fn categorize(action: &str) -> Category {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(action))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Fallback)
}

/// Synthesize the expected result for the action at `index`.
///
/// `actions` is the full list of cleaned actions; only the click category
/// reads it, to look at the following step.
pub fn classify_line(action: &str, index: usize, actions: &[String]) -> String {
    let lower = action.to_lowercase();

    match categorize(&lower) {
        Category::Navigation => page_loaded(&lower),
        Category::Click => clicked(&lower, actions.get(index + 1)),
        Category::Input => first_phrase(
            &lower,
            &INPUT_RULES,
            "Data is entered correctly in the field",
        ),
        Category::Verification => verified(&lower),
        Category::Selection => {
            first_phrase(&lower, &SELECT_RULES, "Option is selected successfully")
        }
        Category::Wait => first_phrase(&lower, &WAIT_RULES, "Expected element or state appears"),
        Category::Email => first_phrase(
            &lower,
            &EMAIL_RULES,
            "Email action is completed successfully",
        ),
        Category::File => first_phrase(
            &lower,
            &FILE_RULES,
            "File operation completes successfully",
        ),
        Category::Scroll => first_phrase(
            &lower,
            &SCROLL_RULES,
            "Page scrolls and content is navigable",
        ),
        Category::Login => {
            "User is successfully authenticated and redirected to dashboard".to_string()
        }
        Category::Logout => "User is logged out and redirected to login page".to_string(),
        Category::Submit => first_phrase(
            &lower,
            &SUBMIT_RULES,
            "Submission is successful and confirmation is shown",
        ),
        Category::Delete => first_phrase(
            &lower,
            &DELETE_RULES,
            "Item is deleted and confirmation message is displayed",
        ),
        Category::Refresh => "Page is refreshed and updated content is displayed".to_string(),
        Category::Close => first_phrase(
            &lower,
            &CLOSE_RULES,
            "Element is closed and removed from view",
        ),
        Category::Hover => {
            "Element responds to hover and shows additional information".to_string()
        }
        Category::Search => "Search results are displayed and filtered correctly".to_string(),
        Category::Fallback => FALLBACK_RESULT.to_string(),
    }
}

fn page_loaded(action: &str) -> String {
    let page_name = PAGE_NAME
        .captures(action)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty());

    match page_name {
        Some(name) => format!("{} page is displayed and fully loaded", capitalize(name)),
        None => "Page is displayed and fully loaded".to_string(),
    }
}

fn clicked(action: &str, next_action: Option<&String>) -> String {
    if let Some(rule) = CLICK_RULES.iter().find(|rule| rule.pattern.is_match(action)) {
        return rule.phrase.to_string();
    }

    let next_verifies = next_action.is_some_and(|next| NEXT_STEP_VERIFIES.is_match(next));
    if next_verifies {
        "Element is clicked and expected state change occurs".to_string()
    } else {
        "Element is clicked and action is performed successfully".to_string()
    }
}

fn verified(action: &str) -> String {
    // Whatever follows the verb is what is being verified
    if let Some(verb) = VERIFY_VERB.find(action) {
        let subject = action[verb.end()..].trim();
        if !subject.is_empty() {
            return format!("{} is correct and as expected", capitalize(subject));
        }
    }

    first_phrase(
        action,
        &VERIFY_RULES,
        "Verification passes and state is as expected",
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
