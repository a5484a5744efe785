use colored::*;

use crate::models::{Action, Decision, Element, User};

const RULE_WIDTH: usize = 72;

fn rule() {
    println!("{}", "━".repeat(RULE_WIDTH).bright_black());
}

fn header(title: &str) {
    println!();
    println!("{}", title.bright_yellow().bold());
    rule();
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn users(users: &[User]) {
    header("USERS");
    if users.is_empty() {
        println!("{}", "(no users yet)".bright_black());
        return;
    }
    for user in users {
        let values = if user.guiding_values.is_empty() {
            String::new()
        } else {
            format!(" [{}]", user.guiding_values.join(", "))
        };
        println!(
            "{}  {}{}",
            user.id.cyan(),
            user.username.bright_white().bold(),
            values.bright_black()
        );
    }
}

pub fn elements(elements: &[Element]) {
    header("ELEMENTS");
    if elements.is_empty() {
        println!("{}", "(no elements)".bright_black());
        return;
    }
    for element in elements {
        println!(
            "{}  {:<40} {}",
            element.id.cyan(),
            truncate(&element.title, 40).bright_white().bold(),
            element.element_type.yellow()
        );
        if !element.related.is_empty() {
            println!(
                "    {} {}",
                "related:".bright_black(),
                element.related.join(", ").bright_black()
            );
        }
    }
}

pub fn actions(actions: &[Action]) {
    header("ACTIONS");
    if actions.is_empty() {
        println!("{}", "(no actions yet)".bright_black());
        return;
    }
    for action in actions {
        println!(
            "{}  {:<10} {}",
            action.id.cyan(),
            action.action_type.yellow(),
            truncate(&action.content, 50).bright_white()
        );
        let element = action.element_id.as_deref().unwrap_or("-");
        println!(
            "    {} {}  {} {}",
            "by".bright_black(),
            action.user_id.bright_black(),
            "on".bright_black(),
            element.bright_black()
        );
    }
}

pub fn decision(decision: &Decision) {
    header("DECISION OUTCOME");
    println!(
        "{} {} {}",
        decision.action_type.yellow(),
        "·".bright_black(),
        decision.content.bright_white().bold()
    );
    println!();

    let verdict = match decision.outcome.as_str() {
        "approved" => "APPROVED".green().bold(),
        "rejected" => "REJECTED".red().bold(),
        _ => "NEUTRAL".yellow().bold(),
    };
    println!(
        "{} {}   {} {}   {} {}",
        "Verdict:".bright_black(),
        verdict,
        "Score:".bright_black(),
        decision.score.to_string().bright_cyan(),
        "Votes:".bright_black(),
        decision.total_votes.to_string().bright_cyan()
    );

    for vote in &decision.votes {
        let value = match vote.value {
            v if v > 0 => format!("+{v}").green(),
            v if v < 0 => v.to_string().red(),
            v => v.to_string().yellow(),
        };
        println!("    {}  {}", vote.user_id.bright_black(), value);
    }
    rule();
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("garden", 10), "garden");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("renewable energy", 8), "renewab…");
        assert_eq!(truncate("ééééé", 3).chars().count(), 3);
    }
}
