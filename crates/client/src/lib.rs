pub mod api;
pub mod commands;
pub mod models;
pub mod render;

use colored::*;

use api::ApiClient;
use commands::{Command, HELP};
use models::CreateActionRequest;

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs one command against the backend and prints the result. Mutations
/// are followed by a fresh read of what they changed.
pub async fn execute(api: &ApiClient, command: Command) -> anyhow::Result<Flow> {
    match command {
        Command::CreateUser {
            username,
            guiding_values,
        } => {
            let user = api.create_user(&username, guiding_values).await?;
            println!("{} {}", "✓ Created user".green(), user.username.bold());
            render::users(&api.list_users().await?);
        }
        Command::ListUsers => render::users(&api.list_users().await?),
        Command::CreateElement {
            title,
            element_type,
        } => {
            let element = api.create_element(&title, element_type.as_deref()).await?;
            println!("{} {}", "✓ Created element".green(), element.title.bold());
            render::elements(&api.list_elements().await?);
        }
        Command::ListElements => render::elements(&api.list_elements().await?),
        Command::SearchElements { query } => {
            render::elements(&api.search_elements(&query).await?)
        }
        Command::LinkElements { first, second } => {
            let message = api.link_elements(&first, &second).await?;
            println!("{} {}", "✓".green(), message);
            render::elements(&api.list_elements().await?);
        }
        Command::CreateAction {
            user_id,
            element_id,
            action_type,
            content,
        } => {
            let req = CreateActionRequest {
                user_id,
                element_id,
                action_type,
                content,
                linked_elements: Vec::new(),
            };
            let action = api.create_action(&req).await?;
            println!("{} {}", "✓ Created action".green(), action.id.cyan());
            render::actions(&api.list_actions().await?);
        }
        Command::ListActions => render::actions(&api.list_actions().await?),
        Command::VoteAction {
            action_id,
            user_id,
            value,
        } => {
            api.vote(&action_id, &user_id, value).await?;
            println!("{}", "✓ Vote recorded".green());
            render::decision(&api.decision(&action_id).await?);
        }
        Command::DecisionOutcome { action_id } => {
            render::decision(&api.decision(&action_id).await?)
        }
        Command::Help => println!("{}", HELP.bright_black()),
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
