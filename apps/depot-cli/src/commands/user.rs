//! # Account Commands
//!
//! `user promote` doubles as the bootstrap path: while the store has no
//! admin, anyone may promote a user. Once an admin exists it needs
//! `ManageUsers` like the other account changes.

use tracing::info;

use depot_core::{CoreError, Outcome, Permission, Role};

use crate::cli::UserCommand;
use crate::error::CliError;
use crate::state::AppState;

pub async fn run(state: &AppState, command: UserCommand) -> Result<Outcome, CliError> {
    let users = state.db().users();

    match command {
        UserCommand::Register { username, password } => {
            Ok(Outcome::with_data(&users.register(&username, &password).await?))
        }

        UserCommand::Login { username, password } => {
            let actor = users
                .authenticate(&username, &password)
                .await?
                .ok_or(CoreError::InvalidCredentials)?;
            Ok(Outcome::with_data(&actor))
        }

        UserCommand::Add {
            username,
            password,
            role,
        } => {
            state.require(Permission::ManageUsers, "add users")?;
            Ok(Outcome::with_data(
                &users.create_user(&username, &password, role).await?,
            ))
        }

        UserCommand::Passwd { current, new } => {
            let actor = state.actor().ok_or(CliError::MissingActor)?;
            users.change_password(actor.user_id, &current, &new).await?;
            Ok(Outcome::ok())
        }

        UserCommand::Promote { username } => {
            let has_admin = users.list().await?.iter().any(|u| u.role == Role::Admin);
            if has_admin {
                state.require(Permission::ManageUsers, "promote users")?;
            } else {
                info!(username = %username, "No admin yet, promoting without an actor");
            }
            Ok(Outcome::with_data(&users.promote_to_admin(&username).await?))
        }

        UserCommand::Delete { user_id } => {
            state.require(Permission::ManageUsers, "delete users")?;
            users.delete_user(user_id).await?;
            Ok(Outcome::ok())
        }

        UserCommand::List => {
            state.require(Permission::ManageUsers, "list users")?;
            Ok(Outcome::with_data(&users.list().await?))
        }
    }
}
