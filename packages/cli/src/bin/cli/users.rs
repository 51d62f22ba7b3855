// ABOUTME: CLI commands for administering user accounts
// ABOUTME: Creates accounts with the same rules as registration and deletes them with their tasks

use anyhow::{anyhow, bail};
use clap::Subcommand;
use colored::*;
use tasklane_api::serializers::RegistrationPayload;
use tasklane_security::{User, UserStorage};
use tasklane_storage::StorageError;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Create a user account
    Create {
        /// Login name
        username: String,
        /// Password for the new account
        #[arg(short, long)]
        password: String,
        /// Optional contact address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Delete a user account and all tasks it owns
    Delete {
        /// Login name
        username: String,
    },
}

pub async fn handle_users_command(
    command: UsersCommands,
    storage: &UserStorage,
) -> anyhow::Result<()> {
    match command {
        UsersCommands::Create {
            username,
            password,
            email,
        } => {
            let user = create_user(storage, username, password, email).await?;
            println!(
                "{} Created user {} (id {})",
                "✓".green().bold(),
                user.username.cyan(),
                user.id
            );
        }
        UsersCommands::Delete { username } => {
            delete_user(storage, &username).await?;
            println!("{} Deleted user {}", "✓".green().bold(), username.cyan());
        }
    }
    Ok(())
}

async fn create_user(
    storage: &UserStorage,
    username: String,
    password: String,
    email: Option<String>,
) -> anyhow::Result<User> {
    let input = RegistrationPayload {
        username: Some(username),
        password: Some(password),
        email,
    }
    .validate()
    .map_err(|errors| anyhow!("Invalid user: {}", errors))?;

    match storage.create_user(input).await {
        Ok(user) => Ok(user),
        Err(StorageError::Duplicate(_)) => bail!("A user with that username already exists"),
        Err(e) => Err(e.into()),
    }
}

async fn delete_user(storage: &UserStorage, username: &str) -> anyhow::Result<()> {
    let Some(user) = storage.get_user_by_username(username).await? else {
        bail!("No user named '{}'", username);
    };
    storage.delete_user(user.id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklane_storage::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_delete_user() {
        let storage = UserStorage::new(setup_test_db().await);

        let user = create_user(
            &storage,
            "admin".to_string(),
            "pw".to_string(),
            Some("admin@example.com".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(user.email, "admin@example.com");

        assert!(storage.authenticate("admin", "pw").await.unwrap().is_some());

        delete_user(&storage, "admin").await.unwrap();
        assert!(storage.get_user_by_username("admin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate() {
        let storage = UserStorage::new(setup_test_db().await);

        let err = create_user(&storage, "bad name".to_string(), "pw".to_string(), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("username"));

        create_user(&storage, "dup".to_string(), "pw".to_string(), None)
            .await
            .unwrap();
        let err = create_user(&storage, "dup".to_string(), "pw".to_string(), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_delete_unknown_user_fails() {
        let storage = UserStorage::new(setup_test_db().await);
        assert!(delete_user(&storage, "ghost").await.is_err());
    }
}
