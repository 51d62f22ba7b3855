// ABOUTME: Tests for user storage layer
// ABOUTME: Verifies password hashing at rest, uniqueness, authentication and cascades

#[cfg(test)]
mod tests {
    use super::super::storage::UserStorage;
    use super::super::types::UserCreateInput;
    use std::sync::Arc;
    use std::time::Duration;
    use tasklane_storage::test_utils::{insert_test_user, setup_test_db};
    use tasklane_storage::StorageError;

    fn input(username: &str, password: &str) -> UserCreateInput {
        UserCreateInput {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_is_hashed_on_save() {
        let pool = setup_test_db().await;
        let storage = UserStorage::new(pool.clone());

        let user = storage
            .create_user(input("testuser", "password"))
            .await
            .unwrap();

        let raw: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_ne!(raw, "password");
        assert!(raw.starts_with("$argon2id$"));
        assert!(user.is_active);
        assert_eq!(user.email, "testuser@example.com");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_leaves_runtime_responsive() {
        let storage = Arc::new(UserStorage::new(setup_test_db().await));

        let creator = Arc::clone(&storage);
        let handle =
            tokio::spawn(async move { creator.create_user(input("busy", "password")).await });

        // A single-threaded runtime only ticks here if hashing runs elsewhere
        let mut ticks = 0;
        while !handle.is_finished() {
            ticks += 1;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        handle.await.unwrap().unwrap();
        assert!(ticks > 1, "runtime stalled while hashing ({} ticks)", ticks);
        assert!(storage.authenticate("busy", "password").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let pool = setup_test_db().await;
        let storage = UserStorage::new(pool);

        storage.create_user(input("taken", "one")).await.unwrap();
        let result = storage.create_user(input("taken", "two")).await;

        match result {
            Err(StorageError::Duplicate(field)) => assert_eq!(field, "username"),
            other => panic!("Expected Duplicate error, got {:?}", other),
        }
        assert!(storage.username_exists("taken").await.unwrap());
        assert!(!storage.username_exists("free").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let pool = setup_test_db().await;
        let storage = UserStorage::new(pool);

        let created = storage
            .create_user(input("alice", "s3cret"))
            .await
            .unwrap();

        let ok = storage.authenticate("alice", "s3cret").await.unwrap();
        assert_eq!(ok.map(|u| u.id), Some(created.id));

        assert!(storage
            .authenticate("alice", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(storage
            .authenticate("nobody", "s3cret")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_authenticate() {
        let pool = setup_test_db().await;
        let storage = UserStorage::new(pool);

        let user = storage.create_user(input("bob", "pw")).await.unwrap();
        let updated = storage.set_active(user.id, false).await.unwrap();
        assert!(!updated.is_active);

        assert!(storage.authenticate("bob", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unusable_password_hash_fails_closed() {
        let pool = setup_test_db().await;
        insert_test_user(&pool, "placeholder").await;
        let storage = UserStorage::new(pool);

        assert!(storage
            .authenticate("placeholder", "!")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_tasks() {
        let pool = setup_test_db().await;
        let storage = UserStorage::new(pool.clone());

        let user = storage.create_user(input("carol", "pw")).await.unwrap();
        sqlx::query(
            "INSERT INTO tasks (title, description, timestamp, created_by) VALUES ('t', 'd', '2024-01-01T00:00:00Z', ?)",
        )
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

        storage.delete_user(user.id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(matches!(
            storage.get_user(user.id).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            storage.delete_user(user.id).await,
            Err(StorageError::NotFound)
        ));
    }
}
