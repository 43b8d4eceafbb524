use crate::{
    models::Account,
    persistence::{Error, Lookup, Repository as RepositoryTrait},
};
use axum::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct Repository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i32,
    accounts: BTreeMap<i32, Account>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RepositoryTrait for Repository {
    async fn create_account(&self, account: &mut Account) -> Result<(), Error> {
        let mut state = self.state.write().await;

        if state.accounts.values().any(|a| a.number == account.number) {
            return Err(Error::Internal(format!(
                "account number {} already exists",
                account.number
            )));
        }

        state.last_id += 1;
        account.id = state.last_id;
        state.accounts.insert(account.id, account.clone());

        Ok(())
    }

    async fn delete_account(&self, id: i32) -> Result<(), Error> {
        self.state.write().await.accounts.remove(&id);
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), Error> {
        let mut state = self.state.write().await;

        let stored = state
            .accounts
            .get_mut(&account.id)
            .ok_or(Error::AccountNotFound(Lookup::Id(account.id)))?;

        stored.first_name.clone_from(&account.first_name);
        stored.last_name.clone_from(&account.last_name);
        stored.encrypted_password.clone_from(&account.encrypted_password);
        stored.balance = account.balance;

        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, Error> {
        Ok(self.state.read().await.accounts.values().cloned().collect())
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, Error> {
        self.state
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or(Error::AccountNotFound(Lookup::Id(id)))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, Error> {
        self.state
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or(Error::AccountNotFound(Lookup::Number(number)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repo() -> Repository {
        Repository::new()
    }

    fn account(number: i64) -> Account {
        Account {
            number,
            ..Account::new("Ada", "Lovelace")
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_assigns_increasing_ids(repo: Repository) {
        let mut first = account(1);
        let mut second = account(2);

        repo.create_account(&mut first).await.unwrap();
        repo.create_account(&mut second).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.get_account_by_id(2).await.unwrap(), second);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_rejects_duplicate_number(repo: Repository) {
        repo.create_account(&mut account(42)).await.unwrap();

        let result = repo.create_account(&mut account(42)).await;

        assert!(matches!(result, Err(Error::Internal(_))));
        assert_eq!(repo.get_accounts().await.unwrap().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_generated_numbers_do_not_collide(repo: Repository) {
        for _ in 0..3_000 {
            let mut created = Account::new("Ada", "Lovelace");
            repo.create_account(&mut created).await.unwrap();
        }

        assert_eq!(repo.get_accounts().await.unwrap().len(), 3_000);
    }

    #[rstest]
    #[tokio::test]
    async fn test_ids_are_not_reused(repo: Repository) {
        let mut first = account(1);
        repo.create_account(&mut first).await.unwrap();
        repo.delete_account(first.id).await.unwrap();

        let mut second = account(2);
        repo.create_account(&mut second).await.unwrap();

        assert_eq!(second.id, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_get_missing(repo: Repository) {
        assert!(matches!(
            repo.get_account_by_id(1).await,
            Err(Error::AccountNotFound(Lookup::Id(1)))
        ));
        assert!(matches!(
            repo.get_account_by_number(99).await,
            Err(Error::AccountNotFound(Lookup::Number(99)))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_get_by_number(repo: Repository) {
        let mut created = account(777);
        repo.create_account(&mut created).await.unwrap();

        assert_eq!(repo.get_account_by_number(777).await.unwrap(), created);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_missing_is_ok(repo: Repository) {
        assert!(repo.delete_account(12).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn test_update(repo: Repository) {
        let mut created = account(5);
        repo.create_account(&mut created).await.unwrap();

        let changed = Account {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            encrypted_password: "hashed".into(),
            balance: 100,
            number: 6,
            ..created.clone()
        };
        repo.update_account(&changed).await.unwrap();

        let stored = repo.get_account_by_id(created.id).await.unwrap();
        assert_eq!(stored.first_name, "Grace");
        assert_eq!(stored.last_name, "Hopper");
        assert_eq!(stored.encrypted_password, "hashed");
        assert_eq!(stored.balance, 100);
        assert_eq!(stored.number, 5);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_missing(repo: Repository) {
        let mut missing = account(5);
        missing.id = 3;

        assert!(matches!(
            repo.update_account(&missing).await,
            Err(Error::AccountNotFound(Lookup::Id(3)))
        ));
    }
}
