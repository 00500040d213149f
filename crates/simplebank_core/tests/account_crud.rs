use simplebank_core::db::open_db_in_memory;
use simplebank_core::{
    Account, AccountError, AccountStore, CreateAccountParams, ListAccountsParams,
    ParamsValidationError, SqliteAccountStore, UpdateAccountParams,
};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const CURRENCIES: [&str; 3] = ["USD", "EUR", "CAD"];

#[test]
fn create_returns_input_fields_and_store_assigned_values() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (params, account) = create_random_account(&store);

    assert_eq!(account.owner, params.owner);
    assert_eq!(account.balance, params.balance);
    assert_eq!(account.currency, params.currency);
    assert!(account.id > 0);
    assert!(account.created_at > 0);
    assert_created_recently(&account);
}

#[test]
fn create_then_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (_, created) = create_random_account(&store);
    let loaded = store.get_account(created.id).unwrap();

    assert_eq!(loaded, created);
    assert!((loaded.created_at - created.created_at).abs() <= 2_000);
}

#[test]
fn get_unknown_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let err = store.get_account(12_345).unwrap_err();
    assert!(matches!(err, AccountError::NotFound(12_345)));
}

#[test]
fn update_changes_balance_only() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (_, before) = create_random_account(&store);
    let params = UpdateAccountParams {
        id: before.id,
        balance: before.balance + 777,
    };
    let updated = store.update_account(&params).unwrap();

    assert_eq!(updated.id, before.id);
    assert_eq!(updated.owner, before.owner);
    assert_eq!(updated.currency, before.currency);
    assert_eq!(updated.created_at, before.created_at);
    assert_eq!(updated.balance, params.balance);

    let reloaded = store.get_account(before.id).unwrap();
    assert_eq!(reloaded, updated);
}

#[test]
fn update_accepts_negative_and_zero_balances() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (_, account) = create_random_account(&store);
    for balance in [0, -250] {
        let updated = store
            .update_account(&UpdateAccountParams {
                id: account.id,
                balance,
            })
            .unwrap();
        assert_eq!(updated.balance, balance);
    }
}

#[test]
fn update_unknown_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let err = store
        .update_account(&UpdateAccountParams { id: 99, balance: 1 })
        .unwrap_err();
    assert!(matches!(err, AccountError::NotFound(99)));
}

#[test]
fn delete_removes_visibility() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (_, account) = create_random_account(&store);
    store.delete_account(account.id).unwrap();

    let get_err = store.get_account(account.id).unwrap_err();
    assert!(matches!(get_err, AccountError::NotFound(id) if id == account.id));

    let update_err = store
        .update_account(&UpdateAccountParams {
            id: account.id,
            balance: 10,
        })
        .unwrap_err();
    assert!(matches!(update_err, AccountError::NotFound(_)));

    let page = store.list_accounts(&ListAccountsParams::new(10, 0)).unwrap();
    assert!(page.iter().all(|item| item.id != account.id));
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (_, account) = create_random_account(&store);
    store.delete_account(account.id).unwrap();
    store.delete_account(account.id).unwrap();
    store.delete_account(424_242).unwrap();
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let (_, first) = create_random_account(&store);
    store.delete_account(first.id).unwrap();
    let (_, second) = create_random_account(&store);

    assert!(second.id > first.id);
}

#[test]
fn list_returns_requested_window_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let created: Vec<Account> = (0..10)
        .map(|_| create_random_account(&store).1)
        .collect();

    let params = ListAccountsParams::new(5, 5);
    let page = store.list_accounts(&params).unwrap();

    assert_eq!(page.len(), 5);
    assert_eq!(page, created[5..10].to_vec());
    for account in &page {
        assert!(account.id > 0);
        assert!(!account.owner.is_empty());
        assert!(!account.currency.is_empty());
        assert!(account.created_at > 0);
    }

    let again = store.list_accounts(&params).unwrap();
    assert_eq!(again, page);
}

#[test]
fn list_returns_short_page_near_the_end() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    for _ in 0..7 {
        create_random_account(&store);
    }

    assert_eq!(
        store
            .list_accounts(&ListAccountsParams::new(5, 5))
            .unwrap()
            .len(),
        2
    );
    assert!(store
        .list_accounts(&ListAccountsParams::new(5, 50))
        .unwrap()
        .is_empty());
}

#[test]
fn list_rejects_zero_limit() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let err = store
        .list_accounts(&ListAccountsParams::new(0, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::InvalidParams(ParamsValidationError::ZeroLimit)
    ));
}

#[test]
fn invalid_currency_surfaces_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    for currency in ["usd", "US", "DOLLAR", ""] {
        let err = store
            .create_account(&CreateAccountParams::new("alice", 10, currency))
            .unwrap_err();
        assert!(
            matches!(err, AccountError::ConstraintViolation(_)),
            "currency `{currency}` gave {err:?}"
        );
    }
}

#[test]
fn empty_owner_surfaces_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let err = store
        .create_account(&CreateAccountParams::new("", 10, "USD"))
        .unwrap_err();
    assert!(matches!(err, AccountError::ConstraintViolation(_)));
}

#[test]
fn account_lifecycle_scenario() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let created = store
        .create_account(&CreateAccountParams::new("alice", 1000, "USD"))
        .unwrap();

    let loaded = store.get_account(created.id).unwrap();
    assert_eq!(loaded.owner, "alice");
    assert_eq!(loaded.balance, 1000);
    assert_eq!(loaded.currency, "USD");

    store
        .update_account(&UpdateAccountParams {
            id: created.id,
            balance: 500,
        })
        .unwrap();
    let loaded = store.get_account(created.id).unwrap();
    assert_eq!(loaded.balance, 500);
    assert_eq!(loaded.owner, "alice");
    assert_eq!(loaded.currency, "USD");

    store.delete_account(created.id).unwrap();
    assert!(matches!(
        store.get_account(created.id),
        Err(AccountError::NotFound(_))
    ));
}

#[test]
fn store_is_usable_as_trait_object() {
    let conn = open_db_in_memory().unwrap();
    let concrete = SqliteAccountStore::try_new(&conn).unwrap();
    let store: &dyn AccountStore = &concrete;

    let created = store
        .create_account(&CreateAccountParams::new("bob", 5, "EUR"))
        .unwrap();
    assert_eq!(store.get_account(created.id).unwrap().owner, "bob");
}

#[test]
fn account_serializes_with_snake_case_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAccountStore::try_new(&conn).unwrap();

    let account = store
        .create_account(&CreateAccountParams::new("carol", 42, "CAD"))
        .unwrap();
    let value = serde_json::to_value(&account).unwrap();

    assert_eq!(value["id"], account.id);
    assert_eq!(value["owner"], "carol");
    assert_eq!(value["balance"], 42_i64);
    assert_eq!(value["currency"], "CAD");
    assert_eq!(value["created_at"], account.created_at);

    let decoded: Account = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, account);
}

fn create_random_account(store: &impl AccountStore) -> (CreateAccountParams, Account) {
    let seed = Uuid::new_v4().as_u128();
    let params = CreateAccountParams::new(
        format!("owner-{}", &Uuid::new_v4().simple().to_string()[..8]),
        (seed % 1_000) as i64,
        CURRENCIES[(seed % CURRENCIES.len() as u128) as usize],
    );
    let account = store.create_account(&params).unwrap();
    (params, account)
}

fn assert_created_recently(account: &Account) {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    assert!(account.created_at <= now_ms);
    assert!(now_ms - account.created_at <= 2_000);
}
