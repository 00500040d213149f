//! Account store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and paginated list APIs over the `accounts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation issues exactly one SQL statement; no transactions,
//!   retries or locks are added here.
//! - Single-row reads and balance updates report `NotFound` for unknown ids.
//! - Deleting an unknown id succeeds.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::account::{
    Account, AccountId, CreateAccountParams, ListAccountsParams, ParamsValidationError,
    UpdateAccountParams,
};
use log::{debug, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ACCOUNT_COLUMNS: &[&str] = &["id", "owner", "balance", "currency", "created_at"];

const INSERT_ACCOUNT_SQL: &str = "INSERT INTO accounts (owner, balance, currency)
VALUES (?1, ?2, ?3)
RETURNING id, owner, balance, currency, created_at;";

const SELECT_ACCOUNT_SQL: &str = "SELECT id, owner, balance, currency, created_at
FROM accounts
WHERE id = ?1;";

const UPDATE_BALANCE_SQL: &str = "UPDATE accounts
SET balance = ?2
WHERE id = ?1
RETURNING id, owner, balance, currency, created_at;";

const DELETE_ACCOUNT_SQL: &str = "DELETE FROM accounts WHERE id = ?1;";

const LIST_ACCOUNTS_SQL: &str = "SELECT id, owner, balance, currency, created_at
FROM accounts
ORDER BY id ASC
LIMIT ?1 OFFSET ?2;";

pub type AccountResult<T> = Result<T, AccountError>;

/// Error surfaced by account store operations.
#[derive(Debug)]
pub enum AccountError {
    /// No account row has this id.
    NotFound(AccountId),
    /// The store rejected a write through a table constraint.
    ConstraintViolation(rusqlite::Error),
    /// Busy, locked or I/O class failure. Not retried.
    Transient(rusqlite::Error),
    InvalidParams(ParamsValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl AccountError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::Transient(_) => "transient",
            Self::InvalidParams(_) => "invalid_params",
            Self::Db(_) => "db_error",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "account not found: {id}"),
            Self::ConstraintViolation(err) => write!(f, "{err}"),
            Self::Transient(err) => write!(f, "{err}"),
            Self::InvalidParams(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted account data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConstraintViolation(err) | Self::Transient(err) => Some(err),
            Self::InvalidParams(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ParamsValidationError> for AccountError {
    fn from(value: ParamsValidationError) -> Self {
        Self::InvalidParams(value)
    }
}

impl From<DbError> for AccountError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for AccountError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(value),
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::OperationInterrupted,
            ) => Self::Transient(value),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Data access contract for accounts, one method per store statement.
pub trait AccountStore {
    /// Inserts one account and returns it with store-assigned fields.
    fn create_account(&self, params: &CreateAccountParams) -> AccountResult<Account>;
    /// Loads one account by id.
    fn get_account(&self, id: AccountId) -> AccountResult<Account>;
    /// Replaces the balance only and returns the updated account.
    fn update_account(&self, params: &UpdateAccountParams) -> AccountResult<Account>;
    /// Removes one account. Unknown ids are not an error.
    fn delete_account(&self, id: AccountId) -> AccountResult<()>;
    /// Returns one page of accounts in ascending id order.
    fn list_accounts(&self, params: &ListAccountsParams) -> AccountResult<Vec<Account>>;
}

/// SQLite-backed account store borrowing a caller-owned connection.
pub struct SqliteAccountStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountStore<'conn> {
    /// Wraps a connection after checking that migrations produced the
    /// expected `accounts` schema.
    pub fn try_new(conn: &'conn Connection) -> AccountResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AccountStore for SqliteAccountStore<'_> {
    fn create_account(&self, params: &CreateAccountParams) -> AccountResult<Account> {
        let account = self
            .conn
            .prepare_cached(INSERT_ACCOUNT_SQL)?
            .query_row(
                params![params.owner.as_str(), params.balance, params.currency.as_str()],
                read_account_row,
            )
            .map_err(AccountError::from)
            .and_then(check_persisted)
            .inspect_err(|err| log_failure("account_create", None, err))?;

        debug!(
            "event=account_create module=repo status=ok account_id={}",
            account.id
        );
        Ok(account)
    }

    fn get_account(&self, id: AccountId) -> AccountResult<Account> {
        self.conn
            .prepare_cached(SELECT_ACCOUNT_SQL)?
            .query_row([id], read_account_row)
            .optional()?
            .ok_or(AccountError::NotFound(id))
            .and_then(check_persisted)
    }

    fn update_account(&self, params: &UpdateAccountParams) -> AccountResult<Account> {
        let account = self
            .conn
            .prepare_cached(UPDATE_BALANCE_SQL)?
            .query_row(params![params.id, params.balance], read_account_row)
            .optional()
            .map_err(AccountError::from)
            .and_then(|row| row.ok_or(AccountError::NotFound(params.id)))
            .and_then(check_persisted)
            .inspect_err(|err| log_failure("account_update", Some(params.id), err))?;

        debug!(
            "event=account_update module=repo status=ok account_id={}",
            account.id
        );
        Ok(account)
    }

    fn delete_account(&self, id: AccountId) -> AccountResult<()> {
        let changed = self
            .conn
            .prepare_cached(DELETE_ACCOUNT_SQL)?
            .execute([id])
            .map_err(AccountError::from)
            .inspect_err(|err| log_failure("account_delete", Some(id), err))?;

        debug!("event=account_delete module=repo status=ok account_id={id} rows_affected={changed}");
        Ok(())
    }

    fn list_accounts(&self, params: &ListAccountsParams) -> AccountResult<Vec<Account>> {
        params.validate()?;

        let mut stmt = self.conn.prepare_cached(LIST_ACCOUNTS_SQL)?;
        let rows = stmt.query_map(
            params![i64::from(params.limit), i64::from(params.offset)],
            read_account_row,
        )?;

        let mut accounts = Vec::with_capacity(params.limit.min(64) as usize);
        for row in rows {
            accounts.push(check_persisted(row?)?);
        }
        Ok(accounts)
    }
}

fn read_account_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get("id")?,
        owner: row.get("owner")?,
        balance: row.get("balance")?,
        currency: row.get("currency")?,
        created_at: row.get("created_at")?,
    })
}

fn check_persisted(account: Account) -> AccountResult<Account> {
    if account.id <= 0 {
        return Err(AccountError::InvalidData(format!(
            "non-positive id `{}` in accounts.id",
            account.id
        )));
    }
    if account.created_at <= 0 {
        return Err(AccountError::InvalidData(format!(
            "missing created_at for account {}",
            account.id
        )));
    }
    Ok(account)
}

fn log_failure(event: &str, id: Option<AccountId>, err: &AccountError) {
    match id {
        Some(id) => warn!(
            "event={event} module=repo status=error account_id={id} error_code={} error={err}",
            err.code()
        ),
        None => warn!(
            "event={event} module=repo status=error error_code={} error={err}",
            err.code()
        ),
    }
}

fn ensure_schema_ready(conn: &Connection) -> AccountResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(AccountError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'accounts'
        );",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(AccountError::MissingRequiredTable("accounts"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(accounts);")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for &column in ACCOUNT_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(AccountError::MissingRequiredColumn {
                table: "accounts",
                column,
            });
        }
    }

    Ok(())
}
