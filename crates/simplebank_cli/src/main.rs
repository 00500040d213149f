//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `simplebank_core` linkage.
//! - Drive one account lifecycle against an in-memory store and print each
//!   step, so schema and statement wiring can be checked without a test run.

use simplebank_core::db::open_db_in_memory;
use simplebank_core::{
    AccountError, AccountStore, CreateAccountParams, ListAccountsParams, SqliteAccountStore,
    UpdateAccountParams,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("simplebank_core ping={}", simplebank_core::ping());
    println!("simplebank_core version={}", simplebank_core::core_version());

    match run_lifecycle() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lifecycle failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_lifecycle() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let store = SqliteAccountStore::try_new(&conn)?;

    let created = store.create_account(&CreateAccountParams::new("alice", 1000, "USD"))?;
    println!(
        "created id={} balance={} currency={}",
        created.id, created.balance, created.currency
    );

    let updated = store.update_account(&UpdateAccountParams {
        id: created.id,
        balance: 500,
    })?;
    println!("updated id={} balance={}", updated.id, updated.balance);

    let page = store.list_accounts(&ListAccountsParams::new(10, 0))?;
    println!("listed count={}", page.len());

    store.delete_account(created.id)?;
    match store.get_account(created.id) {
        Err(AccountError::NotFound(id)) => println!("deleted id={id}"),
        Ok(_) => return Err("account still visible after delete".into()),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
