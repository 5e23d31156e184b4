//! CLI subcommands.

pub mod migrate;
pub mod orders;

use secrecy::SecretString;

/// Read the database URL from `SOUS_CHEF_DATABASE_URL`, falling back to
/// `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("SOUS_CHEF_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
