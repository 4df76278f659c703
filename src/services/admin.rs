use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::queries;

/// Trivial credential gate for the admin view: one fixed credential pair
/// from config, a persisted process-wide session flag, nothing more.
/// Not real authentication, and not meant to be.
pub fn login(
    conn: &Connection,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> anyhow::Result<bool> {
    if email == config.admin_email && password == config.admin_password {
        queries::set_admin_session(conn, true)?;
        tracing::info!("admin session opened");
        Ok(true)
    } else {
        tracing::warn!("admin login rejected");
        Ok(false)
    }
}

pub fn is_authenticated(conn: &Connection) -> anyhow::Result<bool> {
    queries::get_admin_session(conn)
}

pub fn logout(conn: &Connection) -> anyhow::Result<()> {
    queries::set_admin_session(conn, false)?;
    tracing::info!("admin session closed");
    Ok(())
}
