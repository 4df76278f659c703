use anyhow::Context;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, OtpRecord};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_dt(dt: &NaiveDateTime) -> String {
    dt.format(DT_FORMAT).to_string()
}

fn parse_dt(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DT_FORMAT)
        .with_context(|| format!("malformed stored timestamp: {s}"))
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, customer_name, customer_email, customer_phone, service_id, stylist_id, date, time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.service_id,
            booking.stylist_id,
            booking.date,
            booking.time,
            booking.status.as_str(),
            format_dt(&booking.created_at),
        ],
    )?;
    Ok(())
}

/// All bookings, most recently created first. Insertion order breaks ties
/// between bookings created within the same second.
pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, customer_name, customer_email, customer_phone, service_id, stylist_id, date, time, status, created_at
         FROM bookings ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, customer_name, customer_email, customer_phone, service_id, stylist_id, date, time, status, created_at
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn booking_id_exists(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Updates the status column only. Returns false when no booking has the
/// given id.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub struct BookingStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub completed: i64,
}

pub fn get_booking_stats(conn: &Connection) -> anyhow::Result<BookingStats> {
    let count_for = |status: Option<BookingStatus>| -> anyhow::Result<i64> {
        let n = match status {
            Some(s) => conn.query_row(
                "SELECT COUNT(*) FROM bookings WHERE status = ?1",
                params![s.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?,
        };
        Ok(n)
    };

    Ok(BookingStats {
        total: count_for(None)?,
        pending: count_for(Some(BookingStatus::Pending))?,
        confirmed: count_for(Some(BookingStatus::Confirmed))?,
        cancelled: count_for(Some(BookingStatus::Cancelled))?,
        completed: count_for(Some(BookingStatus::Completed))?,
    })
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    Ok(Booking {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        customer_email: row.get(2)?,
        customer_phone: row.get(3)?,
        service_id: row.get(4)?,
        stylist_id: row.get(5)?,
        date: row.get(6)?,
        time: row.get(7)?,
        status: BookingStatus::parse(&status_str),
        created_at: parse_dt(&created_at_str)?,
    })
}

// ── OTP records ──

pub fn upsert_otp(
    conn: &Connection,
    phone: &str,
    code: &str,
    expires_at: &NaiveDateTime,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO otp_records (phone, code, expires_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(phone) DO UPDATE SET code = excluded.code, expires_at = excluded.expires_at",
        params![phone, code, format_dt(expires_at)],
    )?;
    Ok(())
}

pub fn get_otp(conn: &Connection, phone: &str) -> anyhow::Result<Option<OtpRecord>> {
    let result = conn.query_row(
        "SELECT phone, code, expires_at FROM otp_records WHERE phone = ?1",
        params![phone],
        |row| {
            let phone: String = row.get(0)?;
            let code: String = row.get(1)?;
            let expires_at_str: String = row.get(2)?;
            Ok((phone, code, expires_at_str))
        },
    );

    match result {
        Ok((phone, code, expires_at_str)) => Ok(Some(OtpRecord {
            phone,
            code,
            expires_at: parse_dt(&expires_at_str)?,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_otp(conn: &Connection, phone: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM otp_records WHERE phone = ?1", params![phone])?;
    Ok(())
}

// ── Admin session flag ──

pub fn set_admin_session(conn: &Connection, active: bool) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO admin_session (id, active) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET active = excluded.active",
        params![active as i32],
    )?;
    Ok(())
}

pub fn get_admin_session(conn: &Connection) -> anyhow::Result<bool> {
    let result = conn.query_row("SELECT active FROM admin_session WHERE id = 1", [], |row| {
        row.get::<_, i64>(0)
    });

    match result {
        Ok(active) => Ok(active != 0),
        // No row yet means no admin has ever logged in.
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_malformed_stored_timestamp_surfaces_error() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO bookings (id, customer_name, customer_email, customer_phone, service_id, date, time, status, created_at)
             VALUES ('LUM-000001', 'A', 'a@x.com', '+10000000000', 's1', '2099-01-01', '10:00', 'PENDING', 'not-a-date')",
            [],
        )
        .unwrap();

        assert!(get_all_bookings(&conn).is_err());
        assert!(get_booking_by_id(&conn, "LUM-000001").is_err());
    }

    #[test]
    fn test_malformed_otp_expiry_surfaces_error() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO otp_records (phone, code, expires_at) VALUES ('+10000000000', '123456', 'garbage')",
            [],
        )
        .unwrap();

        assert!(get_otp(&conn, "+10000000000").is_err());
    }

    #[test]
    fn test_admin_session_defaults_to_false() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(!get_admin_session(&conn).unwrap());
    }

    #[test]
    fn test_admin_session_propagates_database_errors() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute_batch("DROP TABLE admin_session").unwrap();
        assert!(get_admin_session(&conn).is_err());
    }
}
