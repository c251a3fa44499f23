use std::str::FromStr;

use anyhow::Context;
use chrono::NaiveDateTime;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::DATETIME_FMT;
use crate::models::{
    Booking, BookingDetail, BookingStatus, BookingWithDetails, Rating, Resource, ResourceCategory,
    ResourceSummary, User, UserContact, UserRole,
};

const BOOKING_COLUMNS: &str = "b.id, b.user_id, b.resource_id, b.start_time, b.end_time, b.status, \
     b.total_amount, b.notes, b.created_at, b.updated_at";

/// Columns appended after `BOOKING_COLUMNS` for list views, starting at
/// index 10: resource summary, requester contact, then the rating.
const DETAIL_COLUMNS: &str = "r.name, r.category, r.subcategory, u.username, u.email, \
     t.id, t.user_id, t.score, t.feedback, t.created_at";

const DETAIL_JOINS: &str = "FROM bookings b \
     JOIN resources r ON r.id = b.resource_id \
     LEFT JOIN users u ON u.id = b.user_id \
     LEFT JOIN ratings t ON t.booking_id = b.id";

const RESOURCE_COLUMNS: &str =
    "id, name, category, subcategory, capacity, hourly_rate, description, is_active, created_at";

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .with_context(|| format!("invalid stored timestamp: {s}"))
}

fn parse_decimal(s: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(s).with_context(|| format!("invalid stored decimal: {s}"))
}

// ── Users ──

pub fn insert_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, role) VALUES (?1, ?2, ?3, ?4)",
        params![user.id, user.username, user.email, user.role.as_str()],
    )?;
    Ok(())
}

const USER_COLUMNS: &str = "id, username, email, role";

pub fn get_user(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            |row| Ok(parse_user_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            |row| Ok(parse_user_row(row)),
        )
        .optional()?;

    result.transpose()
}

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let role_str: String = row.get(3)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        role: UserRole::parse(&role_str)
            .with_context(|| format!("unknown user role: {role_str}"))?,
    })
}

// ── Resources ──

pub fn insert_resource(conn: &Connection, resource: &Resource) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO resources (id, name, category, subcategory, capacity, hourly_rate, description, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            resource.id,
            resource.name,
            resource.category.as_str(),
            resource.subcategory,
            resource.capacity,
            resource.hourly_rate.to_string(),
            resource.description,
            resource.is_active,
            format_datetime(&resource.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_resource(conn: &Connection, id: &str) -> anyhow::Result<Option<Resource>> {
    let result = conn
        .query_row(
            &format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = ?1"),
            params![id],
            |row| Ok(parse_resource_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn list_resources(conn: &Connection, active_only: bool) -> anyhow::Result<Vec<Resource>> {
    let sql = if active_only {
        format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE is_active = 1 ORDER BY name ASC")
    } else {
        format!("SELECT {RESOURCE_COLUMNS} FROM resources ORDER BY name ASC")
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_resource_row(row)))?;

    let mut resources = vec![];
    for row in rows {
        resources.push(row??);
    }
    Ok(resources)
}

pub fn set_resource_active(conn: &Connection, id: &str, active: bool) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE resources SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    Ok(count > 0)
}

fn parse_resource_row(row: &rusqlite::Row) -> anyhow::Result<Resource> {
    let category_str: String = row.get(2)?;
    let rate_str: String = row.get(5)?;
    let created_at_str: String = row.get(8)?;

    Ok(Resource {
        id: row.get(0)?,
        name: row.get(1)?,
        category: ResourceCategory::parse(&category_str)
            .with_context(|| format!("unknown resource category: {category_str}"))?,
        subcategory: row.get(3)?,
        capacity: row.get(4)?,
        hourly_rate: parse_decimal(&rate_str)?,
        description: row.get(6)?,
        is_active: row.get(7)?,
        created_at: parse_datetime(&created_at_str)?,
    })
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, user_id, resource_id, start_time, end_time, status, total_amount, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.user_id,
            booking.resource_id,
            format_datetime(&booking.start_time),
            format_datetime(&booking.end_time),
            booking.status.as_str(),
            booking.total_amount.to_string(),
            booking.notes,
            format_datetime(&booking.created_at),
            format_datetime(&booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1"),
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;

    result.transpose()
}

/// Looks a booking up by id and owner at once, so a non-owner cannot tell a
/// foreign booking from a missing one.
pub fn get_booking_for_user(
    conn: &Connection,
    id: &str,
    user_id: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1 AND b.user_id = ?2"),
            params![id, user_id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn get_active_bookings_for_resource(
    conn: &Connection,
    resource_id: &str,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings b
         WHERE b.resource_id = ?1 AND b.status != 'cancelled' ORDER BY b.start_time ASC"
    ))?;

    let rows = stmt.query_map(params![resource_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    updated_at: &NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), format_datetime(updated_at), id],
    )?;
    Ok(count > 0)
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub user_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub category: Option<ResourceCategory>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub limit: i64,
    pub offset: i64,
}

pub fn list_bookings(
    conn: &Connection,
    filter: &BookingFilter,
) -> anyhow::Result<Vec<BookingWithDetails>> {
    let mut conditions: Vec<String> = vec![];
    let mut values: Vec<Box<dyn ToSql>> = vec![];

    if let Some(user_id) = &filter.user_id {
        values.push(Box::new(user_id.clone()));
        conditions.push(format!("b.user_id = ?{}", values.len()));
    }
    if let Some(status) = filter.status {
        values.push(Box::new(status.as_str()));
        conditions.push(format!("b.status = ?{}", values.len()));
    }
    if let Some(category) = filter.category {
        values.push(Box::new(category.as_str()));
        conditions.push(format!("r.category = ?{}", values.len()));
    }
    if let Some(from) = &filter.from {
        values.push(Box::new(format_datetime(from)));
        conditions.push(format!("b.start_time >= ?{}", values.len()));
    }
    if let Some(to) = &filter.to {
        values.push(Box::new(format_datetime(to)));
        conditions.push(format!("b.start_time <= ?{}", values.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    values.push(Box::new(filter.limit));
    let limit_idx = values.len();
    values.push(Box::new(filter.offset));
    let offset_idx = values.len();

    let sql = format!(
        "SELECT {BOOKING_COLUMNS}, {DETAIL_COLUMNS} {DETAIL_JOINS} \
         {where_clause} ORDER BY b.created_at DESC, b.id ASC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = values.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        Ok(parse_booking_with_details_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// All bookings whose creation instant falls within the inclusive window.
pub fn list_bookings_created_between(
    conn: &Connection,
    from: Option<&NaiveDateTime>,
    to: Option<&NaiveDateTime>,
) -> anyhow::Result<Vec<Booking>> {
    let from_str = from.map(format_datetime);
    let to_str = to.map(format_datetime);

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings b
         WHERE (?1 IS NULL OR b.created_at >= ?1) AND (?2 IS NULL OR b.created_at <= ?2)
         ORDER BY b.created_at ASC"
    ))?;

    let rows = stmt.query_map(params![from_str, to_str], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn list_user_bookings(
    conn: &Connection,
    user_id: &str,
) -> anyhow::Result<Vec<BookingWithDetails>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS}, {DETAIL_COLUMNS} {DETAIL_JOINS}
         WHERE b.user_id = ?1 ORDER BY b.created_at DESC, b.id ASC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| {
        Ok(parse_booking_with_details_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let start_time_str: String = row.get(3)?;
    let end_time_str: String = row.get(4)?;
    let status_str: String = row.get(5)?;
    let amount_str: String = row.get(6)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        resource_id: row.get(2)?,
        start_time: parse_datetime(&start_time_str)?,
        end_time: parse_datetime(&end_time_str)?,
        status: BookingStatus::parse(&status_str)
            .with_context(|| format!("unknown booking status: {status_str}"))?,
        total_amount: parse_decimal(&amount_str)?,
        notes: row.get(7)?,
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}

fn parse_booking_with_details_row(row: &rusqlite::Row) -> anyhow::Result<BookingWithDetails> {
    let booking = parse_booking_row(row)?;

    let category_str: String = row.get(11)?;
    let resource = ResourceSummary {
        name: row.get(10)?,
        category: ResourceCategory::parse(&category_str)
            .with_context(|| format!("unknown resource category: {category_str}"))?,
        subcategory: row.get(12)?,
    };

    let username: Option<String> = row.get(13)?;
    let email: Option<String> = row.get(14)?;
    let requester = match (username, email) {
        (Some(username), Some(email)) => Some(UserContact { username, email }),
        _ => None,
    };

    let rating_id: Option<String> = row.get(15)?;
    let rating = match rating_id {
        Some(id) => {
            let created_at_str: String = row.get(19)?;
            Some(Rating {
                id,
                booking_id: booking.id.clone(),
                user_id: row.get(16)?,
                score: row.get(17)?,
                feedback: row.get(18)?,
                created_at: parse_datetime(&created_at_str)?,
            })
        }
        None => None,
    };

    Ok(BookingWithDetails {
        booking,
        resource,
        requester,
        rating,
    })
}

// ── Ratings ──

pub fn insert_rating(conn: &Connection, rating: &Rating) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO ratings (id, booking_id, user_id, score, feedback, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            rating.id,
            rating.booking_id,
            rating.user_id,
            rating.score,
            rating.feedback,
            format_datetime(&rating.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_rating_for_booking(
    conn: &Connection,
    booking_id: &str,
) -> anyhow::Result<Option<Rating>> {
    let result = conn
        .query_row(
            "SELECT id, booking_id, user_id, score, feedback, created_at FROM ratings WHERE booking_id = ?1",
            params![booking_id],
            |row| {
                let created_at_str: String = row.get(5)?;
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    created_at_str,
                ))
            },
        )
        .optional()?;

    match result {
        Some((id, booking_id, user_id, score, feedback, created_at_str)) => Ok(Some(Rating {
            id,
            booking_id,
            user_id,
            score,
            feedback,
            created_at: parse_datetime(&created_at_str)?,
        })),
        None => Ok(None),
    }
}

// ── Projections ──

pub fn get_booking_detail(conn: &Connection, id: &str) -> anyhow::Result<Option<BookingDetail>> {
    let result = conn
        .query_row(
            "SELECT b.id, r.name, r.category, r.subcategory, b.start_time, b.end_time,
                    b.user_id, u.username, u.email, b.total_amount, b.status, b.notes
             FROM bookings b
             JOIN resources r ON r.id = b.resource_id
             LEFT JOIN users u ON u.id = b.user_id
             WHERE b.id = ?1",
            params![id],
            |row| Ok(parse_booking_detail_row(row)),
        )
        .optional()?;

    result.transpose()
}

fn parse_booking_detail_row(row: &rusqlite::Row) -> anyhow::Result<BookingDetail> {
    let category_str: String = row.get(2)?;
    let start_time_str: String = row.get(4)?;
    let end_time_str: String = row.get(5)?;
    let amount_str: String = row.get(9)?;
    let status_str: String = row.get(10)?;

    Ok(BookingDetail {
        booking_id: row.get(0)?,
        resource_name: row.get(1)?,
        resource_category: ResourceCategory::parse(&category_str)
            .with_context(|| format!("unknown resource category: {category_str}"))?,
        resource_subcategory: row.get(3)?,
        start_time: parse_datetime(&start_time_str)?,
        end_time: parse_datetime(&end_time_str)?,
        user_id: row.get(6)?,
        username: row.get(7)?,
        email: row.get(8)?,
        total_amount: parse_decimal(&amount_str)?,
        status: BookingStatus::parse(&status_str)
            .with_context(|| format!("unknown booking status: {status_str}"))?,
        notes: row.get(11)?,
    })
}
