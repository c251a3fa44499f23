use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{NewResource, Resource, User};
use crate::services::clock::Clock;

pub fn create_resource(
    conn: &Connection,
    clock: &dyn Clock,
    input: NewResource,
) -> AppResult<Resource> {
    input.validate()?;

    let resource = Resource {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name.trim().to_string(),
        category: input.category,
        subcategory: input.subcategory.trim().to_string(),
        capacity: input.capacity,
        hourly_rate: input.hourly_rate,
        description: input.description,
        is_active: input.is_active,
        created_at: clock.now(),
    };
    queries::insert_resource(conn, &resource)?;

    tracing::info!(resource_id = %resource.id, category = %resource.category, "resource created");
    Ok(resource)
}

pub fn get_resource(conn: &Connection, id: &str) -> AppResult<Resource> {
    queries::get_resource(conn, id)?.ok_or_else(|| AppError::NotFound(format!("resource {id}")))
}

/// Toggles whether new bookings may reference the resource. Existing
/// bookings are untouched.
pub fn set_resource_active(conn: &Connection, id: &str, active: bool) -> AppResult<Resource> {
    if !queries::set_resource_active(conn, id, active)? {
        return Err(AppError::NotFound(format!("resource {id}")));
    }
    tracing::info!(resource_id = id, active, "resource activation changed");
    get_resource(conn, id)
}

/// Adds a directory entry. Registration never overwrites: an id or email
/// that is already taken is reported as a conflict and the stored entry is
/// left as it was.
pub fn register_user(conn: &mut Connection, user: User) -> AppResult<User> {
    if user.id.trim().is_empty() || user.username.trim().is_empty() {
        return Err(AppError::Validation(
            "id and username must not be empty".to_string(),
        ));
    }
    if !user.email.contains('@') {
        return Err(AppError::Validation(format!("invalid email: {}", user.email)));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if queries::get_user(&tx, &user.id)?.is_some() {
        tracing::warn!(user_id = %user.id, "registration rejected: id taken");
        return Err(AppError::Conflict(format!("user {} already exists", user.id)));
    }
    if queries::get_user_by_email(&tx, &user.email)?.is_some() {
        tracing::warn!(user_id = %user.id, "registration rejected: email taken");
        return Err(AppError::Conflict(format!(
            "email {} is already registered",
            user.email
        )));
    }

    queries::insert_user(&tx, &user)?;
    tx.commit()?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");
    Ok(user)
}

pub fn get_user(conn: &Connection, id: &str) -> AppResult<User> {
    queries::get_user(conn, id)?.ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{ResourceCategory, UserRole};
    use crate::services::clock::FixedClock;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;

    fn clock() -> FixedClock {
        FixedClock(NaiveDateTime::parse_from_str("2030-01-01 00:00", "%Y-%m-%d %H:%M").unwrap())
    }

    fn forklift(active: bool) -> NewResource {
        NewResource {
            name: " Forklift 3 ".to_string(),
            category: ResourceCategory::ForkliftService,
            subcategory: "3_ton_forklift".to_string(),
            capacity: Some(3),
            hourly_rate: Decimal::new(4550, 2),
            description: Some("Yard B".to_string()),
            is_active: active,
        }
    }

    #[test]
    fn test_create_and_list_active_resources() {
        let conn = db::init_db(":memory:").unwrap();
        let active = create_resource(&conn, &clock(), forklift(true)).unwrap();
        create_resource(&conn, &clock(), forklift(false)).unwrap();

        assert_eq!(active.name, "Forklift 3");
        let listed = queries::list_resources(&conn, true).unwrap();
        assert_eq!(listed, vec![active.clone()]);
        assert_eq!(queries::list_resources(&conn, false).unwrap().len(), 2);

        let fetched = get_resource(&conn, &active.id).unwrap();
        assert_eq!(fetched.hourly_rate, Decimal::new(4550, 2));
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let conn = db::init_db(":memory:").unwrap();
        let mut input = forklift(true);
        input.hourly_rate = Decimal::ZERO;
        assert!(matches!(
            create_resource(&conn, &clock(), input),
            Err(AppError::Validation(_))
        ));
        assert!(queries::list_resources(&conn, false).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_activation() {
        let conn = db::init_db(":memory:").unwrap();
        let resource = create_resource(&conn, &clock(), forklift(true)).unwrap();

        let off = set_resource_active(&conn, &resource.id, false).unwrap();
        assert!(!off.is_active);
        assert!(queries::list_resources(&conn, true).unwrap().is_empty());

        assert!(matches!(
            set_resource_active(&conn, "missing", true),
            Err(AppError::NotFound(_))
        ));
    }

    fn user(id: &str, email: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            username: id.to_string(),
            email: email.to_string(),
            role,
        }
    }

    #[test]
    fn test_register_and_fetch_user() {
        let mut conn = db::init_db(":memory:").unwrap();
        let ops = user("ops-1", "dispatch@example.com", UserRole::Operations);
        register_user(&mut conn, ops.clone()).unwrap();
        assert_eq!(get_user(&conn, "ops-1").unwrap(), ops);
        assert!(matches!(get_user(&conn, "nobody"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let mut conn = db::init_db(":memory:").unwrap();
        let bad = user("u1", "not-an-email", UserRole::Customer);
        assert!(matches!(register_user(&mut conn, bad), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_register_does_not_overwrite_existing_id() {
        let mut conn = db::init_db(":memory:").unwrap();
        let original = user("ops-1", "dispatch@example.com", UserRole::Operations);
        register_user(&mut conn, original.clone()).unwrap();

        let takeover = user("ops-1", "attacker@example.com", UserRole::Customer);
        let err = register_user(&mut conn, takeover).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);

        assert_eq!(get_user(&conn, "ops-1").unwrap(), original);
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let mut conn = db::init_db(":memory:").unwrap();
        register_user(&mut conn, user("u1", "shared@example.com", UserRole::Customer)).unwrap();

        let err = register_user(&mut conn, user("u2", "shared@example.com", UserRole::Customer))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(matches!(get_user(&conn, "u2"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_unknown_stored_role_is_an_error() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO users (id, username, email, role) VALUES ('x', 'x', 'x@example.com', 'admin')",
            [],
        )
        .unwrap();

        let err = get_user(&conn, "x").unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.to_string().contains("unknown user role: admin"));
    }
}
