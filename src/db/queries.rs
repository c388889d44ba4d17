use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{BusinessProfile, OperatingHours, ServiceOffering};

// ── Business ──

/// Loads the business row with its active services (catalog order) and
/// its weekly hours. Returns None when no row exists for the id.
pub fn get_business_profile(
    conn: &Connection,
    business_id: i64,
) -> anyhow::Result<Option<BusinessProfile>> {
    let row = conn
        .query_row(
            "SELECT id, studio_name, address, phone, whatsapp, website, bot_tone, bot_intro_message
             FROM business_config WHERE id = ?1",
            params![business_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            },
        )
        .optional()?;

    let Some((id, studio_name, address, phone, whatsapp, website, bot_tone, bot_intro_message)) =
        row
    else {
        return Ok(None);
    };

    let services = list_services(conn, business_id, true)?;
    let hours = get_operating_hours(conn, business_id)?;

    Ok(Some(BusinessProfile {
        id,
        studio_name,
        address,
        phone,
        whatsapp,
        website,
        bot_tone,
        bot_intro_message,
        services,
        hours,
    }))
}

/// Inserts the built-in default business row and its default hours when
/// the table is empty, and returns the id of the first row either way.
pub fn seed_default_business(conn: &Connection) -> anyhow::Result<i64> {
    if let Some(id) = conn
        .query_row(
            "SELECT id FROM business_config ORDER BY id ASC LIMIT 1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
    {
        return Ok(id);
    }

    let defaults = BusinessProfile::fallback();
    conn.execute(
        "INSERT INTO business_config (studio_name, address, phone, whatsapp, bot_tone, bot_intro_message)
         VALUES (?1, '', '', '', ?2, ?3)",
        params![
            defaults.studio_name,
            defaults.bot_tone,
            defaults.bot_intro_message,
        ],
    )?;
    let id = conn.last_insert_rowid();

    for hour in BusinessProfile::default_hours() {
        conn.execute(
            "INSERT INTO operating_hours (business_id, day_of_week, open_time, close_time, is_closed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                hour.day_of_week as i64,
                hour.open_time,
                hour.close_time,
                hour.is_closed as i32,
            ],
        )?;
    }

    tracing::info!(business_id = id, "seeded default business profile");
    Ok(id)
}

pub struct BusinessUpdate {
    pub studio_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub bot_tone: Option<String>,
    pub bot_intro_message: Option<String>,
}

/// Partial update; absent fields keep their stored value. Returns false
/// when the row does not exist.
pub fn update_business(
    conn: &Connection,
    business_id: i64,
    update: &BusinessUpdate,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE business_config SET
           studio_name = COALESCE(?1, studio_name),
           address = COALESCE(?2, address),
           phone = COALESCE(?3, phone),
           whatsapp = COALESCE(?4, whatsapp),
           website = COALESCE(?5, website),
           bot_tone = COALESCE(?6, bot_tone),
           bot_intro_message = COALESCE(?7, bot_intro_message),
           updated_at = datetime('now')
         WHERE id = ?8",
        params![
            update.studio_name,
            update.address,
            update.phone,
            update.whatsapp,
            update.website,
            update.bot_tone,
            update.bot_intro_message,
            business_id,
        ],
    )?;
    Ok(count > 0)
}

// ── Services ──

pub fn list_services(
    conn: &Connection,
    business_id: i64,
    only_active: bool,
) -> anyhow::Result<Vec<ServiceOffering>> {
    let sql = if only_active {
        "SELECT id, name, price, duration_minutes, description, active
         FROM services WHERE business_id = ?1 AND active = 1 ORDER BY id ASC"
    } else {
        "SELECT id, name, price, duration_minutes, description, active
         FROM services WHERE business_id = ?1 ORDER BY id ASC"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![business_id], |row| {
        Ok(ServiceOffering {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            duration_minutes: row.get(3)?,
            description: row.get(4)?,
            active: row.get::<_, i32>(5)? != 0,
        })
    })?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn insert_service(
    conn: &Connection,
    business_id: i64,
    name: &str,
    price: f64,
    duration_minutes: i64,
    description: Option<&str>,
) -> anyhow::Result<ServiceOffering> {
    conn.execute(
        "INSERT INTO services (business_id, name, price, duration_minutes, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![business_id, name, price, duration_minutes, description],
    )?;

    Ok(ServiceOffering {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        price,
        duration_minutes,
        description: description.map(|d| d.to_string()),
        active: true,
    })
}

pub struct ServiceUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

pub fn update_service(
    conn: &Connection,
    service_id: i64,
    update: &ServiceUpdate,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET
           name = COALESCE(?1, name),
           price = COALESCE(?2, price),
           duration_minutes = COALESCE(?3, duration_minutes),
           description = COALESCE(?4, description),
           active = COALESCE(?5, active)
         WHERE id = ?6",
        params![
            update.name,
            update.price,
            update.duration_minutes,
            update.description,
            update.active.map(|a| a as i32),
            service_id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, service_id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![service_id])?;
    Ok(count > 0)
}

// ── Operating hours ──

pub fn get_operating_hours(
    conn: &Connection,
    business_id: i64,
) -> anyhow::Result<Vec<OperatingHours>> {
    let mut stmt = conn.prepare(
        "SELECT day_of_week, open_time, close_time, is_closed
         FROM operating_hours WHERE business_id = ?1 ORDER BY day_of_week ASC",
    )?;

    let rows = stmt.query_map(params![business_id], |row| {
        Ok(OperatingHours {
            day_of_week: row.get::<_, i64>(0)? as usize,
            open_time: row.get(1)?,
            close_time: row.get(2)?,
            is_closed: row.get::<_, i32>(3)? != 0,
        })
    })?;

    let mut hours = vec![];
    for row in rows {
        hours.push(row?);
    }
    Ok(hours)
}

pub fn upsert_operating_hours(
    conn: &Connection,
    business_id: i64,
    hours: &[OperatingHours],
) -> anyhow::Result<()> {
    for hour in hours {
        conn.execute(
            "INSERT INTO operating_hours (business_id, day_of_week, open_time, close_time, is_closed)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(business_id, day_of_week) DO UPDATE SET
               open_time = excluded.open_time,
               close_time = excluded.close_time,
               is_closed = excluded.is_closed",
            params![
                business_id,
                hour.day_of_week as i64,
                hour.open_time,
                hour.close_time,
                hour.is_closed as i32,
            ],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn test_conn() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn missing_business_returns_none() {
        let conn = test_conn();
        assert!(get_business_profile(&conn, 1).unwrap().is_none());
    }

    #[test]
    fn seed_creates_row_with_default_hours() {
        let conn = test_conn();
        let id = seed_default_business(&conn).unwrap();
        let profile = get_business_profile(&conn, id).unwrap().unwrap();

        assert_eq!(profile.studio_name, "Meu Studio de Sobrancelhas");
        assert_eq!(profile.hours.len(), 7);
        assert!(profile.hours[6].is_closed);
        assert_eq!(profile.hours[0].open_time, "09:00");
        assert_eq!(profile.hours[5].close_time, "16:00");

        // Seeding again is a no-op
        assert_eq!(seed_default_business(&conn).unwrap(), id);
    }

    #[test]
    fn only_active_services_are_listed() {
        let conn = test_conn();
        let id = seed_default_business(&conn).unwrap();
        let svc = insert_service(&conn, id, "Henna", 30.0, 45, None).unwrap();
        insert_service(&conn, id, "Buço", 15.0, 20, Some("Depilação com cera")).unwrap();

        update_service(
            &conn,
            svc.id,
            &ServiceUpdate {
                name: None,
                price: None,
                duration_minutes: None,
                description: None,
                active: Some(false),
            },
        )
        .unwrap();

        let active = list_services(&conn, id, true).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Buço");

        let all = list_services(&conn, id, false).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn hours_upsert_replaces_by_day() {
        let conn = test_conn();
        let id = seed_default_business(&conn).unwrap();

        upsert_operating_hours(
            &conn,
            id,
            &[OperatingHours {
                day_of_week: 6,
                open_time: "10:00".to_string(),
                close_time: "14:00".to_string(),
                is_closed: false,
            }],
        )
        .unwrap();

        let hours = get_operating_hours(&conn, id).unwrap();
        assert_eq!(hours.len(), 7);
        assert!(!hours[6].is_closed);
        assert_eq!(hours[6].open_time, "10:00");
    }

    #[test]
    fn partial_business_update_keeps_other_fields() {
        let conn = test_conn();
        let id = seed_default_business(&conn).unwrap();

        let updated = update_business(
            &conn,
            id,
            &BusinessUpdate {
                studio_name: Some("Studio Bella".to_string()),
                address: None,
                phone: None,
                whatsapp: Some("(11) 98888-7777".to_string()),
                website: None,
                bot_tone: None,
                bot_intro_message: None,
            },
        )
        .unwrap();
        assert!(updated);

        let profile = get_business_profile(&conn, id).unwrap().unwrap();
        assert_eq!(profile.studio_name, "Studio Bella");
        assert_eq!(profile.whatsapp, "(11) 98888-7777");
        assert_eq!(profile.bot_tone, "Seja simpática, profissional e prestativa.");
    }
}
