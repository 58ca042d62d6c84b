//! Reservation Repository

use super::{RepoResult, Tx};
use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use sqlx::SqlitePool;

pub async fn insert(tx: &mut Tx<'_>, data: &ReservationCreate, now: i64) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reservation (table_id, customer_name, phone, party_size, reserved_for, special_requests, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'confirmed', ?7) RETURNING id",
    )
    .bind(data.table_id)
    .bind(&data.customer_name)
    .bind(&data.phone)
    .bind(data.party_size)
    .bind(data.reserved_for)
    .bind(&data.special_requests)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn find_by_id_tx(tx: &mut Tx<'_>, id: i64) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT id, table_id, customer_name, phone, party_size, reserved_for, special_requests, status, created_at FROM reservation WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(reservation)
}

/// Confirmed reservations, soonest first
pub async fn find_confirmed(pool: &SqlitePool) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id, table_id, customer_name, phone, party_size, reserved_for, special_requests, status, created_at FROM reservation WHERE status = 'confirmed' ORDER BY reserved_for, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

pub async fn set_status(tx: &mut Tx<'_>, id: i64, status: ReservationStatus) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE reservation SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_confirmed_for_table(tx: &mut Tx<'_>, table_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation WHERE table_id = ? AND status = 'confirmed'",
    )
    .bind(table_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count)
}
