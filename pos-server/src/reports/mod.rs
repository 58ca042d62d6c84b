//! Sales reporting
//!
//! Every figure covers one business day in the configured timezone. Sales
//! are counted by completion time; status and type counts by creation time.

use std::collections::HashMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    DashboardStats, HourlySales, OrderStatus, OrderType, StatusCount, TableStatus,
    TableStatusCount, TopItem, TypeCount,
};
use sqlx::SqlitePool;

use crate::db::repository::{dining_table, report};
use crate::orders::money;
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, local_hour};

#[derive(Clone)]
pub struct ReportService {
    pool: SqlitePool,
    tz: Tz,
}

impl ReportService {
    pub fn new(pool: SqlitePool, tz: Tz) -> Self {
        Self { pool, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    fn window(&self, date: NaiveDate) -> (i64, i64) {
        (day_start_millis(date, self.tz), day_end_millis(date, self.tz))
    }

    /// Completed sales per local hour, all 24 hours present
    pub async fn hourly_sales(&self, date: NaiveDate) -> AppResult<Vec<HourlySales>> {
        let (start, end) = self.window(date);
        let sales = report::completed_sales(&self.pool, start, end).await?;

        let mut buckets: Vec<(i64, Vec<f64>)> = vec![(0, Vec::new()); 24];
        for (completed_at, total) in sales {
            if let Some(hour) = local_hour(completed_at, self.tz) {
                let bucket = &mut buckets[hour as usize];
                bucket.0 += 1;
                bucket.1.push(total);
            }
        }

        Ok(buckets
            .into_iter()
            .enumerate()
            .map(|(hour, (order_count, totals))| HourlySales {
                hour: hour as u32,
                order_count,
                total_sales: money::sum(totals),
            })
            .collect())
    }

    /// Orders created on `date` per status, zero-filled
    pub async fn status_counts(&self, date: NaiveDate) -> AppResult<Vec<StatusCount>> {
        let (start, end) = self.window(date);
        let counts: HashMap<OrderStatus, i64> = report::status_counts(&self.pool, start, end)
            .await?
            .into_iter()
            .collect();
        Ok(OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: counts.get(&status).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Orders created on `date` per order type, zero-filled
    pub async fn type_counts(&self, date: NaiveDate) -> AppResult<Vec<TypeCount>> {
        let (start, end) = self.window(date);
        let counts: HashMap<OrderType, i64> = report::type_counts(&self.pool, start, end)
            .await?
            .into_iter()
            .collect();
        Ok(OrderType::ALL
            .into_iter()
            .map(|order_type| TypeCount {
                order_type,
                count: counts.get(&order_type).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Current table occupancy, zero-filled
    pub async fn table_counts(&self) -> AppResult<Vec<TableStatusCount>> {
        let counts: HashMap<TableStatus, i64> = dining_table::count_by_status(&self.pool)
            .await?
            .into_iter()
            .collect();
        Ok(TableStatus::ALL
            .into_iter()
            .map(|status| TableStatusCount {
                status,
                count: counts.get(&status).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Best-selling item by quantity, revenue breaks ties
    pub async fn top_item(&self, date: NaiveDate) -> AppResult<Option<TopItem>> {
        let (start, end) = self.window(date);
        let lines = report::completed_lines(&self.pool, start, end).await?;

        let mut items: HashMap<i64, (String, i64, Decimal)> = HashMap::new();
        for (menu_item_id, name, quantity, line_total) in lines {
            let entry = items
                .entry(menu_item_id)
                .or_insert_with(|| (name, 0, Decimal::ZERO));
            entry.1 += i64::from(quantity);
            entry.2 += money::to_decimal(line_total);
        }

        Ok(items
            .into_iter()
            .max_by(|(a_id, a), (b_id, b)| {
                a.1.cmp(&b.1)
                    .then(a.2.cmp(&b.2))
                    .then(b_id.cmp(a_id))
            })
            .map(|(menu_item_id, (name, quantity, revenue))| TopItem {
                menu_item_id,
                name,
                quantity,
                revenue: money::to_f64(revenue),
            }))
    }

    pub async fn dashboard(&self, date: NaiveDate) -> AppResult<DashboardStats> {
        let hourly = self.hourly_sales(date).await?;
        let total_sales = money::sum(hourly.iter().map(|h| h.total_sales));
        let completed_orders: i64 = hourly.iter().map(|h| h.order_count).sum();

        let average_order_value = if completed_orders > 0 {
            money::to_f64(money::to_decimal(total_sales) / Decimal::from(completed_orders))
        } else {
            0.0
        };

        let peak_hour = hourly
            .iter()
            .filter(|h| h.order_count > 0)
            .fold(None::<&HourlySales>, |best, h| match best {
                Some(b) if b.total_sales >= h.total_sales => Some(b),
                _ => Some(h),
            })
            .map(|h| h.hour);

        let sales_change_pct = match date.pred_opt() {
            Some(yesterday) => {
                let (start, end) = self.window(yesterday);
                let previous = money::sum(
                    report::completed_sales(&self.pool, start, end)
                        .await?
                        .into_iter()
                        .map(|(_, total)| total),
                );
                change_pct(previous, total_sales)
            }
            None => None,
        };

        Ok(DashboardStats {
            date: date.format("%Y-%m-%d").to_string(),
            total_sales,
            sales_change_pct,
            completed_orders,
            average_order_value,
            top_item: self.top_item(date).await?,
            peak_hour,
            status_counts: self.status_counts(date).await?,
            type_counts: self.type_counts(date).await?,
            table_counts: self.table_counts().await?,
        })
    }
}

/// Percentage change from `previous` to `current`, None without a baseline
fn change_pct(previous: f64, current: f64) -> Option<f64> {
    if previous <= 0.0 {
        return None;
    }
    let previous = money::to_decimal(previous);
    let current = money::to_decimal(current);
    Some(money::to_f64(
        (current - previous) / previous * Decimal::ONE_HUNDRED,
    ))
}
