//! Read-only aggregates for the dashboards and the `/stats` endpoints.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::models::client;
use crate::models::repair_ticket::{self, TicketStatus};
use crate::models::user::{self, Role};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub label: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    /// Non-archived tickets.
    pub total_tickets: u64,
    /// Non-archived tickets not yet delivered.
    pub active_tickets: u64,
    pub completed_tickets: u64,
    /// Final cost of tickets completed this calendar month.
    pub monthly_revenue: f64,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientStats {
    pub total_clients: u64,
    pub vip_clients: u64,
    pub new_clients_month: u64,
    pub avg_tickets_per_client: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub by_role: BTreeMap<String, u64>,
    /// Users that logged in during the last 7 days.
    pub recent_users: u64,
}

fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

pub async fn dashboard(db: &DatabaseConnection) -> Result<DashboardStats, DbErr> {
    let mut by_status = Vec::with_capacity(TicketStatus::ALL.len());
    let mut total_tickets = 0;

    for status in TicketStatus::ALL {
        let count = repair_ticket::Entity::find()
            .filter(repair_ticket::Column::IsArchived.eq(false))
            .filter(repair_ticket::Column::Status.eq(status))
            .count(db)
            .await?;
        total_tickets += count;
        by_status.push(StatusCount {
            status,
            label: status.label(),
            count,
        });
    }

    let completed_tickets = by_status
        .iter()
        .filter(|s| s.status == TicketStatus::Delivered)
        .map(|s| s.count)
        .sum::<u64>();

    let monthly_revenue = repair_ticket::Entity::find()
        .filter(repair_ticket::Column::ActualCompletion.gte(month_start(Utc::now().date_naive())))
        .filter(repair_ticket::Column::FinalCost.is_not_null())
        .all(db)
        .await?
        .iter()
        .filter_map(|t| t.final_cost)
        .sum();

    Ok(DashboardStats {
        total_tickets,
        active_tickets: total_tickets - completed_tickets,
        completed_tickets,
        monthly_revenue,
        by_status,
    })
}

pub async fn clients(db: &DatabaseConnection) -> Result<ClientStats, DbErr> {
    let total_clients = client::Entity::find().count(db).await?;
    let vip_clients = client::Entity::find()
        .filter(client::Column::IsVip.eq(true))
        .count(db)
        .await?;
    let new_clients_month = client::Entity::find()
        .filter(client::Column::CreatedAt.gte(Utc::now() - Duration::days(30)))
        .count(db)
        .await?;
    let total_tickets = repair_ticket::Entity::find().count(db).await?;

    let avg_tickets_per_client = if total_clients == 0 {
        0.0
    } else {
        ((total_tickets as f64 / total_clients as f64) * 100.0).round() / 100.0
    };

    Ok(ClientStats {
        total_clients,
        vip_clients,
        new_clients_month,
        avg_tickets_per_client,
    })
}

pub async fn users(db: &DatabaseConnection) -> Result<UserStats, DbErr> {
    let all = user::Entity::find().all(db).await?;

    let mut by_role: BTreeMap<String, u64> = Role::STAFF.iter().map(|r| (r.to_string(), 0)).collect();
    for u in &all {
        *by_role.entry(u.role.to_string()).or_default() += 1;
    }

    Ok(UserStats {
        total_users: all.len() as u64,
        active_users: all.iter().filter(|u| u.is_active).count() as u64,
        by_role,
        recent_users: all
            .iter()
            .filter(|u| u.logged_in_since(Duration::days(7)))
            .count() as u64,
    })
}
