use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::Subscription;

/// Optional constraints narrowing a listing or a cost summary.
///
/// Every present filter narrows the candidate set and absent filters impose nothing, so
/// `SubscriptionFilters::default()` selects every subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilters {
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring of the service name.
    pub service_name: Option<String>,
    /// Lower edge of the query interval.
    pub start_date: Option<NaiveDate>,
    /// Upper edge of the query interval.
    pub end_date: Option<NaiveDate>,
}

/// A single named constraint of the predicate list built from [`SubscriptionFilters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    UserIs(Uuid),
    ServiceNameContains(String),
    /// `start_date <= date`
    StartsOnOrBefore(NaiveDate),
    /// `end_date IS NULL OR end_date >= date`
    RunsOnOrAfter(NaiveDate),
}

/// Window over a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SubscriptionFilters {
    pub fn new() -> SubscriptionFilters {
        SubscriptionFilters::default()
    }

    pub fn for_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Blank names are ignored.
    pub fn with_service_name(mut self, service_name: &str) -> Self {
        let service_name = service_name.trim();

        self.service_name = (!service_name.is_empty()).then(|| service_name.to_string());
        self
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn until_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Restricts the query to subscriptions active on `date`.
    pub fn active_on(self, date: NaiveDate) -> Self {
        self.from_date(date).until_date(date)
    }

    /// Turns the present filters into the ordered predicate list.
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::new();

        if let Some(user_id) = self.user_id {
            constraints.push(Constraint::UserIs(user_id));
        }
        if let Some(service_name) = &self.service_name {
            constraints.push(Constraint::ServiceNameContains(service_name.clone()));
        }
        if let Some(end_date) = self.end_date {
            constraints.push(Constraint::StartsOnOrBefore(end_date));
        }
        if let Some(start_date) = self.start_date {
            constraints.push(Constraint::RunsOnOrAfter(start_date));
        }

        constraints
    }

    /// Evaluates the same predicate list the store compiles into its `WHERE` clause.
    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.constraints()
            .iter()
            .all(|constraint| constraint.matches(subscription))
    }
}

impl Constraint {
    /// Mirrors the SQL emitted by `push_sql`.
    pub fn matches(&self, subscription: &Subscription) -> bool {
        match self {
            Constraint::UserIs(user_id) => subscription.user_id == *user_id,
            Constraint::ServiceNameContains(service_name) => subscription
                .service_name
                .to_lowercase()
                .contains(&service_name.to_lowercase()),
            Constraint::StartsOnOrBefore(date) => subscription.overlaps(None, Some(*date)),
            Constraint::RunsOnOrAfter(date) => subscription.overlaps(Some(*date), None),
        }
    }

    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Constraint::UserIs(user_id) => {
                builder.push("user_id = ").push_bind(*user_id);
            }
            Constraint::ServiceNameContains(service_name) => {
                builder
                    .push("service_name ILIKE ")
                    .push_bind(format!("%{}%", escape_like(service_name)));
            }
            Constraint::StartsOnOrBefore(date) => {
                builder.push("start_date <= ").push_bind(*date);
            }
            Constraint::RunsOnOrAfter(date) => {
                builder
                    .push("(end_date IS NULL OR end_date >= ")
                    .push_bind(*date)
                    .push(")");
            }
        }
    }
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Page, String> {
        if let Some(limit) = limit.filter(|limit| *limit <= 0) {
            return Err(format!("{} is not a valid limit, it must be positive", limit));
        }
        if let Some(offset) = offset.filter(|offset| *offset < 0) {
            return Err(format!("{} is not a valid offset, it cannot be negative", offset));
        }

        Ok(Page { limit, offset })
    }

    pub fn all() -> Page {
        Page::default()
    }

    pub(crate) fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = self.offset {
            builder.push(" OFFSET ").push_bind(offset);
        }
    }
}

/// Appends the `WHERE` clause for `constraints`, binding every value as a parameter.
pub(crate) fn push_where(builder: &mut QueryBuilder<'_, Postgres>, constraints: &[Constraint]) {
    for (index, constraint) in constraints.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        constraint.push_sql(builder);
    }
}

fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());

    for char in pattern.chars() {
        if matches!(char, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(char);
    }

    escaped
}
