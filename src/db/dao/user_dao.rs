use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseExecutor,
    DatabaseTransaction, Order, QueryFilter, Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao<C = DatabaseConnection> {
    db: C,
}

impl UserDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }
}

impl<'t> UserDao<DatabaseExecutor<'t>> {
    pub fn in_transaction(txn: &'t DatabaseTransaction) -> Self {
        Self { db: txn.into() }
    }
}

impl<C: ConnectionTrait + Send + Sync> DaoBase for UserDao<C> {
    type Entity = User;
    type Conn = C;

    fn db(&self) -> &C {
        &self.db
    }
}

/// Changelist filter: every search term must hit at least one search
/// column; the exact-match filters are ANDed on top.
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub search_terms: Vec<String>,
    pub search_columns: Vec<user::Column>,
    pub is_superuser: Option<bool>,
    pub is_staff: Option<bool>,
    pub user_type: Option<String>,
    pub order: (user::Column, Order),
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            search_terms: Vec::new(),
            search_columns: Vec::new(),
            is_superuser: None,
            is_staff: None,
            user_type: None,
            order: (user::Column::Email, Order::Asc),
        }
    }
}

impl UserListQuery {
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if !self.search_columns.is_empty() {
            for term in &self.search_terms {
                let any = self
                    .search_columns
                    .iter()
                    .fold(Condition::any(), |any, column| {
                        any.add(icontains(*column, term))
                    });
                condition = condition.add(any);
            }
        }

        if let Some(is_superuser) = self.is_superuser {
            condition = condition.add(user::Column::IsSuperuser.eq(is_superuser));
        }
        if let Some(is_staff) = self.is_staff {
            condition = condition.add(user::Column::IsStaff.eq(is_staff));
        }
        if let Some(user_type) = self.user_type.as_ref() {
            condition = condition.add(user::Column::UserType.eq(user_type.clone()));
        }

        condition
    }
}

fn icontains(column: user::Column, term: &str) -> Expr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '%' => escaped.push_str("\\%"),
            '_' => escaped.push_str("\\_"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl<C: ConnectionTrait + Send + Sync> UserDao<C> {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// True when another account already uses `email`. `exclude` skips the
    /// account being edited.
    pub async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> DaoResult<bool> {
        Ok(self
            .find_by_email(email)
            .await?
            .is_some_and(|existing| Some(existing.id) != exclude))
    }

    pub async fn list(
        &self,
        query: &UserListQuery,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<user::Model>> {
        let condition = query.condition();
        self.find(page, page_size, Some(query.order.clone()), move |select| {
            select.filter(condition)
        })
        .await
    }

    pub async fn count_matching(&self, query: &UserListQuery) -> DaoResult<u64> {
        let condition = query.condition();
        self.count(move |select| select.filter(condition)).await
    }

    /// The only write path for a stored hash after creation.
    pub async fn set_password_hash(
        &self,
        id: &Uuid,
        password_hash: String,
    ) -> DaoResult<user::Model> {
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, Order, QueryFilter, QueryTrait};
    use uuid::Uuid;

    use crate::db::entities::{prelude::User, user};

    use super::{UserDao, UserListQuery, escape_like};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str) -> user::Model {
        let now = ts();
        user::Model {
            id,
            date_joined: now,
            updated_at: now,
            email: email.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            phone_number: None,
            profile_picture: None,
            user_type: "customer".to_string(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            password_hash: "hash".to_string(),
            last_login: None,
        }
    }

    fn sql_for(query: &UserListQuery) -> String {
        User::find()
            .filter(query.condition())
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[tokio::test]
    async fn find_by_email_returns_first_match() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "alice@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("alice@example.com")
            .await
            .expect("query should succeed");
        assert_eq!(result.map(|u| u.id), Some(id));
    }

    #[tokio::test]
    async fn email_taken_ignores_the_account_being_edited() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [user_model(id, "alice@example.com")],
                [user_model(id, "alice@example.com")],
            ])
            .into_connection();
        let dao = UserDao::new(&db);

        assert!(
            !dao.email_taken("alice@example.com", Some(id))
                .await
                .expect("query should succeed")
        );
        assert!(
            dao.email_taken("alice@example.com", None)
                .await
                .expect("query should succeed")
        );
    }

    #[test]
    fn search_terms_are_anded_and_columns_ored() {
        let query = UserListQuery {
            search_terms: vec!["Ann".to_string(), "smith".to_string()],
            search_columns: vec![user::Column::Email, user::Column::LastName],
            ..UserListQuery::default()
        };
        let sql = sql_for(&query);

        assert!(sql.contains("LOWER("), "{sql}");
        assert!(sql.contains("LIKE '%ann%'"), "{sql}");
        assert!(sql.contains("LIKE '%smith%'"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn exact_filters_are_added_to_the_condition() {
        let query = UserListQuery {
            is_staff: Some(true),
            user_type: Some("vendor".to_string()),
            order: (user::Column::LastName, Order::Desc),
            ..UserListQuery::default()
        };
        let sql = sql_for(&query);

        assert!(sql.contains("\"is_staff\" = TRUE"), "{sql}");
        assert!(sql.contains("\"user_type\" = 'vendor'"), "{sql}");
        assert!(!sql.contains("\"is_superuser\" ="), "{sql}");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
