use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseExecutor, DatabaseTransaction, Order,
    QueryFilter, Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{address, prelude::Address};

#[derive(Clone)]
pub struct AddressDao<C = DatabaseConnection> {
    db: C,
}

impl AddressDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }
}

impl<'t> AddressDao<DatabaseExecutor<'t>> {
    pub fn in_transaction(txn: &'t DatabaseTransaction) -> Self {
        Self { db: txn.into() }
    }
}

impl<C: ConnectionTrait + Send + Sync> DaoBase for AddressDao<C> {
    type Entity = Address;
    type Conn = C;

    fn db(&self) -> &C {
        &self.db
    }
}

/// Cleaned address values, as produced by the inline form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl AddressFields {
    fn apply(self, active: &mut address::ActiveModel) {
        active.line1 = Set(self.line1);
        active.line2 = Set(self.line2);
        active.city = Set(self.city);
        active.region = Set(self.region);
        active.postal_code = Set(self.postal_code);
        active.country = Set(self.country);
    }
}

impl<C: ConnectionTrait + Send + Sync> AddressDao<C> {
    /// Oldest first, so inline forms keep a stable order.
    pub async fn list_for_user(&self, user_id: &Uuid) -> DaoResult<Vec<address::Model>> {
        let mut addresses = Vec::new();
        let mut page = 1;
        loop {
            let user_id = *user_id;
            let mut response = self
                .find(
                    page,
                    Self::MAX_PAGE_SIZE,
                    Some((address::Column::CreatedAt, Order::Asc)),
                    move |query| query.filter(address::Column::UserId.eq(user_id)),
                )
                .await?;
            addresses.append(&mut response.data);
            if !response.has_next {
                return Ok(addresses);
            }
            page += 1;
        }
    }

    pub async fn create_for_user(
        &self,
        user_id: &Uuid,
        fields: AddressFields,
    ) -> DaoResult<address::Model> {
        let mut model = address::ActiveModel {
            user_id: Set(*user_id),
            ..Default::default()
        };
        fields.apply(&mut model);
        self.create(model).await
    }

    pub async fn update_fields(
        &self,
        id: &Uuid,
        fields: AddressFields,
    ) -> DaoResult<address::Model> {
        self.update(*id, move |active| fields.apply(active)).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::address;

    use super::{AddressDao, AddressFields};
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn address_model(user_id: Uuid, city: &str) -> address::Model {
        let now = ts();
        address::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            user_id,
            line1: "1 Main St".to_string(),
            line2: None,
            city: city.to_string(),
            region: None,
            postal_code: "12345".to_string(),
            country: "NL".to_string(),
        }
    }

    #[tokio::test]
    async fn list_for_user_returns_all_rows_of_a_single_page() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                address_model(user_id, "Utrecht"),
                address_model(user_id, "Delft"),
            ]])
            .into_connection();
        let dao = AddressDao::new(&db);

        let addresses = dao
            .list_for_user(&user_id)
            .await
            .expect("query should succeed");
        let cities: Vec<_> = addresses.iter().map(|a| a.city.as_str()).collect();
        assert_eq!(cities, ["Utrecht", "Delft"]);
    }

    #[tokio::test]
    async fn create_for_user_sets_owner() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[address_model(user_id, "Leiden")]])
            .into_connection();
        let dao = AddressDao::new(&db);

        let created = dao
            .create_for_user(
                &user_id,
                AddressFields {
                    line1: "1 Main St".to_string(),
                    line2: None,
                    city: "Leiden".to_string(),
                    region: None,
                    postal_code: "12345".to_string(),
                    country: "NL".to_string(),
                },
            )
            .await
            .expect("insert should succeed");
        assert_eq!(created.user_id, user_id);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = AddressDao::new(&db);

        let err = dao.delete(id).await.expect_err("delete should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: missing, .. } if missing == id));
    }
}
