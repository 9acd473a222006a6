//! MySqlRepository - generic sqlx adapter for every [`SqlEntity`].
//!
//! Queries are assembled at runtime with [`QueryBuilder`]: the filterable columns come from
//! `Entity::PROPERTIES`, so user input never reaches the SQL text, only the bindings.

use super::{Repository, RepositoryError};
use crate::entities::{Entity, Role, User, UserGroup};
use crate::rest::criteria::{Criteria, OrderBy, SearchTerms};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// Join table backing a collection association.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub name: &'static str,
    pub table: &'static str,
    pub owner_column: &'static str,
    pub related_column: &'static str,
}

/// Table mapping of an entity.
pub trait SqlEntity: Entity + for<'r> FromRow<'r, MySqlRow> + Unpin {
    const TABLE: &'static str;

    /// Stored columns, `id` first.
    const COLUMNS: &'static [&'static str];

    const COLLECTIONS: &'static [Collection] = &[];

    /// Values of `COLUMNS`, in the same order.
    fn column_values(&self) -> Vec<String>;

    fn set_association(&mut self, _name: &str, _ids: Vec<String>) {}
}

pub struct MySqlRepository<E: SqlEntity> {
    connection_pool: MySqlPool,
    entity: PhantomData<fn() -> E>,
}

impl<E: SqlEntity> MySqlRepository<E> {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self {
            connection_pool,
            entity: PhantomData,
        }
    }

    fn select(columns: &str) -> QueryBuilder<'static, MySql> {
        QueryBuilder::new(format!("SELECT {columns} FROM `{}` WHERE 1 = 1", E::TABLE))
    }

    fn column(property: &str) -> String {
        format!("`{}`.`{}`", E::TABLE, property)
    }

    fn push_filters(
        query: &mut QueryBuilder<'static, MySql>,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<(), RepositoryError> {
        for (path, value) in criteria {
            let property = path.strip_prefix("entity.").unwrap_or(path);

            if let Some(collection) = E::COLLECTIONS.iter().find(|c| c.name == property) {
                query.push(format!(
                    " AND {} IN (SELECT `{}` FROM `{}` WHERE `{}`",
                    Self::column("id"),
                    collection.owner_column,
                    collection.table,
                    collection.related_column
                ));
                push_values(query, value);
                query.push(")");
            } else if E::PROPERTIES.contains(&property) {
                query.push(format!(" AND {}", Self::column(property)));
                push_values(query, value);
            } else {
                return Err(RepositoryError::unknown_property(E::NAME, property));
            }
        }

        for term in &search.and {
            query.push(" AND (");
            Self::push_term(query, term);
            query.push(")");
        }

        if !search.or.is_empty() {
            query.push(" AND (");
            for (index, term) in search.or.iter().enumerate() {
                if index > 0 {
                    query.push(" OR ");
                }
                Self::push_term(query, term);
            }
            query.push(")");
        }

        Ok(())
    }

    fn push_term(query: &mut QueryBuilder<'static, MySql>, term: &str) {
        if E::SEARCH_COLUMNS.is_empty() {
            query.push("1 = 0");
            return;
        }

        for (index, column) in E::SEARCH_COLUMNS.iter().enumerate() {
            if index > 0 {
                query.push(" OR ");
            }
            query.push(format!("{} LIKE ", Self::column(column)));
            query.push_bind(like_pattern(term));
            query.push(" ESCAPE '!'");
        }
    }

    fn push_order_by(
        query: &mut QueryBuilder<'static, MySql>,
        order_by: &OrderBy,
    ) -> Result<(), RepositoryError> {
        for (index, (path, direction)) in order_by.iter().enumerate() {
            let property = path.strip_prefix("entity.").unwrap_or(path);

            if !E::PROPERTIES.contains(&property) {
                return Err(RepositoryError::unknown_property(E::NAME, property));
            }

            query.push(if index == 0 { " ORDER BY " } else { ", " });
            query.push(format!("{} {}", Self::column(property), direction.as_sql()));
        }

        Ok(())
    }

    /// Fills the collection associations of `entities` with one query per collection.
    async fn load_collections(&self, entities: &mut [E]) -> Result<(), RepositoryError> {
        if entities.is_empty() {
            return Ok(());
        }

        for collection in E::COLLECTIONS {
            let mut query = QueryBuilder::<MySql>::new(format!(
                "SELECT `{}`, `{}` FROM `{}` WHERE `{}` IN (",
                collection.owner_column,
                collection.related_column,
                collection.table,
                collection.owner_column
            ));
            {
                let mut ids = query.separated(", ");
                for entity in entities.iter() {
                    ids.push_bind(entity.id().to_string());
                }
            }
            query.push(")");

            let rows = query
                .build_query_as::<(String, String)>()
                .fetch_all(&self.connection_pool)
                .await?;

            let mut related: HashMap<String, Vec<String>> = HashMap::new();
            for (owner, id) in rows {
                related.entry(owner).or_default().push(id);
            }

            for entity in entities.iter_mut() {
                let ids = related.remove(entity.id()).unwrap_or_default();
                entity.set_association(collection.name, ids);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<E: SqlEntity> Repository<E> for MySqlRepository<E> {
    async fn find(&self, id: &str) -> Result<Option<E>, RepositoryError> {
        let mut criteria = Criteria::new();
        criteria.insert("id".to_string(), Value::from(id));

        self.find_one_by(&criteria, &OrderBy::new()).await
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn find_by_advanced(
        &self,
        criteria: &Criteria,
        order_by: &OrderBy,
        limit: Option<u64>,
        offset: Option<u64>,
        search: &SearchTerms,
    ) -> Result<Vec<E>, RepositoryError> {
        let columns = E::COLUMNS
            .iter()
            .map(|column| Self::column(column))
            .collect::<Vec<_>>()
            .join(", ");

        let mut query = Self::select(&columns);
        Self::push_filters(&mut query, criteria, search)?;
        Self::push_order_by(&mut query, order_by)?;

        match (limit, offset) {
            (Some(limit), _) => {
                query.push(" LIMIT ").push_bind(limit);
            }
            // MySQL has no OFFSET without LIMIT
            (None, Some(_)) => {
                query.push(" LIMIT ").push_bind(u64::MAX);
            }
            (None, None) => {}
        }

        if let Some(offset) = offset {
            query.push(" OFFSET ").push_bind(offset);
        }

        debug!("Executing query: {}", query.sql());

        let mut entities = query
            .build_query_as::<E>()
            .fetch_all(&self.connection_pool)
            .await?;

        self.load_collections(&mut entities).await?;

        Ok(entities)
    }

    async fn count_advanced(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<u64, RepositoryError> {
        let mut query = Self::select("COUNT(*)");
        Self::push_filters(&mut query, criteria, search)?;

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn find_ids(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<Vec<String>, RepositoryError> {
        let mut query = Self::select(&Self::column("id"));
        Self::push_filters(&mut query, criteria, search)?;

        let ids = query
            .build_query_scalar::<String>()
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(ids)
    }

    #[instrument(skip(self, entity), fields(table = E::TABLE, id = %entity.id()))]
    async fn save(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut tx = self.connection_pool.begin().await?;

        let mut query = QueryBuilder::<MySql>::new(format!("INSERT INTO `{}` (", E::TABLE));
        query.push(
            E::COLUMNS
                .iter()
                .map(|column| format!("`{column}`"))
                .collect::<Vec<_>>()
                .join(", "),
        );
        query.push(") VALUES (");
        {
            let mut values = query.separated(", ");
            for value in entity.column_values() {
                values.push_bind(value);
            }
        }
        query.push(") ON DUPLICATE KEY UPDATE ");
        query.push(
            E::COLUMNS
                .iter()
                .skip(1)
                .map(|column| format!("`{column}` = VALUES(`{column}`)"))
                .collect::<Vec<_>>()
                .join(", "),
        );

        query.build().execute(&mut *tx).await?;

        for collection in E::COLLECTIONS {
            let ids = entity.association(collection.name).unwrap_or_default();

            sqlx::query(&format!(
                "DELETE FROM `{}` WHERE `{}` = ?",
                collection.table, collection.owner_column
            ))
            .bind(entity.id())
            .execute(&mut *tx)
            .await?;

            if ids.is_empty() {
                continue;
            }

            let mut insert = QueryBuilder::<MySql>::new(format!(
                "INSERT INTO `{}` (`{}`, `{}`) ",
                collection.table, collection.owner_column, collection.related_column
            ));
            insert.push_values(ids, |mut row, id| {
                row.push_bind(entity.id().to_string()).push_bind(id);
            });
            insert.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn remove(&self, entity: &E) -> Result<(), RepositoryError> {
        // Join rows go away through ON DELETE CASCADE
        sqlx::query(&format!("DELETE FROM `{}` WHERE `id` = ?", E::TABLE))
            .bind(entity.id())
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}

fn push_values(query: &mut QueryBuilder<'static, MySql>, value: &Value) {
    match value {
        Value::Array(items) if items.is_empty() => {
            query.push(" IN (NULL) AND 1 = 0");
        }
        Value::Array(items) => {
            query.push(" IN (");
            let mut values = query.separated(", ");
            for item in items {
                values.push_bind(bind_text(item));
            }
            values.push_unseparated(")");
        }
        other => {
            query.push(" = ").push_bind(bind_text(other));
        }
    }
}

// MySQL compares numbers and numeric strings loosely, every scalar goes as text
fn bind_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

impl SqlEntity for Role {
    const TABLE: &'static str = "role";
    const COLUMNS: &'static [&'static str] = &["id", "description"];

    fn column_values(&self) -> Vec<String> {
        vec![self.id.clone(), self.description.clone()]
    }
}

impl SqlEntity for UserGroup {
    const TABLE: &'static str = "user_group";
    const COLUMNS: &'static [&'static str] = &["id", "name", "role"];

    fn column_values(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.role.clone()]
    }
}

impl SqlEntity for User {
    const TABLE: &'static str = "user";
    const COLUMNS: &'static [&'static str] =
        &["id", "username", "firstname", "surname", "email", "password"];
    const COLLECTIONS: &'static [Collection] = &[Collection {
        name: "userGroups",
        table: "user_has_user_group",
        owner_column: "user_id",
        related_column: "user_group_id",
    }];

    fn column_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.firstname.clone(),
            self.surname.clone(),
            self.email.clone(),
            self.password.clone(),
        ]
    }

    fn set_association(&mut self, name: &str, ids: Vec<String>) {
        if name == "userGroups" {
            self.user_groups = ids;
        }
    }
}

/// `%term%` with the LIKE wildcards of `term` matched literally (escape character `!`).
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for character in term.chars() {
        if matches!(character, '!' | '%' | '_') {
            pattern.push('!');
        }
        pattern.push(character);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::criteria::Direction;
    use serde_json::json;

    fn criteria(value: Value) -> Criteria {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_filters_become_bound_conditions() {
        let mut query = MySqlRepository::<User>::select("*");
        MySqlRepository::<User>::push_filters(
            &mut query,
            &criteria(json!({"entity.username": "john", "userGroups": ["a", "b"]})),
            &SearchTerms::default(),
        )
        .unwrap();

        assert_eq!(
            query.sql(),
            "SELECT * FROM `user` WHERE 1 = 1 AND `user`.`username` = ? AND `user`.`id` IN \
             (SELECT `user_id` FROM `user_has_user_group` WHERE `user_group_id` IN (?, ?))"
        );
    }

    #[test]
    fn test_search_and_order() {
        let mut query = MySqlRepository::<Role>::select("*");
        MySqlRepository::<Role>::push_filters(&mut query, &Criteria::new(), &SearchTerms::or(["a", "b"]))
            .unwrap();
        MySqlRepository::<Role>::push_order_by(&mut query, &OrderBy::new().with("id", Direction::Desc))
            .unwrap();

        assert_eq!(
            query.sql(),
            "SELECT * FROM `role` WHERE 1 = 1 AND (`role`.`id` LIKE ? ESCAPE '!' OR `role`.`description` LIKE ? ESCAPE '!' \
             OR `role`.`id` LIKE ? ESCAPE '!' OR `role`.`description` LIKE ? ESCAPE '!') ORDER BY `role`.`id` DESC"
        );
    }

    #[test]
    fn test_search_wildcards_match_literally() {
        assert_eq!(like_pattern("john"), "%john%");
        assert_eq!(like_pattern("_"), "%!_%");
        assert_eq!(like_pattern("50%!"), "%50!%!!%");
    }

    #[test]
    fn test_unknown_columns_are_rejected() {
        let mut query = MySqlRepository::<Role>::select("*");

        let error = MySqlRepository::<Role>::push_order_by(
            &mut query,
            &OrderBy::new().with("id; DROP TABLE role", Direction::Asc),
        )
        .unwrap_err();

        assert!(matches!(error, RepositoryError::UnknownProperty { .. }));
    }
}
