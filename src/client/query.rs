use std::fmt::Display;
use std::marker::PhantomData;

use reqwest::Method;

use super::{DatabaseError, SupabaseClient};
use crate::models::Table;

const PREFER_REPRESENTATION: &str = "return=representation";

/// PostgREST request against one table. Built with [`SupabaseClient::from`].
pub struct TableQuery<'c, T: Table> {
    client: &'c SupabaseClient,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
    _table: PhantomData<T>,
}

impl<'c, T: Table> TableQuery<'c, T> {
    pub(crate) fn new(client: &'c SupabaseClient) -> Self {
        Self {
            client,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            _table: PhantomData,
        }
    }

    /// Whitespace outside double-quoted identifiers is dropped, as the hosted
    /// SDK does before building the `select` parameter.
    pub fn select(mut self, columns: &str) -> Self {
        let mut quoted = false;
        let cleaned: String = columns
            .chars()
            .filter(|c| {
                if c.is_whitespace() && !quoted {
                    return false;
                }
                if *c == '"' {
                    quoted = !quoted;
                }
                true
            })
            .collect();
        self.columns = if cleaned.is_empty() {
            "*".to_string()
        } else {
            cleaned
        };
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        self.client
            .rest_request(method, T::NAME)
            .query(&self.query_pairs())
    }

    pub async fn fetch(self) -> Result<Vec<T::Row>, DatabaseError> {
        self.client.send(self.request(Method::GET)).await
    }

    pub async fn fetch_optional(self) -> Result<Option<T::Row>, DatabaseError> {
        let rows = self.limit(1).fetch().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert(self, values: &T::Insert) -> Result<T::Row, DatabaseError> {
        let request = self
            .request(Method::POST)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(values);
        let rows: Vec<T::Row> = self.client.send(request).await?;
        rows.into_iter().next().ok_or_else(|| {
            DatabaseError::InvalidResponse(format!("insert into {} returned no rows", T::NAME))
        })
    }

    /// Patches every row matching the filters. Refuses to run unfiltered.
    pub async fn update(self, changes: &T::Update) -> Result<Vec<T::Row>, DatabaseError> {
        if self.filters.is_empty() {
            return Err(DatabaseError::MissingFilter("update"));
        }
        let request = self
            .request(Method::PATCH)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(changes);
        self.client.send(request).await
    }

    pub async fn delete(self) -> Result<Vec<T::Row>, DatabaseError> {
        if self.filters.is_empty() {
            return Err(DatabaseError::MissingFilter("delete"));
        }
        let request = self
            .request(Method::DELETE)
            .header("Prefer", PREFER_REPRESENTATION);
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{WorkflowRuns, WorkflowStatus};

    #[test]
    fn query_pairs_follow_postgrest_syntax() {
        let client = SupabaseClient::browser(&Config {
            supabase_url: "https://abcd.supabase.co".into(),
            supabase_anon_key: "anon".into(),
        });

        let query = client
            .from::<WorkflowRuns>()
            .select("id, status")
            .eq("status", WorkflowStatus::Failed)
            .order("created_at", false)
            .limit(10);

        assert_eq!(
            query.query_pairs(),
            vec![
                ("select".to_string(), "id,status".to_string()),
                ("status".to_string(), "eq.failed".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn blank_select_falls_back_to_all_columns() {
        let client = SupabaseClient::browser(&Config {
            supabase_url: "https://abcd.supabase.co".into(),
            supabase_anon_key: "anon".into(),
        });

        let query = client.from::<WorkflowRuns>().select("  ");
        assert_eq!(query.query_pairs()[0].1, "*");
    }

    #[test]
    fn select_keeps_whitespace_inside_quoted_columns() {
        let client = SupabaseClient::browser(&Config {
            supabase_url: "https://abcd.supabase.co".into(),
            supabase_anon_key: "anon".into(),
        });

        let query = client
            .from::<WorkflowRuns>()
            .select(" id ,\n \"input data\" , output_data ");
        assert_eq!(query.query_pairs()[0].1, "id,\"input data\",output_data");
    }
}
