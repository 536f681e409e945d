use super::schema::entries;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, PartialEq, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = entries)]
pub struct Entry {
  pub key: String,
  pub value: serde_json::Value,
}

#[derive(Insertable)]
#[diesel(table_name = entries)]
pub struct NewEntry<'a> {
  pub key: &'a str,
  pub value: &'a serde_json::Value,
}
