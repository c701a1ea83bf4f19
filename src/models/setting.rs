use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::settings;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Setting {
    pub setting_key: String,
    pub setting_value: String,
}
