use serde::{Deserialize, Serialize};

/// A stored customer. `id` is assigned by the store at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// Unvalidated create request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

/// A validated customer that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

impl NewCustomer {
    pub fn with_id(self, id: i64) -> Customer {
        Customer {
            id,
            user_id: self.user_id,
            name: self.name,
            phone: self.phone,
            address: self.address,
            address2: self.address2,
            city: self.city,
            state: self.state,
            zipcode: self.zipcode,
        }
    }
}
