use serde::{Deserialize, Serialize};

/// Profile handed over by the LinkedIn sign-in flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinProfile {
    pub email: String,
    pub name: String,
    /// LinkedIn member id
    pub provider_id: String,
}
