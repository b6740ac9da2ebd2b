use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Inbound lead submission. `email` and `brief` are required by the route
/// layer before the gateway is ever called; everything else is optional
/// context forwarded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default, rename = "projectType")]
    pub project_type: Option<String>,

    #[serde(default)]
    pub budget: Option<String>,

    #[serde(default)]
    pub timeline: Option<String>,

    #[serde(default)]
    pub brief: String,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub metadata: Option<Json>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub success: bool,

    #[serde(default, rename = "leadId")]
    pub lead_id: Option<String>,
}
