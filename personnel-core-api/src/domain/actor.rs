use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// The acting principal for a mutation or read, supplied by the identity
/// provider at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// User id of the caller. Becomes `actor_id` on audit entries.
    pub actor_id: Uuid,
    pub role: Role,
    /// Source address of the request, if the transport layer knows it.
    pub ip_address: Option<String>,
}

impl ActorContext {
    pub fn new(actor_id: Uuid, role: Role) -> Self {
        Self {
            actor_id,
            role,
            ip_address: None,
        }
    }

    pub fn with_ip(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}
