use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity token for a peripheral. Identity comparison always goes
/// through this key, never through reference equality of handle instances.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeripheralId(Uuid);

impl PeripheralId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for PeripheralId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PeripheralId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<PeripheralId> for Uuid {
    fn from(value: PeripheralId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_random_ids() {
        assert_ne!(PeripheralId::random(), PeripheralId::random());
    }

    #[test]
    fn uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = PeripheralId::from(uuid);
        assert_eq!(Uuid::from(id), uuid);
    }
}
