/// A security policy applied to resources and groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityPolicy {
    pub id: String,
    pub name: String,
    pub policy_type: String,
}
