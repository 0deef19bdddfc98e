/// A data loss prevention policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DlpPolicy {
    pub id: String,
    pub name: String,
}
