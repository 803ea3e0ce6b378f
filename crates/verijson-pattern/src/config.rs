/// How object patterns treat keys the pattern does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectPolicy {
    /// Undeclared keys are ignored.
    #[default]
    Open,
    /// The first undeclared key is reported as a mismatch.
    Strict,
}

/// Controls matcher behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchConfig {
    /// Policy for keys present in a value but absent from its object pattern.
    pub object_policy: ObjectPolicy,
}

impl MatchConfig {
    /// Config with [`ObjectPolicy::Strict`].
    pub fn strict() -> Self {
        Self {
            object_policy: ObjectPolicy::Strict,
        }
    }
}
