use crate::blank_lines::DefaultBlankLinePolicy;

/// Options for one clean-up pass.
#[derive(Debug, Clone, Default)]
pub struct ReorganizeConfig {
    /// Break rank ties by declaration name instead of keeping source order.
    pub secondary_order_by_name: bool,
    /// Ask the declaration source to resolve its deferred per-item values.
    pub load_lazy_values: bool,
    /// Which declarations get blank lines around them.
    pub blank_lines: DefaultBlankLinePolicy,
}

impl ReorganizeConfig {
    pub fn with_secondary_order_by_name(mut self, enabled: bool) -> Self {
        self.secondary_order_by_name = enabled;
        self
    }

    pub fn with_lazy_values(mut self, enabled: bool) -> Self {
        self.load_lazy_values = enabled;
        self
    }

    pub fn with_blank_lines(mut self, policy: DefaultBlankLinePolicy) -> Self {
        self.blank_lines = policy;
        self
    }
}
