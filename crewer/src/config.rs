//! Configuration for the legacy show migration.

/// How normalized titles are compared when grouping shows into productions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitleMatching {
    /// Normalized titles must be byte-for-byte identical.
    #[default]
    Exact,

    /// Normalized titles are compared after lowercasing. The production is
    /// named after the first show of the group.
    IgnoreCase,
}

#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Grouping of normalized titles
    pub title_matching: TitleMatching,

    /// Create a template for a production made of a single recurring show.
    ///
    /// Off by default: a lone recurring show becomes a plain event.
    pub single_show_templates: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            title_matching: TitleMatching::default(),
            single_show_templates: SINGLE_SHOW_TEMPLATES,
        }
    }
}

pub const SINGLE_SHOW_TEMPLATES: bool = false;

#[derive(Debug)]
pub struct ConfigBuilder {
    config: MigrationConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: MigrationConfig::default(),
        }
    }

    pub fn title_matching(mut self, matching: TitleMatching) -> Self {
        self.config.title_matching = matching;
        self
    }

    pub fn single_show_templates(mut self, enabled: bool) -> Self {
        self.config.single_show_templates = enabled;
        self
    }

    pub fn build(self) -> MigrationConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
