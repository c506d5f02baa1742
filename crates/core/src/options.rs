//! Generation options: active policies and emission toggles.

use serde::Deserialize;

use crate::cherry::PolicySet;

/// How member names are turned into client field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseConvention {
    /// Keep the backend's spelling.
    Original,
    /// `givenName`
    #[default]
    Camel,
    /// `GivenName`
    Pascal,
}

/// Options for one generation run.
///
/// Every field has a default so a partial TOML file is enough.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct GenOptions {
    /// Active cherry-picking policies.
    pub policies: PolicySet,
    /// Case convention for generated field names.
    pub member_case: CaseConvention,
    /// Emit `| null` on optional fields and nullable required fields.
    pub strict_nulls: bool,
    /// Appended to every backend namespace to form the client namespace.
    pub namespace_suffix: String,
    /// Default `baseUri` of generated client classes.
    pub default_base_uri: String,
    /// Controllers (simple names) whose actions are not generated.
    pub exclude_controllers: Vec<String>,
    /// Treat every snapshot type passing the cherry policies as a root,
    /// not only the types actions reach.
    pub include_cherry_types: bool,
    /// Import the client runtime helpers from this module instead of
    /// inlining them into the output.
    pub runtime_module: Option<String>,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            policies: PolicySet::all_members(),
            member_case: CaseConvention::Camel,
            strict_nulls: false,
            namespace_suffix: "_Client".into(),
            default_base_uri: String::new(),
            exclude_controllers: Vec::new(),
            include_cherry_types: true,
            runtime_module: None,
        }
    }
}

impl GenOptions {
    /// Whether actions of the controller named `name` are skipped.
    pub fn is_excluded_controller(&self, name: &str) -> bool {
        self.exclude_controllers.iter().any(|c| c == name)
    }
}
