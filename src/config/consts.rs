/// Package searched for the boot workflow when settings do not name one
pub const DEFAULT_BOOT_PACKAGE: &str = "bootstrap";
/// Boot workflow file inside `packages/<package>/workflows/`
pub const DEFAULT_BOOT_TEMPLATE: &str = "boot.json";
/// Context key the boot pipeline seeds with the input configuration path
pub const DEFAULT_CONFIG_PATH_KEY: &str = "config.path";
/// Context key the boot workflow must fill with the loaded configuration document
pub const DEFAULT_CONFIG_DOCUMENT_KEY: &str = "config.document";
/// Default `tracing-subscriber` filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Directory under a search root holding workflow packages
pub const PACKAGES_DIR: &str = "packages";
/// Directory inside a package holding its workflow templates
pub const WORKFLOWS_DIR: &str = "workflows";
/// Number of executable-directory ancestors searched for packages
pub const MAX_ANCESTOR_SEARCH_DEPTH: usize = 4;

/// Horizontal distance between nodes synthesized from flat steps during migration
pub const NODE_POSITION_SPACING: i64 = 130;
/// Recognized schema generation that can no longer be loaded or migrated
pub const RETIRED_SCHEMA_VERSION: &str = "1.0.0";
/// Maximum nesting of `workflow.execute` steps
pub const MAX_WORKFLOW_NESTING: usize = 16;
