//! Application constants for the ANS processor
//!
//! Column heuristics, keyword filters, the canonical output header and the
//! defaults used by the crawler all live here.

// =============================================================================
// Output Table
// =============================================================================

/// Header of the consolidated output table, in column order
pub const OUTPUT_HEADER: [&str; 6] = [
    "trimestre",
    "ano",
    "data_contabil",
    "reg_ans",
    "descricao",
    "valor",
];

/// Default location of the consolidated output table
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/demonstracoes_consolidadas.csv";

/// Default raw store directory holding downloaded archives
pub const DEFAULT_RAW_DIR: &str = "data/raw";

// =============================================================================
// Row and Column Heuristics
// =============================================================================

/// Keywords selecting claims/events rows from the description column
pub const DEFAULT_KEYWORDS: &[&str] = &["EVENTO", "SINISTRO"];

/// Substring identifying the description column
pub const DESCRIPTION_PATTERN: &str = "DESCRICAO";

/// Substrings identifying the value column, checked per column in order
pub const VALUE_PATTERNS: &[&str] = &["VALOR", "VL_"];

/// Optional column carried through as the accounting date
pub const DATE_COLUMN: &str = "DATA";

/// Optional column carried through as the operator registry id
pub const REGISTRY_COLUMN: &str = "REG_ANS";

/// Extension of archives in the raw store
pub const ARCHIVE_EXTENSION: &str = "zip";

// =============================================================================
// Link Discovery
// =============================================================================

/// Index listing of the quarterly financial statements
pub const DEFAULT_ROOT_URL: &str =
    "https://dadosabertos.ans.gov.br/FTP/PDA/demonstracoes_contabeis/";

/// Registry of active health plan operators, downloaded next to the archives
pub const DEFAULT_OPERATORS_REGISTRY_URL: &str =
    "https://dadosabertos.ans.gov.br/FTP/PDA/operadoras_de_plano_de_saude_ativas/Relatorio_cadop.csv";

/// Directory levels fetched below each year directory
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Number of most recent year directories searched
pub const DEFAULT_YEARS: usize = 3;

/// Number of archives kept after ranking
pub const DEFAULT_MAX_SELECTED: usize = 3;

/// User agent presented to the listing server
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
