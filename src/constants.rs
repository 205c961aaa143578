/// Default tone for marketing posts
pub const DEFAULT_TONE: &str = "professional";

/// Default target audience for marketing posts
pub const DEFAULT_AUDIENCE: &str = "general";

/// Default style for generated documents
pub const DEFAULT_DOCUMENT_STYLE: &str = "formal";

/// Document type used when summarizing a meeting
pub const MEETING_DOC_TYPE: &str = "meeting summary";

/// Document style used when summarizing a meeting
pub const MEETING_STYLE: &str = "structured";

/// Contract text is cut to this many characters before it is embedded in a prompt
pub const CONTRACT_TEXT_LIMIT: usize = 3000;

/// Number of post variants kept in the history response text
pub const HISTORY_SUMMARY_VARIANTS: usize = 3;

/// History records per page when browsing
pub const HISTORY_PAGE_SIZE: i64 = 5;

/// Request preview length in history listings
pub const REQUEST_PREVIEW_CHARS: usize = 100;

/// Response preview length in history listings
pub const RESPONSE_PREVIEW_CHARS: usize = 150;

/// Longest stored response shown in full
pub const FULL_RESPONSE_CHARS: usize = 4000;

/// System prompt for marketing posts
pub const MARKETING_SYSTEM_PROMPT: &str =
    "You are a marketing and content strategy expert. Reply only in JSON format.";

/// System prompt for document drafting
pub const DOCUMENT_SYSTEM_PROMPT: &str =
    "You are a professional lawyer and copywriter. Reply only in JSON format.";

/// System prompt for contract analysis
pub const LEGAL_SYSTEM_PROMPT: &str =
    "You are an experienced lawyer with expertise in contract analysis. Reply only in JSON format.";

/// System prompt for financial analysis
pub const FINANCE_SYSTEM_PROMPT: &str =
    "You are a financial analyst with a background in business analytics. Reply only in JSON format.";

/// Shown to the user whenever a task invocation fails upstream
pub const GENERIC_FAILURE_MESSAGE: &str =
    "❌ Something went wrong while talking to the AI service. Please try again.";
