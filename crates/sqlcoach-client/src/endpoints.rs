//! Backend route table
//!
//! Every REST route the client talks to is one [`Endpoint`] variant. Path
//! parameters are carried as raw values and encoded when the URL is built.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use sqlcoach_core::prelude::*;
use sqlcoach_core::Difficulty;
use url::Url;

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One backend route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    CheatSheet,
    CheatSheetByCategory(String),
    SearchCheatSheet(String),
    DynamicExample,
    Modules,
    Module(i64),
    BusinessQuestion {
        module_id: i64,
        difficulty: Difficulty,
    },
    EvaluateAnswer,
    Progress(String),
    Analytics(String),
    DetailedAnalytics(String),
    LearningPath(String),
    ChatMessage,
    ChatClear,
    Health,
    ChatHealth,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::DynamicExample
            | Endpoint::EvaluateAnswer
            | Endpoint::ChatMessage
            | Endpoint::ChatClear => Method::Post,
            _ => Method::Get,
        }
    }

    /// Stable operation name, used in logs and by the test fake
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::CheatSheet => "cheat_sheet",
            Endpoint::CheatSheetByCategory(_) => "cheat_sheet_by_category",
            Endpoint::SearchCheatSheet(_) => "search_cheat_sheet",
            Endpoint::DynamicExample => "dynamic_example",
            Endpoint::Modules => "modules",
            Endpoint::Module(_) => "module",
            Endpoint::BusinessQuestion { .. } => "business_question",
            Endpoint::EvaluateAnswer => "evaluate_answer",
            Endpoint::Progress(_) => "progress",
            Endpoint::Analytics(_) => "analytics",
            Endpoint::DetailedAnalytics(_) => "detailed_analytics",
            Endpoint::LearningPath(_) => "learning_path",
            Endpoint::ChatMessage => "send_chat",
            Endpoint::ChatClear => "clear_chat",
            Endpoint::Health => "health",
            Endpoint::ChatHealth => "chatbot_health",
        }
    }

    /// Unencoded path segments below the API base
    pub fn segments(&self) -> Vec<String> {
        let fixed = |parts: &[&str]| parts.iter().map(|p| p.to_string()).collect::<Vec<_>>();

        match self {
            Endpoint::CheatSheet => fixed(&["cheatsheet"]),
            Endpoint::CheatSheetByCategory(category) => {
                vec!["cheatsheet".into(), "category".into(), category.clone()]
            }
            Endpoint::SearchCheatSheet(term) => {
                vec!["cheatsheet".into(), "search".into(), term.clone()]
            }
            Endpoint::DynamicExample => fixed(&["cheat-sheet", "example"]),
            Endpoint::Modules => fixed(&["modules"]),
            Endpoint::Module(id) => vec!["modules".into(), id.to_string()],
            Endpoint::BusinessQuestion { module_id, .. } => vec![
                "modules".into(),
                module_id.to_string(),
                "business-question".into(),
            ],
            Endpoint::EvaluateAnswer => fixed(&["practice", "evaluate-business-answer"]),
            Endpoint::Progress(user) => vec!["practice".into(), "progress".into(), user.clone()],
            Endpoint::Analytics(user) => vec!["analysis".into(), user.clone()],
            Endpoint::DetailedAnalytics(user) => {
                vec!["analysis".into(), user.clone(), "detailed".into()]
            }
            Endpoint::LearningPath(user) => {
                vec!["analysis".into(), user.clone(), "learning-path".into()]
            }
            Endpoint::ChatMessage => fixed(&["chatbot", "message"]),
            Endpoint::ChatClear => fixed(&["chatbot", "clear"]),
            Endpoint::Health => fixed(&["health"]),
            Endpoint::ChatHealth => fixed(&["chatbot", "health"]),
        }
    }

    /// Query parameters
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::BusinessQuestion { difficulty, .. } => {
                vec![("difficulty", difficulty.as_str().to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// Encoded path relative to the API base, e.g. `/cheatsheet/search/left%20join`
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in self.segments() {
            path.push('/');
            path.extend(utf8_percent_encode(&segment, PATH_SEGMENT));
        }
        path
    }

    /// Absolute URL below `base`
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::config(format!("API base URL cannot be a base: {base}")))?;
            segments.pop_if_empty();
            for segment in self.segments() {
                segments.push(&segment);
            }
        }

        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }
}

/// Parse the configured API base URL
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::config(format!("invalid API base URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::config(format!(
            "unsupported API URL scheme '{other}' (expected http or https)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        parse_base_url("http://localhost:8000/api").unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let url = Endpoint::Modules.url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/modules");
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let base = parse_base_url("http://localhost:8000/api/").unwrap();
        let url = Endpoint::ChatClear.url(&base).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/chatbot/clear");
    }

    #[test]
    fn test_business_question_has_difficulty_query() {
        let url = Endpoint::BusinessQuestion {
            module_id: 4,
            difficulty: Difficulty::Medium,
        }
        .url(&base())
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/modules/4/business-question?difficulty=medium"
        );
    }

    #[test]
    fn test_path_parameters_are_encoded() {
        let endpoint = Endpoint::SearchCheatSheet("left join/union".into());
        assert_eq!(endpoint.path(), "/cheatsheet/search/left%20join%2Funion");

        let url = endpoint.url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/cheatsheet/search/left%20join%2Funion"
        );
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::EvaluateAnswer.method(), Method::Post);
        assert_eq!(Endpoint::DynamicExample.method(), Method::Post);
        assert_eq!(Endpoint::Analytics("u".into()).method(), Method::Get);
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
