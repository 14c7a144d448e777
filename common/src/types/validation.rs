//! Categorized validation issues surfaced to makers and takers

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// How serious an issue is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Informational, no action needed
    Info,
    /// Non-fatal, surfaced for an informed decision
    Warning,
    /// Fatal, blocks the next step
    Error,
}

/// Which part of the system an issue concerns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// The order's own fields
    Order,
    /// Token balances
    Balance,
    /// Gas usage
    Gas,
    /// Chain or signer connectivity
    Network,
    /// Commitments, salts, proofs and predicates
    Zk,
}

/// A single categorized issue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The severity of the issue
    pub severity: IssueSeverity,
    /// The category of the issue
    pub category: IssueCategory,
    /// A human readable description
    pub message: String,
}

impl Issue {
    /// Create an error issue
    #[allow(clippy::needless_pass_by_value)]
    pub fn error<T: ToString>(category: IssueCategory, message: T) -> Self {
        Self { severity: IssueSeverity::Error, category, message: message.to_string() }
    }

    /// Create a warning issue
    #[allow(clippy::needless_pass_by_value)]
    pub fn warning<T: ToString>(category: IssueCategory, message: T) -> Self {
        Self { severity: IssueSeverity::Warning, category, message: message.to_string() }
    }

    /// Create an informational issue
    #[allow(clippy::needless_pass_by_value)]
    pub fn info<T: ToString>(category: IssueCategory, message: T) -> Self {
        Self { severity: IssueSeverity::Info, category, message: message.to_string() }
    }

    /// Whether the issue is fatal
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{:?}/{:?}] {}", self.severity, self.category, self.message)
    }
}

/// The accumulated result of a validation pass
///
/// A result is valid iff it holds no error issues
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The issues found, in discovery order
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    /// An empty, valid result
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the result holds no errors
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(Issue::is_error)
    }

    /// Record an issue
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Record an error
    #[allow(clippy::needless_pass_by_value)]
    pub fn error<T: ToString>(&mut self, category: IssueCategory, message: T) {
        self.push(Issue::error(category, message));
    }

    /// Record a warning
    #[allow(clippy::needless_pass_by_value)]
    pub fn warning<T: ToString>(&mut self, category: IssueCategory, message: T) {
        self.push(Issue::warning(category, message));
    }

    /// Record an informational issue
    #[allow(clippy::needless_pass_by_value)]
    pub fn info<T: ToString>(&mut self, category: IssueCategory, message: T) {
        self.push(Issue::info(category, message));
    }

    /// Append all issues from another result
    pub fn merge(&mut self, other: ValidationResult) {
        self.issues.extend(other.issues);
    }

    /// The error issues
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    /// The warning issues
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Warning)
    }

    /// Whether any issue of the given category and severity was recorded
    pub fn has(&self, severity: IssueSeverity, category: IssueCategory) -> bool {
        self.issues.iter().any(|i| i.severity == severity && i.category == category)
    }
}
