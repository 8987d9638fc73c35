//! Compact custom-ID encoding used to route component interactions back to
//! their in-memory session.
//!
//! Wire format: `<prefix>:<session_id>:<action>`, exactly three segments.

use std::fmt;

const SEPARATOR: char = ':';

/// Known custom-ID owners, resolved by exact first-segment match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Subsystem {
    Paginator,
    Confirmation,
}

impl Subsystem {
    /// Prefix written as the first custom-ID segment.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Paginator => "pg",
            Self::Confirmation => "confirm",
        }
    }

    fn from_prefix(raw: &str) -> Option<Self> {
        match raw {
            "pg" => Some(Self::Paginator),
            "confirm" => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// Resolve which subsystem a raw custom ID is addressed to.
    ///
    /// Only the first segment is inspected; use [`CustomId::decode`] for full
    /// validation.
    pub fn resolve(custom_id: &str) -> Option<Self> {
        custom_id
            .split(SEPARATOR)
            .next()
            .and_then(Self::from_prefix)
    }
}

/// Paginator component actions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PageAction {
    /// Previous-page button.
    Prev,
    /// Next-page button.
    Next,
    /// Page label button; opens the jump modal.
    Page,
    /// Jump modal submission.
    Jump,
}

/// Confirmation component actions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
}

/// Action segment of a custom ID, scoped to its subsystem.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    Page(PageAction),
    Confirm(ConfirmAction),
}

impl Action {
    /// Subsystem that owns this action.
    pub const fn subsystem(self) -> Subsystem {
        match self {
            Self::Page(_) => Subsystem::Paginator,
            Self::Confirm(_) => Subsystem::Confirmation,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Page(PageAction::Prev) => "prev",
            Self::Page(PageAction::Next) => "next",
            Self::Page(PageAction::Page) => "page",
            Self::Page(PageAction::Jump) => "jump",
            Self::Confirm(ConfirmAction::Confirm) => "confirm",
            Self::Confirm(ConfirmAction::Cancel) => "cancel",
        }
    }

    fn parse(subsystem: Subsystem, raw: &str) -> Option<Self> {
        let action = match (subsystem, raw) {
            (Subsystem::Paginator, "prev") => Self::Page(PageAction::Prev),
            (Subsystem::Paginator, "next") => Self::Page(PageAction::Next),
            (Subsystem::Paginator, "page") => Self::Page(PageAction::Page),
            (Subsystem::Paginator, "jump") => Self::Page(PageAction::Jump),
            (Subsystem::Confirmation, "confirm") => Self::Confirm(ConfirmAction::Confirm),
            (Subsystem::Confirmation, "cancel") => Self::Confirm(ConfirmAction::Cancel),
            _ => return None,
        };

        Some(action)
    }
}

/// Structured form of a routed custom ID.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CustomId {
    pub session_id: String,
    pub action: Action,
}

impl CustomId {
    /// Build a paginator custom ID.
    pub fn page(session_id: impl Into<String>, action: PageAction) -> Self {
        Self {
            session_id: session_id.into(),
            action: Action::Page(action),
        }
    }

    /// Build a confirmation custom ID.
    pub fn confirm(session_id: impl Into<String>, action: ConfirmAction) -> Self {
        Self {
            session_id: session_id.into(),
            action: Action::Confirm(action),
        }
    }

    /// Subsystem encoded in the prefix segment.
    pub const fn subsystem(&self) -> Subsystem {
        self.action.subsystem()
    }

    /// Encode into the wire string.
    pub fn encode(&self) -> String {
        encode(self.subsystem(), &self.session_id, self.action)
    }

    /// Decode a wire string.
    ///
    /// Returns `None` for anything that is not exactly
    /// `<known prefix>:<non-empty id>:<action known to that prefix>`; most
    /// component interactions in the application belong to other handlers.
    pub fn decode(raw: &str) -> Option<Self> {
        let mut parts = raw.split(SEPARATOR);

        let subsystem = Subsystem::from_prefix(parts.next()?)?;
        let session_id = parts.next().filter(|id| !id.is_empty())?;
        let action = Action::parse(subsystem, parts.next()?)?;

        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            session_id: session_id.to_owned(),
            action,
        })
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Encode `prefix:session_id:action`.
///
/// `session_id` must not contain `:`; generated session ids never do.
pub fn encode(subsystem: Subsystem, session_id: &str, action: Action) -> String {
    debug_assert_eq!(subsystem, action.subsystem());
    debug_assert!(!session_id.contains(SEPARATOR));

    format!(
        "{}{SEPARATOR}{session_id}{SEPARATOR}{}",
        subsystem.prefix(),
        action.as_str()
    )
}
