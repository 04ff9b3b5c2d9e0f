use std::fmt;

/// The operations a manager performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    List,
    Fetch,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::List,
        OperationKind::Fetch,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::List => "list",
            OperationKind::Fetch => "fetch",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }

    /// Notification sent when the operation starts.
    pub fn progress_message(&self) -> &'static str {
        match self {
            OperationKind::List => "Loading objects...",
            OperationKind::Fetch => "Fetching object...",
            OperationKind::Create => "Creating object...",
            OperationKind::Update => "Updating object...",
            OperationKind::Delete => "Deleting object...",
        }
    }

    /// Prefix of the notification sent when the operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            OperationKind::List => "Failed to load objects",
            OperationKind::Fetch => "Failed to fetch object",
            OperationKind::Create => "Failed to create object",
            OperationKind::Update => "Failed to update object",
            OperationKind::Delete => "Failed to delete object",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the most recent operation of a kind stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    /// Never started
    #[default]
    Idle,
    /// Request sent, waiting for the response
    Requesting,
    /// Response applied
    Applied,
    /// Ended with an error
    Failed,
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationState::Idle => "idle",
            OperationState::Requesting => "requesting",
            OperationState::Applied => "applied",
            OperationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Status of the most recent operation of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    pub kind: OperationKind,

    pub state: OperationState,

    /// Error message if state is Failed
    pub error: Option<String>,
}

impl OperationStatus {
    pub fn idle(kind: OperationKind) -> Self {
        Self {
            kind,
            state: OperationState::Idle,
            error: None,
        }
    }

    pub fn requesting(kind: OperationKind) -> Self {
        Self {
            kind,
            state: OperationState::Requesting,
            error: None,
        }
    }

    pub fn applied(kind: OperationKind) -> Self {
        Self {
            kind,
            state: OperationState::Applied,
            error: None,
        }
    }

    pub fn failed(kind: OperationKind, error: String) -> Self {
        Self {
            kind,
            state: OperationState::Failed,
            error: Some(error),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == OperationState::Idle
    }

    pub fn is_requesting(&self) -> bool {
        self.state == OperationState::Requesting
    }

    pub fn is_applied(&self) -> bool {
        self.state == OperationState::Applied
    }

    pub fn is_failed(&self) -> bool {
        self.state == OperationState::Failed
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "{}: {} ({})", self.kind, self.state, error),
            None => write!(f, "{}: {}", self.kind, self.state),
        }
    }
}
