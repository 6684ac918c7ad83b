use serde::Serialize;
use shared::domain::{AttemptId, NavigationTarget, Phase, Role};

/// Observable controller activity, published on a broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    RoleSelected {
        role: Role,
        theme: &'static str,
    },
    PhaseChanged {
        attempt: AttemptId,
        from: Phase,
        to: Phase,
    },
    Redirect {
        attempt: AttemptId,
        role: Role,
        target: NavigationTarget,
    },
    Superseded {
        attempt: AttemptId,
    },
}
