use super::domain::ReportStatus;

/// Staff-triggered moves through the forward-only status machine.
///
/// Pending -> Proses -> Selesai, no skips, no way back. Each transition names
/// the status it expects to find so storage can apply it as a conditional
/// update and reject the loser of a concurrent race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTransition {
    /// Pending -> Proses
    Process,
    /// Proses -> Selesai
    Complete,
}

impl ReportTransition {
    /// Status a report must hold for this transition to apply.
    pub const fn expects(self) -> ReportStatus {
        match self {
            ReportTransition::Process => ReportStatus::Pending,
            ReportTransition::Complete => ReportStatus::InProgress,
        }
    }

    /// Status the report holds after the transition.
    pub const fn target(self) -> ReportStatus {
        match self {
            ReportTransition::Process => ReportStatus::InProgress,
            ReportTransition::Complete => ReportStatus::Resolved,
        }
    }
}

impl ReportStatus {
    /// The only transition that may leave this status, if any.
    pub const fn next_transition(self) -> Option<ReportTransition> {
        match self {
            ReportStatus::Pending => Some(ReportTransition::Process),
            ReportStatus::InProgress => Some(ReportTransition::Complete),
            ReportStatus::Resolved => None,
        }
    }
}
