//! Proposal phases

use serde::{Deserialize, Serialize};

/// Phase of a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalPhase {
    /// Drafted, nobody ranked it yet
    Presentation,
    /// Debate period: members rank the proposal
    InDebate,
    /// Debate quorum met, waiting for the vote to open
    Waiting,
    /// Vote period open
    Voting,
    /// Vote closed, tally being resolved
    Voted,
    /// Terminal: approved
    Accepted,
    /// Terminal: abandoned in debate or rejected by the vote
    Rejected,
}

impl ProposalPhase {
    /// Position along the lifecycle; both terminal phases share the last one
    pub fn ordinal(&self) -> u8 {
        match self {
            ProposalPhase::Presentation => 0,
            ProposalPhase::InDebate => 1,
            ProposalPhase::Waiting => 2,
            ProposalPhase::Voting => 3,
            ProposalPhase::Voted => 4,
            ProposalPhase::Accepted | ProposalPhase::Rejected => 5,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalPhase::Accepted | ProposalPhase::Rejected)
    }

    /// Phases in which members may still rank the proposal
    pub fn accepts_rankings(&self) -> bool {
        matches!(self, ProposalPhase::Presentation | ProposalPhase::InDebate)
    }

    /// Phases a periodic sweep needs to look at
    pub fn is_time_sensitive(&self) -> bool {
        matches!(
            self,
            ProposalPhase::InDebate | ProposalPhase::Waiting | ProposalPhase::Voting
        )
    }

    /// Whether the state machine has an edge from `self` to `next`
    pub fn can_transition_to(&self, next: ProposalPhase) -> bool {
        use ProposalPhase::*;
        matches!(
            (self, next),
            (Presentation, InDebate)
                | (InDebate, Waiting)
                | (InDebate, Rejected)
                | (Waiting, Voting)
                | (Voting, Voted)
                | (Voted, Accepted)
                | (Voted, Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalPhase::Presentation => "presentation",
            ProposalPhase::InDebate => "in_debate",
            ProposalPhase::Waiting => "waiting",
            ProposalPhase::Voting => "voting",
            ProposalPhase::Voted => "voted",
            ProposalPhase::Accepted => "accepted",
            ProposalPhase::Rejected => "rejected",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProposalPhase::Presentation => "in presentation",
            ProposalPhase::InDebate => "in debate",
            ProposalPhase::Waiting => "waiting for the vote",
            ProposalPhase::Voting => "in vote",
            ProposalPhase::Voted => "voted",
            ProposalPhase::Accepted => "accepted",
            ProposalPhase::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ProposalPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProposalPhase::*;

    const ALL: [ProposalPhase; 7] = [
        Presentation,
        InDebate,
        Waiting,
        Voting,
        Voted,
        Accepted,
        Rejected,
    ];

    #[test]
    fn test_every_edge_moves_forward() {
        for from in ALL {
            for to in ALL {
                if from.can_transition_to(to) {
                    assert!(to.ordinal() > from.ordinal(), "{from:?} -> {to:?}");
                }
            }
        }
    }

    #[test]
    fn test_terminal_phases_have_no_exit() {
        for terminal in [Accepted, Rejected] {
            assert!(terminal.is_terminal());
            assert!(ALL.iter().all(|to| !terminal.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_rankings_only_before_waiting() {
        assert!(Presentation.accepts_rankings());
        assert!(InDebate.accepts_rankings());
        assert!(!Waiting.accepts_rankings());
        assert!(!Voting.accepts_rankings());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&InDebate).unwrap(), "\"in_debate\"");
    }
}
