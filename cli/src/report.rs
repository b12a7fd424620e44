//! Console output for scenario runs

use crate::scenario::ScenarioRun;
use agora_domain::{Proposal, ProposalPhase, VoteOutcome};
use colored::Colorize;

/// Formats scenario runs for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run
    pub fn format(run: &ScenarioRun) -> String {
        let proposal = &run.proposal;
        let mut output = String::new();

        output.push_str(&Self::header(&format!("{} {}", proposal.id(), proposal.title())));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Phase:".cyan().bold(),
            Self::phase(proposal.phase())
        ));
        if let Some(outcome) = proposal.outcome() {
            output.push_str(&format!(
                "{} {}\n",
                "Outcome:".cyan().bold(),
                Self::outcome(proposal, outcome)
            ));
        }

        output.push_str(&Self::section_header("Debate"));
        let quorum = proposal.quorum();
        output.push_str(&format!(
            "  Rankings: {} of {} required, approval {}% of {}% required\n",
            proposal.ranking_count(),
            quorum.required_rankings(),
            proposal.approval_score(),
            quorum.required_good_score(),
        ));

        output.push_str(&Self::section_header("Vote"));
        match quorum.required_votes() {
            Some(required) => output.push_str(&format!(
                "  Votes: {} of {} required\n",
                proposal.votes_cast(),
                required
            )),
            None => output.push_str("  Not opened\n"),
        }
        let tally = proposal.tally_view();
        if proposal.is_ranked_choice() {
            for solution in proposal.solutions() {
                output.push_str(&format!(
                    "  * {}. {} (score {})\n",
                    solution.sequence, solution.title, solution.schulze_score
                ));
            }
        } else {
            output.push_str(&format!(
                "  {} positive, {} neutral, {} negative\n",
                tally.summary.positive, tally.summary.neutral, tally.summary.negative
            ));
        }
        if tally.secret {
            output.push_str(&format!("  {}\n", "(secret vote: ballots hidden)".dimmed()));
        }

        output.push_str(&Self::section_header("Steps"));
        for step in &run.steps {
            let status = if step.ok {
                "ok".green().bold()
            } else {
                "failed".red().bold()
            };
            output.push_str(&format!(
                "  {:>3}. {:<12} {:<6} {} [{}]\n",
                step.index,
                step.action,
                status,
                step.detail,
                step.phase.display_name()
            ));
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Notifications:".cyan().bold(),
            run.notifications.len()
        ));
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(run: &ScenarioRun) -> String {
        serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
    }

    fn phase(phase: ProposalPhase) -> colored::ColoredString {
        let name = phase.display_name();
        match phase {
            ProposalPhase::Accepted => name.green().bold(),
            ProposalPhase::Rejected => name.red().bold(),
            _ => name.yellow(),
        }
    }

    fn outcome(proposal: &Proposal, outcome: &VoteOutcome) -> String {
        match outcome {
            VoteOutcome::Accepted { winner: Some(id) } => {
                let title = proposal
                    .solutions()
                    .iter()
                    .find(|s| s.id == *id)
                    .map_or("?", |s| s.title.as_str());
                format!("accepted, winner: {title}")
            }
            VoteOutcome::Accepted { winner: None } => "accepted".to_string(),
            VoteOutcome::Rejected { reason } => format!("rejected ({})", reason.as_str()),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n  {}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}
