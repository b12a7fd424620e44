//! Scenario files and their replay
//!
//! A scenario describes one group, one proposal and the sequence of things
//! members and operators do to it:
//!
//! ```toml
//! title = "Community garden"
//! members = 20
//! solutions = ["Roses", "Vegetables"]
//!
//! [[steps]]
//! action = "rank"
//! user = 1
//! stance = "positive"
//!
//! [[steps]]
//! action = "advance"
//! minutes = 2880
//!
//! [[steps]]
//! action = "check"
//!
//! [[steps]]
//! action = "start_vote"
//!
//! [[steps]]
//! action = "ballot"
//! user = 1
//! ranking = [2, 1]   # solution sequence numbers, most preferred first
//! ```
//!
//! A failing step is recorded in the run and does not stop the replay.

use agora_application::{
    Clock, CreateProposalInput, DeliberationEngine, EngineConfig, EngineContext, Notification,
    Notifier,
};
use agora_domain::{GroupId, Proposal, ProposalId, ProposalPhase, Stance, UserId, VoteSchedule};
use agora_infrastructure::config::{FileConfig, FileQuorumConfig};
use agora_infrastructure::{
    ChannelNotifier, GroupRoster, InMemoryProposalRepository, JsonlEventLog, ManualClock,
    NotificationSink, RecordingSink, StaticGroupDirectory,
};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const GROUP: GroupId = GroupId(1);

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub title: String,
    /// Members allowed to rank
    pub members: i64,
    /// Members allowed to vote; defaults to `members`
    pub voters: Option<i64>,
    /// Competing solutions; empty means a single one named after the title
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub secret_vote: bool,
    /// Users barred from ranking
    #[serde(default)]
    pub muted: Vec<u64>,
    /// Users barred from voting
    #[serde(default)]
    pub non_voters: Vec<u64>,
    /// Replaces the configured `[quorum]` for this proposal
    pub quorum: Option<FileQuorumConfig>,
    pub schedule: Option<ScheduleSpec>,
    /// Simulated start instant; defaults to now
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Fixed vote window, relative to the scenario start
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSpec {
    pub starts_in_minutes: i64,
    pub lasts_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Rank { user: u64, stance: Stance },
    Withdraw { user: u64 },
    Revise,
    Contribute,
    AddSolution { title: String },
    OpenDebate,
    Advance { minutes: i64 },
    Check {
        #[serde(default)]
        force: bool,
    },
    StartVote {
        #[serde(default)]
        force: bool,
    },
    Vote { user: u64, stance: Stance },
    Ballot { user: u64, ranking: Vec<u32> },
    CloseVote {
        #[serde(default)]
        force: bool,
    },
    Sweep,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Rank { .. } => "rank",
            Step::Withdraw { .. } => "withdraw",
            Step::Revise => "revise",
            Step::Contribute => "contribute",
            Step::AddSolution { .. } => "add_solution",
            Step::OpenDebate => "open_debate",
            Step::Advance { .. } => "advance",
            Step::Check { .. } => "check",
            Step::StartVote { .. } => "start_vote",
            Step::Vote { .. } => "vote",
            Step::Ballot { .. } => "ballot",
            Step::CloseVote { .. } => "close_vote",
            Step::Sweep => "sweep",
        }
    }
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text)?;
        if scenario.members <= 0 {
            bail!("members must be positive, got {}", scenario.members);
        }
        Ok(scenario)
    }

    fn roster(&self) -> GroupRoster {
        GroupRoster {
            participants: self.members,
            voters: self.voters.unwrap_or(self.members),
            muted: self.muted.iter().copied().map(UserId::new).collect(),
            non_voters: self.non_voters.iter().copied().map(UserId::new).collect(),
        }
    }

    fn input(&self, start: DateTime<Utc>) -> Result<CreateProposalInput> {
        let mut input = CreateProposalInput::new(GROUP, self.title.clone())
            .with_solutions(self.solutions.iter().cloned())
            .with_secret_vote(self.secret_vote);
        if let Some(quorum) = &self.quorum {
            input = input.with_policy(quorum.to_policy()?);
        }
        if let Some(window) = self.schedule {
            let starts_at = start + Duration::minutes(window.starts_in_minutes);
            input = input.with_schedule(VoteSchedule::fixed(
                starts_at,
                starts_at + Duration::minutes(window.lasts_minutes),
            ));
        }
        Ok(input)
    }
}

/// Outcome of one replayed step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    pub ok: bool,
    pub detail: String,
    /// Phase after the step
    pub phase: ProposalPhase,
}

/// Everything a replay produced
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub proposal: Proposal,
    pub steps: Vec<StepOutcome>,
    pub notifications: Vec<Notification>,
}

/// Engine wired for one scenario
pub struct Session {
    pub engine: DeliberationEngine,
    clock: Option<Arc<ManualClock>>,
    notifier: Arc<ChannelNotifier>,
    delivery: JoinHandle<()>,
    recording: RecordingSink,
}

impl Session {
    /// Wire the engine with in-memory adapters.
    ///
    /// With `simulated`, time only moves through `advance` steps; otherwise
    /// the system clock is used and `advance` steps fail.
    pub fn build(config: &FileConfig, scenario: &Scenario, simulated: bool) -> Result<Self> {
        let engine_config: EngineConfig = config
            .engine_config()
            .map_err(|e| anyhow!("Invalid configuration: {e}"))?;

        let recording = RecordingSink::new();
        let mut sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(recording.clone())];
        if let Some(path) = config.logging.events_path()
            && let Some(log) = JsonlEventLog::new(&path)
        {
            info!(path = %log.path().display(), "Appending events to JSONL log");
            sinks.push(Box::new(log));
        }
        let (notifier, delivery) = ChannelNotifier::spawn(sinks);
        let notifier = Arc::new(notifier);

        let (clock, engine_clock): (Option<Arc<ManualClock>>, Arc<dyn Clock>) = if simulated {
            let manual = Arc::new(ManualClock::new(scenario.start.unwrap_or_else(Utc::now)));
            (Some(manual.clone()), manual)
        } else {
            (None, Arc::new(agora_infrastructure::SystemClock))
        };

        let directory = Arc::new(StaticGroupDirectory::new().with_group(GROUP, scenario.roster()));
        let context = EngineContext::new(
            Arc::new(InMemoryProposalRepository::new()),
            directory.clone(),
            directory,
            notifier.clone() as Arc<dyn Notifier>,
            engine_clock,
        )
        .with_config(engine_config);

        Ok(Self {
            engine: DeliberationEngine::new(context),
            clock,
            notifier,
            delivery,
            recording,
        })
    }

    /// Create the scenario's proposal and replay its steps
    pub async fn replay(&self, scenario: &Scenario) -> Result<(ProposalId, Vec<StepOutcome>)> {
        let start = self.engine.context().clock.now();
        let proposal = self.engine.create_proposal(scenario.input(start)?).await?;
        let id = proposal.id();
        info!(proposal = %id, steps = scenario.steps.len(), "Replaying scenario");

        let mut outcomes = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            let result = self.apply(id, step).await;
            let phase = self.engine.proposal(id).await?.phase();
            debug!(index, action = step.name(), ok = result.is_ok(), %phase, "Step replayed");
            let (ok, detail) = match result {
                Ok(detail) => (true, detail),
                Err(e) => (false, e.to_string()),
            };
            outcomes.push(StepOutcome {
                index: index + 1,
                action: step.name(),
                ok,
                detail,
                phase,
            });
        }
        Ok((id, outcomes))
    }

    /// Stop the notifier and collect what was delivered
    pub async fn finish(self, id: ProposalId, steps: Vec<StepOutcome>) -> Result<ScenarioRun> {
        let proposal = self.engine.proposal(id).await?;
        self.notifier.close();
        self.delivery.await?;
        Ok(ScenarioRun {
            proposal,
            steps,
            notifications: self.recording.take(),
        })
    }

    async fn apply(&self, id: ProposalId, step: &Step) -> Result<String> {
        let engine = &self.engine;
        Ok(match step {
            Step::Rank { user, stance } => {
                let applied = engine.rank(id, UserId::new(*user), *stance).await?;
                format!(
                    "{} rankings, approval {}%",
                    applied.counters.ranking_count, applied.counters.approval_score
                )
            }
            Step::Withdraw { user } => {
                let removed = engine.withdraw_ranking(id, UserId::new(*user)).await?;
                format!("{} rankings left", removed.counters.ranking_count)
            }
            Step::Revise => {
                engine.record_revision(id).await?;
                "content revised".to_string()
            }
            Step::Contribute => {
                engine.record_contribution(id).await?;
                "contribution recorded".to_string()
            }
            Step::AddSolution { title } => {
                let solution = engine.add_solution(id, title.clone()).await?;
                format!("solution {} added", solution.sequence)
            }
            Step::OpenDebate => describe(&[engine.open_debate(id).await?]),
            Step::Advance { minutes } => {
                let clock = self
                    .clock
                    .as_ref()
                    .ok_or_else(|| anyhow!("cannot advance the system clock"))?;
                clock.advance(Duration::minutes(*minutes));
                format!("now {}", clock.now().to_rfc3339())
            }
            Step::Check { force } => describe(&engine.check(id, *force).await?),
            Step::StartVote { force } => describe(&[engine.start_votation(id, *force).await?]),
            Step::Vote { user, stance } => {
                let summary = engine.cast_vote(id, UserId::new(*user), *stance).await?;
                format!(
                    "{} positive, {} neutral, {} negative",
                    summary.positive, summary.neutral, summary.negative
                )
            }
            Step::Ballot { user, ranking } => {
                let proposal = engine.proposal(id).await?;
                let ids = ranking
                    .iter()
                    .map(|sequence| {
                        proposal
                            .solutions()
                            .iter()
                            .find(|s| s.sequence == *sequence)
                            .map(|s| s.id)
                            .ok_or_else(|| anyhow!("no solution with sequence {sequence}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let replaced = engine.cast_ballot(id, UserId::new(*user), ids).await?;
                let text = if replaced { "ballot replaced" } else { "ballot cast" };
                text.to_string()
            }
            Step::CloseVote { force } => describe(&engine.close_vote_phase(id, *force).await?),
            Step::Sweep => {
                let report = engine.sweep().await?;
                format!(
                    "{} checked, {} transitions",
                    report.checked,
                    report.transitions.len()
                )
            }
        })
    }
}

fn describe(transitions: &[agora_domain::PhaseTransition]) -> String {
    if transitions.is_empty() {
        return "no change".to_string();
    }
    transitions
        .iter()
        .map(|t| format!("{} -> {}", t.from, t.to))
        .collect::<Vec<_>>()
        .join(", ")
}
