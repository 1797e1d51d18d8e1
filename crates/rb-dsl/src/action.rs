//! Action strings.
//!
//! `verb:param:param|verb:param` is split into segments on `|` and each
//! segment into colon-separated fields. The first field must name a
//! [`Verb`]; the rest are kept as raw strings for the executor to type.
//! Fields past a verb's maximum are set aside in [`ActionCall::ignored`]
//! rather than failing the segment.

use std::fmt;
use std::ops::Range;

/// Every verb an action string may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `set_flag:<name>[:<bool>]`
    SetFlag,
    /// `start_quest:<quest>`
    StartQuest,
    /// `advance_quest_stage:<quest>`
    AdvanceQuestStage,
    /// `set_quest_stage:<quest>:<stage>`
    SetQuestStage,
    /// `complete_quest:<quest>`
    CompleteQuest,
    /// `grant_item:<item>[:<qty>]`
    GrantItem,
    /// `remove_item:<item>[:<qty>]`
    RemoveItem,
    /// `grant_currency:<denomination>:<amount>`
    GrantCurrency,
    /// `pay_debt:<copper>[:<flag>]`
    PayDebt,
    /// `hire_job:<job>`
    HireJob,
    /// `quit_job`
    QuitJob,
    /// `fire_job:<job>[:<reason>]`
    FireJob,
    /// `work_shift:<job>`
    WorkShift,
    /// `update_relationship:<npc>:<delta>[:<axis>]`
    UpdateRelationship,
    /// `set_relationship:<npc>:<value>[:<axis>]`
    SetRelationship,
    /// `add_known_npc:<npc>`
    AddKnownNpc,
    /// `modify_stat:<stat>:<delta>`
    ModifyStat,
    /// `open_shop:<shop>`, a directive for the frontend.
    OpenShop,
    /// `pass_time:<minutes>`
    PassTime,
    /// `set_weather:<weather>`
    SetWeather,
    /// `convert_logs_to_planks:<count|all>`
    ConvertLogsToPlanks,
    /// `enter_temporal_instance:<instance>`
    EnterTemporalInstance,
    /// `exit_temporal_instance`
    ExitTemporalInstance,
    /// `collect_debt_from:<npc>`
    CollectDebtFrom,
    /// `turn_in_debt`
    TurnInDebt,
    /// `goto_node:<node>`, a directive for the dialogue engine.
    GotoNode,
    /// `end_dialogue`
    EndDialogue,
    /// `write_diary:<text...>`; colons in the text are kept.
    WriteDiary,
}

impl Verb {
    /// The whole vocabulary.
    pub const ALL: [Verb; 28] = [
        Verb::SetFlag,
        Verb::StartQuest,
        Verb::AdvanceQuestStage,
        Verb::SetQuestStage,
        Verb::CompleteQuest,
        Verb::GrantItem,
        Verb::RemoveItem,
        Verb::GrantCurrency,
        Verb::PayDebt,
        Verb::HireJob,
        Verb::QuitJob,
        Verb::FireJob,
        Verb::WorkShift,
        Verb::UpdateRelationship,
        Verb::SetRelationship,
        Verb::AddKnownNpc,
        Verb::ModifyStat,
        Verb::OpenShop,
        Verb::PassTime,
        Verb::SetWeather,
        Verb::ConvertLogsToPlanks,
        Verb::EnterTemporalInstance,
        Verb::ExitTemporalInstance,
        Verb::CollectDebtFrom,
        Verb::TurnInDebt,
        Verb::GotoNode,
        Verb::EndDialogue,
        Verb::WriteDiary,
    ];

    /// Name as written in content.
    pub fn name(self) -> &'static str {
        match self {
            Verb::SetFlag => "set_flag",
            Verb::StartQuest => "start_quest",
            Verb::AdvanceQuestStage => "advance_quest_stage",
            Verb::SetQuestStage => "set_quest_stage",
            Verb::CompleteQuest => "complete_quest",
            Verb::GrantItem => "grant_item",
            Verb::RemoveItem => "remove_item",
            Verb::GrantCurrency => "grant_currency",
            Verb::PayDebt => "pay_debt",
            Verb::HireJob => "hire_job",
            Verb::QuitJob => "quit_job",
            Verb::FireJob => "fire_job",
            Verb::WorkShift => "work_shift",
            Verb::UpdateRelationship => "update_relationship",
            Verb::SetRelationship => "set_relationship",
            Verb::AddKnownNpc => "add_known_npc",
            Verb::ModifyStat => "modify_stat",
            Verb::OpenShop => "open_shop",
            Verb::PassTime => "pass_time",
            Verb::SetWeather => "set_weather",
            Verb::ConvertLogsToPlanks => "convert_logs_to_planks",
            Verb::EnterTemporalInstance => "enter_temporal_instance",
            Verb::ExitTemporalInstance => "exit_temporal_instance",
            Verb::CollectDebtFrom => "collect_debt_from",
            Verb::TurnInDebt => "turn_in_debt",
            Verb::GotoNode => "goto_node",
            Verb::EndDialogue => "end_dialogue",
            Verb::WriteDiary => "write_diary",
        }
    }

    /// Look up a verb by name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.name() == s)
    }

    /// Closest known verb name, if any is near enough to be a typo.
    pub fn suggest(s: &str) -> Option<&'static str> {
        Self::ALL
            .into_iter()
            .map(|verb| (verb.name(), strsim::levenshtein(s, verb.name())))
            .filter(|(_, distance)| *distance <= 3)
            .min_by_key(|(_, distance)| *distance)
            .map(|(name, _)| name)
    }

    /// Inclusive `(min, max)` parameter count.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Verb::QuitJob
            | Verb::ExitTemporalInstance
            | Verb::TurnInDebt
            | Verb::EndDialogue => (0, 0),
            Verb::StartQuest
            | Verb::AdvanceQuestStage
            | Verb::CompleteQuest
            | Verb::HireJob
            | Verb::WorkShift
            | Verb::AddKnownNpc
            | Verb::OpenShop
            | Verb::PassTime
            | Verb::SetWeather
            | Verb::ConvertLogsToPlanks
            | Verb::EnterTemporalInstance
            | Verb::CollectDebtFrom
            | Verb::GotoNode => (1, 1),
            Verb::SetFlag
            | Verb::GrantItem
            | Verb::RemoveItem
            | Verb::PayDebt
            | Verb::FireJob => (1, 2),
            Verb::SetQuestStage | Verb::GrantCurrency | Verb::ModifyStat => (2, 2),
            Verb::UpdateRelationship | Verb::SetRelationship => (2, 3),
            Verb::WriteDiary => (1, usize::MAX),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed `verb:param...` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    /// The verb named by the first field.
    pub verb: Verb,
    /// Raw parameters, at most the verb's maximum.
    pub params: Vec<String>,
    /// Trailing fields beyond the verb's maximum. Never executed.
    pub ignored: Vec<String>,
    /// Byte range of the segment in the action string.
    pub span: Range<usize>,
}

impl ActionCall {
    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

impl fmt::Display for ActionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb)?;
        for param in &self.params {
            write!(f, ":{param}")?;
        }
        Ok(())
    }
}

/// Why a segment could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    /// Nothing between two `|`.
    #[error("empty action segment")]
    Empty {
        /// Position of the gap.
        span: Range<usize>,
    },

    /// The first field is not in the vocabulary.
    #[error("unknown verb `{verb}`")]
    UnknownVerb {
        /// The field as written.
        verb: String,
        /// The whole segment.
        span: Range<usize>,
        /// Nearest known verb, when one is close.
        suggestion: Option<&'static str>,
    },

    /// Fewer parameters than the verb needs.
    #[error("`{verb}` takes {} but got {found}", describe_arity(.verb))]
    Arity {
        /// The verb.
        verb: Verb,
        /// How many parameters were given.
        found: usize,
        /// The whole segment.
        span: Range<usize>,
    },
}

impl ActionParseError {
    /// Byte range the error points at.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Empty { span } | Self::UnknownVerb { span, .. } | Self::Arity { span, .. } => {
                span.clone()
            }
        }
    }
}

fn describe_arity(verb: &Verb) -> String {
    match verb.arity() {
        (0, 0) => "no parameters".to_string(),
        (min, usize::MAX) => format!("at least {min} parameter(s)"),
        (min, max) if min == max => format!("{min} parameter(s)"),
        (min, max) => format!("{min} to {max} parameters"),
    }
}

/// Split an action string into segments with their byte ranges. Whitespace
/// around each segment is trimmed.
fn segments(input: &str) -> Vec<(&str, Range<usize>)> {
    let mut out = Vec::new();
    let mut start = 0;
    for piece in input.split('|') {
        let trimmed = piece.trim();
        let offset = start + (piece.len() - piece.trim_start().len());
        out.push((trimmed, offset..offset + trimmed.len()));
        start += piece.len() + 1;
    }
    out
}

fn parse_segment(segment: &str, span: Range<usize>) -> Result<ActionCall, ActionParseError> {
    if segment.is_empty() {
        return Err(ActionParseError::Empty { span });
    }
    let mut fields = segment.split(':').map(str::trim);
    let name = fields.next().unwrap_or_default();
    let Some(verb) = Verb::parse(name) else {
        return Err(ActionParseError::UnknownVerb {
            verb: name.to_string(),
            span,
            suggestion: Verb::suggest(name),
        });
    };
    let mut params: Vec<String> = fields.map(str::to_string).collect();
    let (min, max) = verb.arity();
    if params.len() < min {
        return Err(ActionParseError::Arity {
            verb,
            found: params.len(),
            span,
        });
    }
    let ignored = params.split_off(params.len().min(max));
    Ok(ActionCall {
        verb,
        params,
        ignored,
        span,
    })
}

/// Parse an action string. One result per `|` segment, in order, so a bad
/// segment never hides the good ones around it. A blank string has no
/// segments.
pub fn parse_actions(input: &str) -> Vec<Result<ActionCall, ActionParseError>> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    segments(input)
        .into_iter()
        .map(|(segment, span)| parse_segment(segment, span))
        .collect()
}
